use git2::Repository;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{AppError, Result};
use crate::models::{CommitInfo, RepositoryInfo};

pub struct GitRepository {
    pub repo: Mutex<Repository>,
    pub path: String,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| AppError::RepoNotFound(path_str.clone()))?;

        Ok(Self {
            repo: Mutex::new(repo),
            path: path_str,
        })
    }

    pub fn info(&self) -> Result<RepositoryInfo> {
        self.with_repo(|repo| {
            let name = Path::new(&self.path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            let head = repo.head().ok();
            let head_branch = head
                .as_ref()
                .filter(|h| h.is_branch())
                .and_then(|h| h.shorthand().map(|s| s.to_string()));
            let head_commit = head
                .as_ref()
                .and_then(|h| h.peel_to_commit().ok())
                .map(|c| commit_to_info(&c));

            Ok(RepositoryInfo {
                name,
                path: self.path.clone(),
                head_branch,
                head_commit,
                is_bare: repo.is_bare(),
                is_empty: repo.is_empty().unwrap_or(true),
            })
        })
    }

    pub fn with_repo<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Repository) -> Result<T>,
    {
        let repo = self.repo.lock().map_err(|_| AppError::poisoned())?;
        f(&repo)
    }
}

/// Resolve a revision (full or abbreviated id, ref name, `HEAD~n`) to a commit.
/// `None` or an empty string means `HEAD`.
pub fn resolve_commit<'r>(repo: &'r Repository, revision: Option<&str>) -> Result<git2::Commit<'r>> {
    let spec = revision.map(str::trim).filter(|r| !r.is_empty()).unwrap_or("HEAD");
    repo.revparse_single(spec)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|e| AppError::git_lookup(e, || AppError::CommitNotFound(spec.to_string())))
}

/// First line of the commit message.
pub fn commit_summary(commit: &git2::Commit) -> String {
    commit.summary().unwrap_or("").trim().to_string()
}

pub fn commit_to_info(commit: &git2::Commit) -> CommitInfo {
    let timestamp = commit.time().seconds();
    CommitInfo {
        oid: commit.id().to_string(),
        message: commit.message().unwrap_or("").trim().to_string(),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        timestamp,
        relative_time: format_relative_time(timestamp),
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let diff = chrono::Utc::now().timestamp() - timestamp;

    let (value, unit) = match diff {
        d if d < 60 => return "just now".to_string(),
        d if d < 3_600 => (d / 60, "minute"),
        d if d < 86_400 => (d / 3_600, "hour"),
        d if d < 2_592_000 => (d / 86_400, "day"),
        d if d < 31_536_000 => (d / 2_592_000, "month"),
        d => (d / 31_536_000, "year"),
    };
    format!("{} {}{} ago", value, unit, if value == 1 { "" } else { "s" })
}

pub type SharedRepo = Arc<RwLock<GitRepository>>;
