//! Blame source and commit label resolution.
//!
//! libgit2 computes the blame hunks; this module slices the file content at the
//! requested revision into `BlameRun`s along those hunks, looks up one summary
//! per distinct commit, and hands both to the renderer.
//!
//! Used by: GET /api/v1/repository/blame

use git2::{BlameOptions, Oid, Repository};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::git::history::get_last_commit_for_path;
use crate::git::repository::{commit_summary, resolve_commit, GitRepository};
use crate::models::{BlameResponse, BlameRun};
use crate::render::{validate_runs, BlameRenderer};

/// A blame hunk reduced to what run construction needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkSpan {
    pub commit: String,
    /// 1-based first line in the blamed revision
    pub start_line: usize,
    pub line_count: usize,
}

/// Contents of a blamed file at one revision.
struct BlamedFile {
    commit_id: String,
    size: u64,
    runs: Vec<BlameRun>,
}

impl GitRepository {
    /// Blame `path` at `revision` (default HEAD) and render the result.
    pub fn get_blame(
        &self,
        path: &str,
        revision: Option<&str>,
        renderer: &BlameRenderer,
    ) -> Result<BlameResponse> {
        let path = normalize_path(path)?;

        self.with_repo(|repo| {
            let start = Instant::now();
            let commit = resolve_commit(repo, revision)?;
            let file = blame_file(repo, &commit, &path)?;
            let labels = resolve_labels(repo, &file.runs)?;
            let latest_commit = get_last_commit_for_path(repo, &commit, &path)?;

            let rendered = renderer.render(&file.runs, &labels);
            if rendered.is_empty() {
                tracing::debug!("{} is empty at {}", path, file.commit_id);
            }
            tracing::info!(
                "Blamed {} at {}: {} lines, {} runs, {} commits in {:?}",
                path,
                file.commit_id,
                rendered.len(),
                file.runs.len(),
                labels.len(),
                start.elapsed()
            );

            let file_name = Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.clone());

            Ok(BlameResponse {
                path: path.clone(),
                file_name,
                file_size: file.size,
                commit: file.commit_id,
                latest_commit,
                line_count: rendered.len(),
                commit_info: rendered.attribution,
                line_numbers: rendered.line_numbers,
                content: rendered.content,
            })
        })
    }

    /// Blame runs for `path` at `revision`, with the full id of the resolved commit.
    pub fn blame_runs(&self, path: &str, revision: Option<&str>) -> Result<(String, Vec<BlameRun>)> {
        let path = normalize_path(path)?;
        self.with_repo(|repo| {
            let commit = resolve_commit(repo, revision)?;
            let file = blame_file(repo, &commit, &path)?;
            Ok((file.commit_id, file.runs))
        })
    }
}

fn normalize_path(path: &str) -> Result<String> {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::PathNotFound("no file given".to_string()));
    }
    Ok(trimmed.to_string())
}

fn blame_file(repo: &Repository, commit: &git2::Commit, path: &str) -> Result<BlamedFile> {
    let tree = commit.tree()?;
    let entry = tree
        .get_path(Path::new(path))
        .map_err(|e| AppError::git_lookup(e, || AppError::PathNotFound(path.to_string())))?;
    let obj = entry.to_object(repo)?;
    let blob = obj
        .as_blob()
        .ok_or_else(|| AppError::InvalidPath(format!("{} is not a file", path)))?;
    if blob.is_binary() {
        return Err(AppError::InvalidPath(format!("{} is a binary file", path)));
    }
    // Legacy encodings still blame; undecodable bytes show as U+FFFD.
    let content = String::from_utf8_lossy(blob.content());
    let lines: Vec<&str> = content.lines().collect();

    let mut opts = BlameOptions::new();
    opts.newest_commit(commit.id());
    let blame = repo.blame_file(Path::new(path), Some(&mut opts))?;

    let hunks: Vec<HunkSpan> = blame
        .iter()
        .map(|hunk| HunkSpan {
            commit: hunk.final_commit_id().to_string(),
            start_line: hunk.final_start_line(),
            line_count: hunk.lines_in_hunk(),
        })
        .collect();
    tracing::debug!("{} blame hunks for {}", hunks.len(), path);

    let runs = runs_from_hunks(&lines, &hunks)?;
    validate_runs(&runs, lines.len())?;

    Ok(BlamedFile {
        commit_id: commit.id().to_string(),
        size: blob.size() as u64,
        runs,
    })
}

/// Slice `lines` along `hunks`. Hunks must start at line 1, follow each other
/// without gaps or overlap, and end on the last line.
pub fn runs_from_hunks(lines: &[&str], hunks: &[HunkSpan]) -> Result<Vec<BlameRun>> {
    let mut runs = Vec::with_capacity(hunks.len());
    let mut next_line = 1;

    for hunk in hunks {
        if hunk.start_line != next_line {
            return Err(AppError::InvalidRunPartition(format!(
                "hunk for {} starts at line {}, expected {}",
                hunk.commit, hunk.start_line, next_line
            )));
        }

        let begin = hunk.start_line - 1;
        let end = begin + hunk.line_count;
        let slice = lines.get(begin..end).ok_or_else(|| {
            AppError::InvalidRunPartition(format!(
                "hunk for {} ends at line {}, file has {}",
                hunk.commit,
                end,
                lines.len()
            ))
        })?;

        runs.push(BlameRun {
            attribution_key: hunk.commit.clone(),
            lines: slice.iter().map(|l| l.to_string()).collect(),
        });
        next_line = end + 1;
    }

    if next_line != lines.len() + 1 {
        return Err(AppError::InvalidRunPartition(format!(
            "hunks end at line {}, file has {}",
            next_line - 1,
            lines.len()
        )));
    }

    Ok(runs)
}

/// Look up the summary of every distinct commit referenced by `runs`, once each.
pub fn resolve_labels(repo: &Repository, runs: &[BlameRun]) -> Result<HashMap<String, String>> {
    let mut labels = HashMap::new();

    for run in runs {
        if labels.contains_key(&run.attribution_key) {
            continue;
        }

        let not_found = || AppError::CommitNotFound(run.attribution_key.clone());
        let oid = Oid::from_str(&run.attribution_key).map_err(|_| not_found())?;
        let commit = repo
            .find_commit(oid)
            .map_err(|e| AppError::git_lookup(e, not_found))?;
        labels.insert(run.attribution_key.clone(), commit_summary(&commit));
    }

    Ok(labels)
}
