use git2::{DiffOptions, Repository, Sort};

use crate::error::Result;
use crate::git::repository::commit_to_info;
use crate::models::CommitInfo;

/// Newest commit reachable from `start` that changed `path`.
/// Falls back to `start` itself when no commit in its history touches the path.
pub fn get_last_commit_for_path(repo: &Repository, start: &git2::Commit, path: &str) -> Result<CommitInfo> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    revwalk.push(start.id())?;

    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;

        if commit_touches_path(repo, &commit, path)? {
            return Ok(commit_to_info(&commit));
        }
    }

    Ok(commit_to_info(start))
}

fn commit_touches_path(repo: &Repository, commit: &git2::Commit, path: &str) -> Result<bool> {
    let tree = commit.tree()?;

    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let mut opts = DiffOptions::new();
    opts.pathspec(path);

    let diff = repo.diff_tree_to_tree(
        parent_tree.as_ref(),
        Some(&tree),
        Some(&mut opts),
    )?;

    Ok(diff.deltas().len() > 0)
}
