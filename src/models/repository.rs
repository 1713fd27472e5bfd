//! Repository-level DTOs.
//!
//! - `RepositoryInfo`: Repo metadata (header display)
//! - `CommitInfo`: Basic commit info (latest commit touching a blamed file)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub oid: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
    pub relative_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub path: String,
    pub head_branch: Option<String>,
    pub head_commit: Option<CommitInfo>,
    pub is_bare: bool,
    pub is_empty: bool,
}
