//! Blame data transfer objects.
//!
//! `BlameRun` is what the blame source produces and the renderer consumes.
//! `BlameResponse` is the payload of the blame endpoint: file metadata plus the
//! three aligned markup streams the page lays out side by side.

use serde::{Deserialize, Serialize};

use super::CommitInfo;

/// Contiguous lines of a file last changed by one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameRun {
    /// Full commit OID owning these lines
    pub attribution_key: String,
    /// Raw lines in file order, without line terminators
    pub lines: Vec<String>,
}

/// Response for blame request on a file at a specific commit.
#[derive(Debug, Serialize)]
pub struct BlameResponse {
    /// Path of the file
    pub path: String,
    /// Last path component
    pub file_name: String,
    /// Blob size in bytes
    pub file_size: u64,
    /// Commit OID where blame was calculated
    pub commit: String,
    /// Newest commit at or before `commit` that touched the file
    pub latest_commit: CommitInfo,
    pub line_count: usize,
    /// Per-line commit cell, label only on the first line of each run
    pub commit_info: Vec<String>,
    /// Per-line anchor + number cell
    pub line_numbers: Vec<String>,
    /// Per-line escaped source
    pub content: Vec<String>,
}

/// Response for the raw runs request.
#[derive(Debug, Serialize)]
pub struct BlameRunsResponse {
    pub path: String,
    pub commit: String,
    pub runs: Vec<BlameRun>,
}
