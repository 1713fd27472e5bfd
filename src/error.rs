//! Application error types and HTTP response mapping.
//!
//! `AppError` covers every failure the blame service can report. It implements
//! Axum's `IntoResponse` so handlers can return it directly; the body is a JSON
//! object with a single `error` field.
//!
//! Error mappings:
//! - `RepoNotFound`, `PathNotFound`, `CommitNotFound` → 404
//! - `InvalidPath` → 400
//! - `Git`, `InvalidRunPartition`, `Internal` → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use git2::ErrorCode;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Blame runs that do not tile the file's lines exactly once.
    #[error("Invalid run partition: {0}")]
    InvalidRunPartition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RepoNotFound(_) | AppError::PathNotFound(_) | AppError::CommitNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            AppError::Git(_) | AppError::InvalidRunPartition(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `not_found()` when libgit2 found nothing for the lookup, `Git` otherwise.
    pub fn git_lookup(err: git2::Error, not_found: impl FnOnce() -> AppError) -> Self {
        match err.code() {
            ErrorCode::NotFound
            | ErrorCode::InvalidSpec
            | ErrorCode::Ambiguous
            | ErrorCode::UnbornBranch => not_found(),
            _ => AppError::Git(err),
        }
    }

    pub(crate) fn poisoned() -> Self {
        AppError::Internal("Lock poisoned".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        for err in [
            AppError::RepoNotFound("r".into()),
            AppError::PathNotFound("p".into()),
            AppError::CommitNotFound("c".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn partition_errors_are_server_errors() {
        let err = AppError::InvalidRunPartition("gap at line 3".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Invalid run partition: gap at line 3");
    }

    #[test]
    fn invalid_path_is_bad_request() {
        let response = AppError::InvalidPath("src".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn git_lookup_separates_missing_from_broken() {
        let missing = git2::Error::new(ErrorCode::NotFound, git2::ErrorClass::Reference, "revspec 'nope' not found");
        let err = AppError::git_lookup(missing, || AppError::CommitNotFound("nope".into()));
        assert!(matches!(err, AppError::CommitNotFound(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let broken = git2::Error::new(ErrorCode::GenericError, git2::ErrorClass::Odb, "object file is corrupted");
        let err = AppError::git_lookup(broken, || AppError::CommitNotFound("HEAD".into()));
        assert!(matches!(err, AppError::Git(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
