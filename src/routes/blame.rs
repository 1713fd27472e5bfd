//! Blame endpoints.
//!
//! - GET /api/v1/repository/blame?path=<path>&commit=<optional>
//!   Rendered blame for a file at a revision (default HEAD): file metadata,
//!   latest commit touching the file, and three aligned markup streams
//!   (commit cell, line number cell, escaped source line).
//!
//! - GET /api/v1/repository/blame/runs?path=<path>&commit=<optional>
//!   The underlying runs of lines per commit, unrendered.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{BlameResponse, BlameRunsResponse};
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository/blame", get(get_blame))
        .route("/api/v1/repository/blame/runs", get(get_blame_runs))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct BlameQuery {
    path: String,
    commit: Option<String>,
}

async fn get_blame(
    State(state): State<AppState>,
    Query(query): Query<BlameQuery>,
) -> Result<Json<BlameResponse>> {
    let repo = state.repo.read().map_err(|_| AppError::poisoned())?;
    let response = repo.get_blame(&query.path, query.commit.as_deref(), &state.renderer)?;
    Ok(Json(response))
}

async fn get_blame_runs(
    State(state): State<AppState>,
    Query(query): Query<BlameQuery>,
) -> Result<Json<BlameRunsResponse>> {
    let repo = state.repo.read().map_err(|_| AppError::poisoned())?;
    let (commit, runs) = repo.blame_runs(&query.path, query.commit.as_deref())?;
    Ok(Json(BlameRunsResponse {
        path: query.path,
        commit,
        runs,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::git::test_support::{commit_file, init_repo};
    use crate::routes::test_support::{get_json, router_for};

    #[tokio::test]
    async fn renders_blame_for_file() {
        let (dir, repo) = init_repo();
        let first = commit_file(&repo, "main.c", "int a;\nint b;\n", "Fix bug");
        let second = commit_file(&repo, "main.c", "int a;\nint b;\nint c;\n", "Add feature");
        drop(repo);

        let app = router_for(dir.path(), "/demo/repo");
        let (status, body) = get_json(app, "/api/v1/repository/blame?path=main.c").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["commit"], second.to_string());
        assert_eq!(body["line_count"], 3);

        let commit_info = body["commit_info"].as_array().unwrap();
        assert_eq!(commit_info.len(), 3);
        let first_cell = commit_info[0].as_str().unwrap();
        assert!(first_cell.contains(&format!(r#"href="/demo/repo/commit/{}""#, first)));
        assert!(first_cell.contains(">Fix bug</a>"));
        assert_eq!(commit_info[1], r#"<span class="bottom-line">&#8203;</span>"#);
        assert!(commit_info[2].as_str().unwrap().contains(">Add feature</a>"));

        assert_eq!(body["line_numbers"][2], r#"<span id="L3" class="bottom-line">3</span>"#);
        assert_eq!(body["content"][2], r#"<li class="L3 bottom-line" rel="L3">int c;</li>"#);
    }

    #[tokio::test]
    async fn returns_raw_runs() {
        let (dir, repo) = init_repo();
        let oid = commit_file(&repo, "a.txt", "x\ny\n", "Init");
        drop(repo);

        let (status, body) =
            get_json(router_for(dir.path(), ""), "/api/v1/repository/blame/runs?path=a.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["runs"][0]["attribution_key"], oid.to_string());
        assert_eq!(body["runs"][0]["lines"], serde_json::json!(["x", "y"]));
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let (dir, repo) = init_repo();
        commit_file(&repo, "a.txt", "x\n", "Init");
        drop(repo);

        let (status, body) =
            get_json(router_for(dir.path(), ""), "/api/v1/repository/blame?path=b.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Path not found: b.txt");
    }

    #[tokio::test]
    async fn unknown_commit_is_404() {
        let (dir, repo) = init_repo();
        commit_file(&repo, "a.txt", "x\n", "Init");
        drop(repo);

        let (status, _) = get_json(
            router_for(dir.path(), ""),
            "/api/v1/repository/blame?path=a.txt&commit=deadbeef",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
