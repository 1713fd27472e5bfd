use axum::{extract::State, routing::get, Json, Router};

use crate::error::{AppError, Result};
use crate::models::RepositoryInfo;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository", get(get_repository_info))
        .with_state(state)
}

async fn get_repository_info(State(state): State<AppState>) -> Result<Json<RepositoryInfo>> {
    let repo = state.repo.read().map_err(|_| AppError::poisoned())?;
    let info = repo.info()?;
    Ok(Json(info))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::git::test_support::{commit_file, init_repo};
    use crate::routes::test_support::{get_json, router_for};

    #[tokio::test]
    async fn returns_repository_info() {
        let (dir, repo) = init_repo();
        let oid = commit_file(&repo, "README", "hello\n", "Init");
        drop(repo);

        let (status, body) = get_json(router_for(dir.path(), ""), "/api/v1/repository").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["head_commit"]["oid"], oid.to_string());
        assert_eq!(body["is_bare"], false);
    }
}
