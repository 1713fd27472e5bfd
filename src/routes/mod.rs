//! API route handlers - maps HTTP endpoints to git operations.
//!
//! - `repository`: Basic repo info (GET /api/v1/repository)
//! - `blame`: Rendered blame and raw blame runs for one file

pub mod blame;
pub mod repository;

use std::sync::Arc;

use axum::Router;

use crate::git::SharedRepo;
use crate::render::BlameRenderer;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: SharedRepo,
    pub renderer: Arc<BlameRenderer>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(repository::routes(state.clone()))
        .merge(blame::routes(state))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, RwLock};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use super::{create_router, AppState};
    use crate::git::GitRepository;
    use crate::render::BlameRenderer;

    pub fn router_for(path: &std::path::Path, link_prefix: &str) -> Router {
        let repo = GitRepository::open(path).unwrap();
        create_router(AppState {
            repo: Arc::new(RwLock::new(repo)),
            renderer: Arc::new(BlameRenderer::new(link_prefix)),
        })
    }

    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
