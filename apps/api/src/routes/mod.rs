pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/extract-cv", post(handlers::handle_extract_cv))
        .route("/load-jd", post(handlers::handle_load_jd))
        .route("/match-cv-jd", post(handlers::handle_match_cv_jd))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::matching::pipeline::MatchingPipeline;
    use crate::matching::testing::{StubBackend, StubExtractor};

    fn router() -> Router {
        let pipeline = MatchingPipeline::new(
            Arc::new(StubExtractor::with_text("cv")),
            Arc::new(StubBackend::new(None, None)),
        );
        build_router(
            AppState {
                pipeline: Arc::new(pipeline),
            },
            1024,
        )
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "cv-jd-matching-api");
    }

    #[tokio::test]
    async fn test_root_is_alive() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router()
            .oneshot(Request::get("/api/v1/context").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
