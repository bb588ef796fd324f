//! services/api/src/web/router.rs
//!
//! Assembles the full application router.

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::post,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    auth::issue_token_handler,
    middleware::{cors, require_bearer},
    rest::{questions_handler, ApiDoc},
    state::AppState,
};

/// Builds the router: `/api/token`, `/api/questions` and the Swagger UI.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no token required)
    let public_routes = Router::new().route("/token", post(issue_token_handler));

    // Protected routes (token required)
    let protected_routes = Router::new()
        .route("/questions", post(questions_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_bearer,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(app_state);

    // CORS sits on the outer router, after the fallback, so paths the nest never
    // sees (`/api/`, `/api/a/b`) still answer preflight. It only acts on `/api` paths.
    Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .layer(axum_middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
}
