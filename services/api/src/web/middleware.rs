//! services/api/src/web/middleware.rs
//!
//! Cross-origin handling for everything under `/api`, and bearer-token
//! authentication for the protected routes.

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, ORIGIN,
        },
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{error::ServiceError, web::state::AppState};

const ALLOWED_HEADERS: &str = "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, \
     Authorization, accept, origin, Cache-Control, X-Requested-With";
const ALLOWED_METHODS: &str = "POST, OPTIONS, GET, PUT, DELETE";

/// The email of the caller, put into request extensions once their token checks out.
#[derive(Debug, Clone)]
pub struct AuthenticatedEmail(pub String);

/// Whether a request path falls under the `/api` surface.
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Answers preflight requests and stamps CORS headers on every `/api` response.
/// Requests outside `/api` pass through untouched.
///
/// The request's `Origin` is reflected back rather than answering with `*`,
/// since browsers refuse a wildcard origin on credentialed requests.
pub async fn cors(req: Request, next: Next) -> Response {
    if !is_api_path(req.uri().path()) {
        return next.run(req).await;
    }

    let origin = req
        .headers()
        .get(ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    // Preflight never reaches routing, so it works for any path.
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );

    response
}

/// Middleware that validates the `Authorization: Bearer <token>` header.
///
/// If valid, inserts the caller's email into request extensions for handlers to use.
/// If invalid, missing or expired, returns 401 Unauthorized before the body is read.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let email = state
        .tokens
        .verify_bearer(header)
        .ok_or(ServiceError::Unauthorized)?;

    req.extensions_mut().insert(AuthenticatedEmail(email));

    Ok(next.run(req).await)
}
