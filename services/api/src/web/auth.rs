//! services/api/src/web/auth.rs
//!
//! Token issuance and verification.
//!
//! Anyone who knows the shared secret can exchange it, together with an email
//! address, for a signed token (HS512 JWT) that expires three hours later. The
//! relay endpoint only accepts requests carrying such a token. Tokens are
//! self-contained: nothing is stored server-side and nothing can be revoked.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::ServiceError, web::state::AppState};

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60 * 3;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Body of `POST /api/token`. Missing fields are treated as empty.
#[derive(Deserialize, ToSchema)]
pub struct TokenRequest {
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub email: String,
}

/// What a token carries.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique per issuance, so two tokens for the same email never collide.
    pub jti: Uuid,
}

//=========================================================================================
// Token Service
//=========================================================================================

/// Issues and verifies tokens. Holds only immutable key material, so one
/// instance is shared by every request.
pub struct TokenService {
    user_secret: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(user_secret: impl Into<String>, signing_key: &[u8]) -> Self {
        // Expiry is checked against an explicit clock in `verify_at`, the library
        // only has to insist that the claim is present.
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            user_secret: user_secret.into(),
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
        }
    }

    /// Issues a token for `email` if `secret` matches the shared secret.
    pub fn issue(&self, secret: &str, email: &str) -> Result<String, ServiceError> {
        self.issue_at(secret, email, Utc::now())
    }

    pub fn issue_at(
        &self,
        secret: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        if secret != self.user_secret {
            return Err(ServiceError::Unauthorized);
        }
        if email.is_empty() {
            return Err(ServiceError::InvalidRequest("Email required".to_string()));
        }

        let claims = TokenClaims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Returns the email embedded in a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<String> {
        self.verify_at(token, Utc::now())
    }

    /// Every failure (bad signature, wrong algorithm, garbage, expiry) collapses
    /// to `None`; callers never learn which one it was.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let data = match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                debug!("Token rejected: {}", e);
                return None;
            }
        };

        if data.claims.exp <= now.timestamp() {
            debug!("Token rejected: expired");
            return None;
        }

        Some(data.claims.email)
    }

    /// Verifies the value of an `Authorization` header of the form `Bearer <token>`.
    pub fn verify_bearer(&self, header: Option<&str>) -> Option<String> {
        let token = header?.strip_prefix("Bearer ")?;
        self.verify(token)
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/token - Exchange the shared secret and an email for a token
#[utoipa::path(
    post,
    path = "/api/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Signed token", body = String, content_type = "text/plain"),
        (status = 400, description = "Email required"),
        (status = 401, description = "Wrong secret")
    )
)]
pub async fn issue_token_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<String, ServiceError> {
    let Json(req) = payload.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;

    let token = state.tokens.issue(&req.secret, &req.email)?;
    info!(email = %req.email, "Issued token");
    Ok(token)
}
