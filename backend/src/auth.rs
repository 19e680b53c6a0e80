//! Bearer token authentication
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. Issuing tokens is outside the
//! API surface; [`issue_token`] exists for operators and tests.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Identity carried by a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Subject (user id)
    pub id: String,
    /// Email address, if the issuer included one
    pub email: Option<String>,
    /// Display name, if the issuer included one
    pub name: Option<String>,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at (unix seconds)
    pub iat: usize,
    /// Expiry (unix seconds)
    pub exp: usize,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Sign a token for `user` valid for `ttl_secs` seconds
///
/// A negative `ttl_secs` yields an already expired token.
pub fn issue_token(secret: &str, user: &AuthUser, ttl_secs: i64) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.max(0) as usize,
        exp: (now + ttl_secs).max(0) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
}

/// Check signature and expiry of `token`
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Token validation failed: {}", e)))
}

/// Require a valid `Authorization: Bearer` header
///
/// On success the caller's [`AuthUser`] is inserted into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let secret = state
        .jwt_secret()
        .ok_or_else(|| AppError::Unauthorized("JWT_SECRET is not configured".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing Bearer token".to_string()))?;

    let claims = verify_token(secret, token.trim())?;
    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}
