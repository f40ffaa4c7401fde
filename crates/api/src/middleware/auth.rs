//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use classiq_core::{Principal, Role};
use classiq_shared::types::UserId;
use classiq_shared::{AppError, Claims, JwtError};

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn reject(code: &'static str, message: &str) -> Response {
    ApiError::new(StatusCode::UNAUTHORIZED, code, message).into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Resolves the role claim and stores the [`Principal`] in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return reject(
            "missing_token",
            "Authorization header with Bearer token is required",
        );
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => return reject("token_expired", "Token has expired"),
        Err(_) => return reject("invalid_token", "Invalid or malformed token"),
    };

    let Ok(principal) = principal_from(&claims) else {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "token carries unknown role");
        return reject("invalid_token", "Invalid or malformed token");
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

fn principal_from(claims: &Claims) -> Result<Principal, String> {
    let role: Role = claims.role.parse()?;
    Ok(Principal::new(UserId::from_uuid(claims.user_id()), role))
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(AuthUser(principal): AuthUser) -> impl IntoResponse {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("no authenticated principal".into()).into())
    }
}
