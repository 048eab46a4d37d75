use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::extract::ApiJson;
use super::types::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse};
use super::{ApiError, AppState};
use crate::db::User;
use crate::services::Identity;

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a valid `Authorization: Bearer <token>` header and
/// stores the verified [`Identity`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = {
        let token = extract_bearer(request.headers()).ok_or_else(|| {
            ApiError::Unauthorized("Access denied. No token provided".to_string())
        })?;
        state.auth().verify_token(token)?
    };

    tracing::Span::current().record("user_id", identity.user_id);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// ============================================================================
// Extractors
// ============================================================================

/// Any authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(Self)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// An authenticated caller holding the admin flag. Handlers take this before
/// any body extractor so that non-admins are turned away without the body
/// being read.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        if !identity.is_admin {
            return Err(ApiError::Forbidden("Access denied. Admins only".to_string()));
        }
        Ok(Self(identity))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .auth()
        .register(
            &payload.email,
            &payload.password,
            payload.is_admin.unwrap_or(false),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }

    let result = state.auth().login(&payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: result.token,
        user: result.user,
    }))
}

/// POST /auth/logout
///
/// Tokens are not tracked server side, so this only acknowledges the client
/// dropping its copy.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = state.auth().current_user(identity).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }
}
