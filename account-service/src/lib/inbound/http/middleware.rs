use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenError;
use auth::VerifiedToken;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use super::handlers::ApiError;
use super::handlers::ErrorCode;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Identity of the caller, placed in request extensions by [`authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

impl From<VerifiedToken<UserId>> for AuthenticatedUser {
    fn from(token: VerifiedToken<UserId>) -> Self {
        Self {
            user_id: token.subject,
            username: token.claims.username,
            email: token.claims.email,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                ApiError::InternalServerError(
                    "AuthenticatedUser requested on a route without the auth middleware"
                        .to_string(),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("Authorization header is missing")]
    MissingCredential,

    #[error("Authorization header is not of the form `Bearer <token>`")]
    MalformedCredential,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::MissingCredential => ApiError::Unauthorized(
                ErrorCode::AuthMissingHeader,
                "Authorization header is required.".to_string(),
            ),
            AuthorizationError::MalformedCredential => ApiError::Unauthorized(
                ErrorCode::AuthInvalidHeader,
                "Authorization header format must be Bearer {token}.".to_string(),
            ),
            AuthorizationError::Token(TokenError::Expired) => ApiError::Unauthorized(
                ErrorCode::AuthTokenExpired,
                "Token has expired.".to_string(),
            ),
            AuthorizationError::Token(_) => ApiError::Unauthorized(
                ErrorCode::AuthTokenInvalid,
                "Token is invalid.".to_string(),
            ),
        }
    }
}

/// Middleware that validates bearer tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current_user =
        authorize(&state.authenticator, req.headers().get(AUTHORIZATION)).map_err(|e| {
            tracing::warn!(error = %e, uri = %req.uri(), "Request rejected by authorization gate");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}

fn authorize(
    authenticator: &Authenticator,
    header: Option<&HeaderValue>,
) -> Result<AuthenticatedUser, AuthorizationError> {
    let token = extract_bearer_token(header)?;
    let verified: VerifiedToken<UserId> = authenticator.validate_token(token)?;
    Ok(verified.into())
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively and must be separated from a
/// non-empty token by exactly one space.
pub fn extract_bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthorizationError> {
    let value = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthorizationError::MissingCredential),
    };
    let value = value
        .to_str()
        .map_err(|_| AuthorizationError::MalformedCredential)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        // "Bearer " with nothing after it is malformed (AUTH_INVALID_HEADER), not missing.
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthorizationError::MalformedCredential),
    }
}
