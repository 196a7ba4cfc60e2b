use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod get_profile;
pub mod health;
pub mod login;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Stable machine-readable error codes exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    InternalServerError,
    AuthEmailTaken,
    AuthUsernameTaken,
    AuthInvalidCredentials,
    AuthUserNotFound,
    AuthMissingHeader,
    AuthInvalidHeader,
    AuthTokenExpired,
    AuthTokenInvalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Accumulates per-field validation failures while a request is parsed.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Record the error of `result`, if any, against `field`.
    pub fn check<T, E: Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.violations.push(FieldViolation {
                    field: field.to_string(),
                    message: err.to_string(),
                });
                None
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.violations)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Detail is logged, never sent.
    InternalServerError(String),
    Validation(Vec<FieldViolation>),
    NotFound(ErrorCode, String),
    Conflict(ErrorCode, String),
    Unauthorized(ErrorCode, String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![FieldViolation {
            field: "request_body".to_string(),
            message: rejection.body_text(),
        }])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody::new(
                        ErrorCode::InternalServerError,
                        "An internal error occurred.".to_string(),
                    ),
                )
            }
            ApiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: ErrorCode::ValidationFailed,
                    message: "Request validation failed.".to_string(),
                    details: Some(violations),
                },
            ),
            ApiError::NotFound(code, message) => {
                (StatusCode::NOT_FOUND, ApiErrorBody::new(code, message))
            }
            ApiError::Conflict(code, message) => {
                (StatusCode::CONFLICT, ApiErrorBody::new(code, message))
            }
            ApiError::Unauthorized(code, message) => {
                (StatusCode::UNAUTHORIZED, ApiErrorBody::new(code, message))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken(_) => ApiError::Conflict(
                ErrorCode::AuthEmailTaken,
                "Email is already registered.".to_string(),
            ),
            UserError::UsernameTaken(_) => ApiError::Conflict(
                ErrorCode::AuthUsernameTaken,
                "Username is already taken.".to_string(),
            ),
            UserError::InvalidCredentials => ApiError::Unauthorized(
                ErrorCode::AuthInvalidCredentials,
                "Invalid email or password.".to_string(),
            ),
            UserError::NotFound(_) => ApiError::NotFound(
                ErrorCode::AuthUserNotFound,
                "User associated with token not found.".to_string(),
            ),
            UserError::Hashing(_)
            | UserError::TokenIssuance(_)
            | UserError::Storage(_)
            | UserError::Internal(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl ApiErrorBody {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
        }
    }
}

/// Public view of an account. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
