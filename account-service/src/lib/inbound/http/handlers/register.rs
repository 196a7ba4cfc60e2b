use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use super::ValidationErrors;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .credential_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::CREATED,
                RegisterResponseData {
                    message: "User registered successfully".to_string(),
                    user: user.into(),
                },
            )
        })
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let username = errors.check(
            "username",
            Username::new(self.username.unwrap_or_default()),
        );
        let email = errors.check("email", EmailAddress::new(self.email.unwrap_or_default()));
        let password = errors.check(
            "password",
            Password::new(self.password.unwrap_or_default()),
        );

        match (username, email, password) {
            (Some(username), Some(email), Some(password)) => {
                Ok(RegisterCommand::new(username, email, password))
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
    pub user: UserData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_valid_request_becomes_command() {
        let command = request("alice", "a@x.com", "password123")
            .try_into_command()
            .unwrap();
        assert_eq!(command.username.as_str(), "alice");
        assert_eq!(command.email.as_str(), "a@x.com");
        assert_eq!(command.password.expose(), "password123");
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let errors = request("a!", "nope", "short").try_into_command().unwrap_err();

        let ApiError::Validation(violations) = ApiError::from(errors) else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["username", "email", "password"]);
    }

    #[test]
    fn test_missing_fields_are_required() {
        let body: RegisterRequest = serde_json::from_str("{}").unwrap();
        let errors = body.try_into_command().unwrap_err();

        let ApiError::Validation(violations) = ApiError::from(errors) else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 3);
        assert!(violations
            .iter()
            .all(|v| v.message == "This field is required"));
    }
}
