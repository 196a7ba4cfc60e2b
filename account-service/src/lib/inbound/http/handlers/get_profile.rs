use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    current_user: AuthenticatedUser,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let user = state
        .credential_service
        .get_profile(&current_user.user_id)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ProfileResponseData {
            message: "Welcome to your profile!".to_string(),
            user: (&user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub message: String,
    pub user: UserData,
}
