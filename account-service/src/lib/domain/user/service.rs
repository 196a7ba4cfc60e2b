use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Principal;
use tokio::task::JoinError;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialServicePort;
use crate::user::ports::UserRepository;

const SERVICE: &str = "CredentialService";

/// Domain service implementation for registration, login and profile lookup.
///
/// Password hashing and verification are CPU bound and run on the blocking
/// thread pool.
pub struct CredentialService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> CredentialService<UR>
where
    UR: UserRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> CredentialServicePort for CredentialService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self.repository.find_by_email(&command.email).await?.is_some() {
            tracing::info!(
                service = SERVICE,
                method = "register",
                email = %command.email,
                "Registration rejected, email already registered"
            );
            return Err(UserError::EmailTaken(command.email.to_string()));
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
                .await
                .map_err(|e| UserError::Hashing(e.to_string()))?
                .map_err(|e| UserError::Hashing(e.to_string()))?;

        let created_user = self
            .repository
            .create(NewUser {
                username: command.username,
                email: command.email,
                password_hash,
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    service = SERVICE,
                    method = "register",
                    error = %e,
                    "Failed to persist new user"
                );
                UserError::from(e)
            })?;

        tracing::info!(
            service = SERVICE,
            method = "register",
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            tracing::info!(
                service = SERVICE,
                method = "login",
                email = %command.email,
                "Login failed, unknown email"
            );
            return Err(UserError::InvalidCredentials);
        };

        let user_id = user.id;
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let authentication = tokio::task::spawn_blocking(move || {
            let subject = user.id.to_string();
            authenticator.authenticate(
                password.expose(),
                &user.password_hash,
                Principal {
                    subject: &subject,
                    username: user.username.as_str(),
                    email: user.email.as_str(),
                },
            )
        })
        .await
        .map_err(authentication_task_failed)?;

        match authentication {
            Ok(result) => {
                tracing::info!(
                    service = SERVICE,
                    method = "login",
                    user_id = %user_id,
                    "User logged in"
                );
                Ok(AccessToken::new(result.access_token))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(
                    service = SERVICE,
                    method = "login",
                    user_id = %user_id,
                    "Login failed, wrong password"
                );
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::Token(e)) => {
                tracing::error!(
                    service = SERVICE,
                    method = "login",
                    user_id = %user_id,
                    error = %e,
                    "Token issuance failed"
                );
                Err(UserError::TokenIssuance(e.to_string()))
            }
        }
    }

    async fn get_profile(&self, id: &UserId) -> Result<User, UserError> {
        let user = self.repository.find_by_id(id).await?;
        if user.is_none() {
            tracing::info!(
                service = SERVICE,
                method = "get_profile",
                user_id = %id,
                "Profile requested for unknown user"
            );
        }
        user.ok_or(UserError::NotFound(id.to_string()))
    }
}

fn authentication_task_failed(err: JoinError) -> UserError {
    UserError::Internal(format!("authentication task failed: {}", err))
}
