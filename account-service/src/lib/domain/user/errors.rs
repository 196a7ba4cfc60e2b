use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("This field is required")]
    Required,

    #[error("Should be at least {min} characters long, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Should be at most {max} characters long, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Should contain only letters and digits")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("This field is required")]
    Required,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("This field is required")]
    Required,

    #[error("Should be at least {min} characters long, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Should be at most {max} bytes long, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error raised by user storage adapters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Username already exists: {0}")]
    UsernameConflict(String),

    #[error("Email already exists: {0}")]
    EmailConflict(String),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<UsernameError> for RepositoryError {
    fn from(err: UsernameError) -> Self {
        RepositoryError::InvalidRecord(format!("username: {}", err))
    }
}

impl From<EmailError> for RepositoryError {
    fn from(err: EmailError) -> Self {
        RepositoryError::InvalidRecord(format!("email: {}", err))
    }
}

/// Top-level error for all credential operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    // Domain-level errors
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for UserError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UsernameConflict(username) => UserError::UsernameTaken(username),
            RepositoryError::EmailConflict(email) => UserError::EmailTaken(email),
            RepositoryError::InvalidRecord(_) | RepositoryError::Database(_) => {
                UserError::Storage(err.to_string())
            }
        }
    }
}
