use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Lifetime of an access token in seconds, counted from issuance.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Identity a token is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal<'a> {
    /// Unique identity identifier, becomes the `sub` claim
    pub subject: &'a str,
    pub username: &'a str,
    pub email: &'a str,
}

/// Temporal validity of a token relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    NotYetValid,
    Valid,
    Expired,
}

/// Access token payload.
///
/// Standard RFC 7519 claims plus denormalized identity attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    pub username: String,
    pub email: String,
}

impl Claims {
    /// Create claims for a principal, valid from `issued_at` for [`TOKEN_LIFETIME_SECS`].
    pub fn for_principal(
        principal: Principal<'_>,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expiration = issued_at + Duration::seconds(TOKEN_LIFETIME_SECS);

        Self {
            sub: principal.subject.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expiration.timestamp(),
            iss: issuer.to_string(),
            username: principal.username.to_string(),
            email: principal.email.to_string(),
        }
    }

    /// Validity of the claims at `timestamp`.
    ///
    /// `nbf` is inclusive and `exp` exclusive.
    pub fn state_at(&self, timestamp: i64) -> TokenState {
        if timestamp >= self.exp {
            TokenState::Expired
        } else if timestamp < self.nbf {
            TokenState::NotYetValid
        } else {
            TokenState::Valid
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.state_at(current_timestamp) == TokenState::Expired
    }
}
