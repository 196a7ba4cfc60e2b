//! Credential primitives for the account service.
//!
//! - Password hashing (Argon2id)
//! - Access token issuance and verification (HS256 JWT, one hour lifetime)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Principal, SigningSecret, TokenIssuer, TokenVerifier};
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(&secret, "account-service");
//! let verifier = TokenVerifier::new(&secret, "account-service");
//!
//! let token = issuer
//!     .issue(Principal { subject: "17", username: "alice", email: "a@x.com" })
//!     .unwrap();
//! let verified = verifier.verify::<u64>(&token).unwrap();
//! assert_eq!(verified.subject, 17);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::Principal;
pub use jwt::SigningSecret;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use jwt::VerifiedToken;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
