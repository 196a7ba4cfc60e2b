pub mod claims;
pub mod errors;
pub mod issuer;
pub mod secret;
pub mod verifier;

pub use claims::Claims;
pub use claims::Principal;
pub use claims::TokenState;
pub use claims::TOKEN_LIFETIME_SECS;
pub use errors::TokenError;
pub use issuer::TokenIssuer;
pub use secret::SigningSecret;
pub use verifier::TokenVerifier;
pub use verifier::VerifiedToken;
