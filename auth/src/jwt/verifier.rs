use std::fmt::Display;
use std::str::FromStr;

use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenState;
use super::errors::TokenError;
use super::secret::SigningSecret;

/// Claims of a verified token together with the parsed subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken<Id> {
    pub subject: Id,
    pub claims: Claims,
}

/// Validates access tokens issued by [`TokenIssuer`](super::TokenIssuer).
///
/// Checks run in this order: algorithm and signature, claim shape and issuer,
/// temporal validity (`nbf`, `exp`, no leeway), subject format.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a new verifier.
    ///
    /// # Arguments
    /// * `secret` - Signing key the tokens were issued with
    /// * `issuer` - Expected `iss` claim
    pub fn new(secret: &SigningSecret, issuer: &str) -> Self {
        // Only HS256 is accepted; headers naming any other algorithm are rejected.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp", "nbf"]);
        validation.set_issuer(&[issuer]);
        validation.leeway = 0;
        // Temporal checks are done against `Claims::state_at` after decoding.
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and parse its subject as `Id`.
    ///
    /// # Errors
    /// * `Invalid` - Bad signature, unexpected algorithm or issuer, not yet valid
    /// * `Expired` - `exp` is in the past
    /// * `Malformed` - Undecodable token, missing or mistyped claims, unparsable subject
    pub fn verify<Id>(&self, token: &str) -> Result<VerifiedToken<Id>, TokenError>
    where
        Id: FromStr,
        Id::Err: Display,
    {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        match claims.state_at(Utc::now().timestamp()) {
            TokenState::Valid => {}
            TokenState::Expired => return Err(TokenError::Expired),
            TokenState::NotYetValid => {
                return Err(TokenError::Invalid("Token is not yet valid".to_string()))
            }
        }

        let subject = claims
            .sub
            .parse::<Id>()
            .map_err(|e| TokenError::Malformed(format!("Invalid subject: {}", e)))?;

        Ok(VerifiedToken { subject, claims })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::encode;
    use jsonwebtoken::EncodingKey;
    use jsonwebtoken::Header;
    use serde_json::json;

    use super::*;
    use crate::jwt::claims::Principal;
    use crate::jwt::issuer::TokenIssuer;

    const SECRET: &str = "my_secret_key_at_least_32_bytes_long!";
    const ISSUER: &str = "account-service";

    fn secret(value: &str) -> SigningSecret {
        SigningSecret::new(value).unwrap()
    }

    fn principal() -> Principal<'static> {
        Principal {
            subject: "42",
            username: "alice",
            email: "a@x.com",
        }
    }

    fn sign_raw(payload: serde_json::Value, algorithm: Algorithm) -> String {
        encode(
            &Header::new(algorithm),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new(&secret(SECRET), ISSUER);
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);

        let token = issuer.issue(principal()).expect("Failed to issue token");
        let verified: VerifiedToken<u64> = verifier.verify(&token).expect("Failed to verify");

        assert_eq!(verified.subject, 42);
        assert_eq!(verified.claims.username, "alice");
        assert_eq!(verified.claims.email, "a@x.com");
        assert_eq!(verified.claims.iss, ISSUER);
    }

    #[test]
    fn test_expired_token_is_expired_not_invalid() {
        let issuer = TokenIssuer::new(&secret(SECRET), ISSUER);
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);

        let token = issuer
            .issue_at(principal(), Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(
            verifier.verify::<u64>(&token).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_not_yet_valid_token_is_invalid() {
        let issuer = TokenIssuer::new(&secret(SECRET), ISSUER);
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);

        let token = issuer
            .issue_at(principal(), Utc::now() + Duration::minutes(10))
            .unwrap();

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = TokenIssuer::new(&secret("secret1_at_least_32_bytes_long_key!"), ISSUER);
        let verifier = TokenVerifier::new(&secret("secret2_at_least_32_bytes_long_key!"), ISSUER);

        let token = issuer.issue(principal()).unwrap();

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_and_expired_is_invalid() {
        let issuer = TokenIssuer::new(&secret("secret1_at_least_32_bytes_long_key!"), ISSUER);
        let verifier = TokenVerifier::new(&secret("secret2_at_least_32_bytes_long_key!"), ISSUER);

        let token = issuer
            .issue_at(principal(), Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let issuer = TokenIssuer::new(&secret(SECRET), "someone-else");
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);

        let token = issuer.issue(principal()).unwrap();

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_other_hmac_algorithm() {
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);
        let now = Utc::now().timestamp();

        let token = sign_raw(
            json!({
                "sub": "42", "iat": now, "nbf": now, "exp": now + 3600,
                "iss": ISSUER, "username": "alice", "email": "a@x.com"
            }),
            Algorithm::HS384,
        );

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_none_and_asymmetric_headers() {
        let issuer = TokenIssuer::new(&secret(SECRET), ISSUER);
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);

        let genuine = issuer.issue(principal()).unwrap();
        let payload = genuine.split('.').nth(1).unwrap();

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
        assert!(verifier.verify::<u64>(&unsigned).is_err());

        // {"alg":"RS256","typ":"JWT"} with the genuine HMAC signature
        let signature = genuine.split('.').nth(2).unwrap();
        let confused = format!(
            "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{}.{}",
            payload, signature
        );
        assert!(matches!(
            verifier.verify::<u64>(&confused),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_subject_is_malformed() {
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);
        let now = Utc::now().timestamp();

        let token = sign_raw(
            json!({
                "iat": now, "nbf": now, "exp": now + 3600,
                "iss": ISSUER, "username": "alice", "email": "a@x.com"
            }),
            Algorithm::HS256,
        );

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_subject_type_is_malformed() {
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);
        let now = Utc::now().timestamp();

        let token = sign_raw(
            json!({
                "sub": 42, "iat": now, "nbf": now, "exp": now + 3600,
                "iss": ISSUER, "username": "alice", "email": "a@x.com"
            }),
            Algorithm::HS256,
        );

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_unparsable_subject_is_malformed() {
        let issuer = TokenIssuer::new(&secret(SECRET), ISSUER);
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);

        let token = issuer
            .issue(Principal {
                subject: "not-a-number",
                username: "alice",
                email: "a@x.com",
            })
            .unwrap();

        assert!(matches!(
            verifier.verify::<u64>(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let verifier = TokenVerifier::new(&secret(SECRET), ISSUER);

        assert!(matches!(
            verifier.verify::<u64>("invalid.token.here"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            verifier.verify::<u64>("not-a-jwt"),
            Err(TokenError::Malformed(_))
        ));
    }
}
