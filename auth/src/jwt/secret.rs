use std::fmt;

use super::errors::TokenError;

/// Symmetric key used to sign and verify access tokens.
///
/// Never empty. `Debug` output does not reveal the key material.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw key material.
    ///
    /// # Errors
    /// * `EmptySecret` - No key material was supplied
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_secret() {
        assert_eq!(
            SigningSecret::new(Vec::new()).unwrap_err(),
            TokenError::EmptySecret
        );
        assert_eq!(SigningSecret::new("").unwrap_err(), TokenError::EmptySecret);
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = SigningSecret::new("super-secret").unwrap();

        assert_eq!(secret.as_bytes(), b"super-secret");
        assert!(!format!("{:?}", secret).contains("super-secret"));
    }
}
