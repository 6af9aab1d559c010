//! Signed Session Tokens
//!
//! HMAC-signed JWTs carrying an arbitrary JSON claim map. Only the `exp`
//! claim is validated, and only when present; issuing code decides what
//! else goes in the map.

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::Value;
use thiserror::Error;
use zeroize::Zeroizing;

/// Claim map carried by a token
pub type Claims = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens with a default secret
#[derive(Clone)]
pub struct TokenCodec {
    secret: Zeroizing<Vec<u8>>,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// ## Arguments
    /// * `secret` - default signing secret
    /// * `algorithm` - one of `HS256`, `HS384`, `HS512`
    pub fn new(secret: impl Into<Vec<u8>>, algorithm: &str) -> Result<Self, TokenError> {
        let algorithm = Algorithm::from_str(algorithm.trim())
            .ok()
            .filter(|alg| matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512))
            .ok_or_else(|| TokenError::UnsupportedAlgorithm(algorithm.to_string()))?;

        Ok(Self {
            secret: Zeroizing::new(secret.into()),
            algorithm,
        })
    }

    /// HS256 codec; infallible counterpart of [`TokenCodec::new`]
    pub fn hs256(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sign the claims; `secret` overrides the default secret for this call
    pub fn issue(&self, claims: &Claims, secret: Option<&[u8]>) -> Result<String, TokenError> {
        let key = EncodingKey::from_secret(secret.unwrap_or(self.secret.as_slice()));
        Ok(encode(&Header::new(self.algorithm), claims, &key)?)
    }

    /// Decode and check the token
    ///
    /// Returns `None` for a bad signature, a malformed token, a different
    /// algorithm or an `exp` in the past.
    pub fn verify(&self, token: &str, secret: Option<&[u8]>) -> Option<Claims> {
        let key = DecodingKey::from_secret(secret.unwrap_or(self.secret.as_slice()));

        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.leeway = 0;

        match decode::<Claims>(token, &key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Token rejected");
                None
            }
        }
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde_json::json;

    use super::*;

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    fn claims(value: Value) -> Claims {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let codec = TokenCodec::new(b"k".to_vec(), "HS256").unwrap();
        let original = claims(json!({"sub": "u1", "role": "member", "n": 3}));

        let token = codec.issue(&original, None).unwrap();
        assert_eq!(codec.verify(&token, None), Some(original));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = TokenCodec::new(b"k".to_vec(), "HS256").unwrap();
        let token = codec.issue(&claims(json!({"sub": "u1"})), None).unwrap();

        assert!(codec.verify(&token, Some(b"other".as_slice())).is_none());
        let other = TokenCodec::new(b"other".to_vec(), "HS256").unwrap();
        assert!(other.verify(&token, None).is_none());
    }

    #[test]
    fn test_secret_override() {
        let codec = TokenCodec::new(b"default".to_vec(), "HS256").unwrap();
        let token = codec
            .issue(&claims(json!({"sub": "u1"})), Some(b"override".as_slice()))
            .unwrap();

        assert!(codec.verify(&token, None).is_none());
        assert!(codec.verify(&token, Some(b"override".as_slice())).is_some());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(b"k".to_vec(), "HS256").unwrap();
        let expired = claims(json!({"sub": "u1", "exp": now() - 60}));
        let live = claims(json!({"sub": "u1", "exp": now() + 60}));

        let token = codec.issue(&expired, None).unwrap();
        assert!(codec.verify(&token, None).is_none());

        let token = codec.issue(&live, None).unwrap();
        assert!(codec.verify(&token, None).is_some());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let codec = TokenCodec::new(b"k".to_vec(), "HS256").unwrap();
        assert!(codec.verify("not.a.token", None).is_none());
        assert!(codec.verify("", None).is_none());
    }

    #[test]
    fn test_algorithm_must_match() {
        let hs384 = TokenCodec::new(b"k".to_vec(), "HS384").unwrap();
        let hs256 = TokenCodec::new(b"k".to_vec(), "HS256").unwrap();
        let token = hs384.issue(&claims(json!({"sub": "u1"})), None).unwrap();

        assert!(hs384.verify(&token, None).is_some());
        assert!(hs256.verify(&token, None).is_none());
    }

    #[test]
    fn test_unsupported_algorithm() {
        assert!(matches!(
            TokenCodec::new(b"k".to_vec(), "RS256"),
            Err(TokenError::UnsupportedAlgorithm(_))
        ));
        assert!(TokenCodec::new(b"k".to_vec(), "none").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let codec = TokenCodec::new(b"supersecret".to_vec(), "HS512").unwrap();
        assert!(!format!("{:?}", codec).contains("supersecret"));
    }
}
