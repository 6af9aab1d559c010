//! Password Hashing and Verification
//!
//! Salted Argon2 hashing with:
//! - A configurable variant (`argon2id` by default, `argon2i`, `argon2d`)
//! - A configurable salt length drawn from the OS RNG
//! - An optional application-wide pepper
//! - Zeroization of clear text and peppered buffers
//!
//! Hashes are PHC strings, so the variant, cost parameters and salt travel
//! with the hash and verification never depends on the current policy.

use std::fmt;
use std::str::FromStr;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::random_bytes;

// ============================================================================
// Constants
// ============================================================================

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Default salt length in bytes
pub const DEFAULT_SALT_LENGTH: usize = 16;

/// Argon2 refuses salts shorter than this
pub const MIN_SALT_LENGTH: usize = 8;

/// Longest salt whose base64 form fits a PHC salt field
pub const MAX_SALT_LENGTH: usize = 48;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Unknown hash method: {0}")]
    UnknownMethod(String),

    #[error("Salt length must be between {min} and {max} bytes (got {actual})")]
    InvalidSaltLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Hash Method
// ============================================================================

/// Argon2 variant used for new hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashMethod {
    #[default]
    Argon2id,
    Argon2i,
    Argon2d,
}

impl HashMethod {
    pub const fn name(&self) -> &'static str {
        match self {
            HashMethod::Argon2id => "argon2id",
            HashMethod::Argon2i => "argon2i",
            HashMethod::Argon2d => "argon2d",
        }
    }

    const fn algorithm(&self) -> Algorithm {
        match self {
            HashMethod::Argon2id => Algorithm::Argon2id,
            HashMethod::Argon2i => Algorithm::Argon2i,
            HashMethod::Argon2d => Algorithm::Argon2d,
        }
    }
}

impl FromStr for HashMethod {
    type Err = PasswordHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2id" => Ok(HashMethod::Argon2id),
            "argon2i" => Ok(HashMethod::Argon2i),
            "argon2d" => Ok(HashMethod::Argon2d),
            other => Err(PasswordHashError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Hashing Policy
// ============================================================================

/// How new password hashes are produced
#[derive(Clone)]
pub struct HashingPolicy {
    method: HashMethod,
    salt_length: usize,
    params: Params,
    pepper: Option<Zeroizing<Vec<u8>>>,
}

impl HashingPolicy {
    /// Policy with the given variant and salt length, default Argon2 cost
    pub fn new(method: HashMethod, salt_length: usize) -> Result<Self, PasswordHashError> {
        if !(MIN_SALT_LENGTH..=MAX_SALT_LENGTH).contains(&salt_length) {
            return Err(PasswordHashError::InvalidSaltLength {
                min: MIN_SALT_LENGTH,
                max: MAX_SALT_LENGTH,
                actual: salt_length,
            });
        }

        Ok(Self {
            method,
            salt_length,
            params: Params::default(),
            pepper: None,
        })
    }

    /// Override the Argon2 cost parameters
    ///
    /// ## Arguments
    /// * `memory_kib` - memory size in KiB
    /// * `iterations` - number of passes
    /// * `parallelism` - degree of parallelism
    pub fn with_cost(
        mut self,
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashError> {
        self.params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))?;
        Ok(self)
    }

    /// Append an application-wide secret to every password before hashing
    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.pepper = Some(Zeroizing::new(pepper.into()));
        self
    }

    pub fn method(&self) -> HashMethod {
        self.method
    }

    pub fn salt_length(&self) -> usize {
        self.salt_length
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(self.method.algorithm(), Version::V0x13, self.params.clone())
    }

    fn peppered(&self, password: &[u8]) -> Zeroizing<Vec<u8>> {
        let mut combined = Zeroizing::new(password.to_vec());
        if let Some(pepper) = &self.pepper {
            combined.extend_from_slice(pepper);
        }
        combined
    }
}

impl Default for HashingPolicy {
    fn default() -> Self {
        Self {
            method: HashMethod::default(),
            salt_length: DEFAULT_SALT_LENGTH,
            params: Params::default(),
            pepper: None,
        }
    }
}

impl fmt::Debug for HashingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashingPolicy")
            .field("method", &self.method)
            .field("salt_length", &self.salt_length)
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Unicode is normalized using NFKC before validation. The password
    /// must not be blank, must not exceed [`MAX_PASSWORD_LENGTH`]
    /// characters and must not contain control characters other than
    /// tab and newline.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let raw = Zeroizing::new(raw);
        let normalized: String = raw.nfkc().collect();
        let normalized = Self(normalized);

        if normalized.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.0.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(normalized)
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password with a fresh random salt
    pub fn hash(&self, policy: &HashingPolicy) -> Result<HashedPassword, PasswordHashError> {
        let salt_bytes = Zeroizing::new(random_bytes(policy.salt_length));
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        let password = policy.peppered(self.as_bytes());
        let hash = policy
            .hasher()
            .hash_password(&password, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// The variant, cost and salt come from the PHC string; only the pepper
    /// is taken from the policy. Argon2 compares the digests in constant time.
    pub fn verify(&self, password: &ClearTextPassword, policy: &HashingPolicy) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        let password = policy.peppered(password.as_bytes());
        Argon2::default()
            .verify_password(&password, &parsed_hash)
            .is_ok()
    }

    /// True when the hash was produced with a different variant or cost
    pub fn needs_rehash(&self, policy: &HashingPolicy) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return true;
        };

        if parsed_hash.algorithm != policy.method.algorithm().ident() {
            return true;
        }

        match Params::try_from(&parsed_hash) {
            Ok(params) => {
                params.m_cost() != policy.params.m_cost()
                    || params.t_cost() != policy.params.t_cost()
                    || params.p_cost() != policy.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_policy(method: HashMethod) -> HashingPolicy {
        HashingPolicy::new(method, DEFAULT_SALT_LENGTH)
            .unwrap()
            .with_cost(1024, 1, 1)
            .unwrap()
    }

    fn password(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_password_policy() {
        assert!(ClearTextPassword::new("secret1".to_string()).is_ok());
        assert_eq!(
            ClearTextPassword::new("".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            ClearTextPassword::new("   ".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert!(matches!(
            ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1)),
            Err(PasswordPolicyError::TooLong { .. })
        ));
        assert_eq!(
            ClearTextPassword::new("bad\u{0007}bell".to_string()).unwrap_err(),
            PasswordPolicyError::InvalidCharacter
        );
    }

    #[test]
    fn test_hash_method_parsing() {
        assert_eq!("argon2id".parse::<HashMethod>().unwrap(), HashMethod::Argon2id);
        assert_eq!("Argon2I".parse::<HashMethod>().unwrap(), HashMethod::Argon2i);
        assert_eq!(HashMethod::Argon2d.to_string(), "argon2d");
        assert!(matches!(
            "scrypt".parse::<HashMethod>(),
            Err(PasswordHashError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_salt_length_bounds() {
        assert!(HashingPolicy::new(HashMethod::Argon2id, MIN_SALT_LENGTH).is_ok());
        assert!(HashingPolicy::new(HashMethod::Argon2id, MAX_SALT_LENGTH).is_ok());
        assert!(matches!(
            HashingPolicy::new(HashMethod::Argon2id, 4),
            Err(PasswordHashError::InvalidSaltLength { actual: 4, .. })
        ));
        assert!(HashingPolicy::new(HashMethod::Argon2id, 64).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let policy = cheap_policy(HashMethod::Argon2id);
        let hashed = password("secret1").hash(&policy).unwrap();

        assert!(hashed.verify(&password("secret1"), &policy));
        assert!(!hashed.verify(&password("secret1x"), &policy));
    }

    #[test]
    fn test_each_method_embeds_its_algorithm() {
        for method in [HashMethod::Argon2id, HashMethod::Argon2i, HashMethod::Argon2d] {
            let policy = cheap_policy(method);
            let hashed = password("correct horse").hash(&policy).unwrap();

            assert!(hashed.as_phc_string().starts_with(&format!("${}$", method.name())));
            // Verification reads the variant from the hash, not the policy
            assert!(hashed.verify(&password("correct horse"), &HashingPolicy::default()));
        }
    }

    #[test]
    fn test_salt_is_random() {
        let policy = cheap_policy(HashMethod::Argon2id);
        let a = password("same").hash(&policy).unwrap();
        let b = password("same").hash(&policy).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_hash_with_pepper() {
        let peppered = cheap_policy(HashMethod::Argon2id).with_pepper(b"pepper".to_vec());
        let plain = cheap_policy(HashMethod::Argon2id);
        let hashed = password("secret1").hash(&peppered).unwrap();

        assert!(hashed.verify(&password("secret1"), &peppered));
        assert!(!hashed.verify(&password("secret1"), &plain));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let policy = cheap_policy(HashMethod::Argon2id);
        let hashed = password("secret1").hash(&policy).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password("secret1"), &policy));
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_needs_rehash() {
        let policy = cheap_policy(HashMethod::Argon2id);
        let hashed = password("secret1").hash(&policy).unwrap();

        assert!(!hashed.needs_rehash(&policy));
        assert!(hashed.needs_rehash(&cheap_policy(HashMethod::Argon2i)));
        assert!(hashed.needs_rehash(&HashingPolicy::default()));
    }

    #[test]
    fn test_debug_redaction() {
        let debug_output = format!("{:?}", password("hunter2"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("hunter2"));

        let policy = HashingPolicy::default().with_pepper(b"pepper".to_vec());
        assert!(!format!("{:?}", policy).contains("pepper\""));
    }
}
