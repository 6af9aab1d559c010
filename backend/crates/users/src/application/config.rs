//! Application Configuration
//!
//! Configuration for the Users application layer.

use std::time::Duration;

use platform::crypto::random_bytes;
use platform::password::HashingPolicy;
use platform::token::TokenCodec;

/// Users application configuration
#[derive(Debug, Clone)]
pub struct UsersConfig {
    /// How new password hashes are produced (variant, salt length, pepper)
    pub hashing: HashingPolicy,
    /// Signs and verifies bearer tokens
    pub tokens: TokenCodec,
    /// Bearer token lifetime
    pub token_ttl: Duration,
}

impl UsersConfig {
    pub fn new(hashing: HashingPolicy, tokens: TokenCodec, token_ttl: Duration) -> Self {
        Self {
            hashing,
            tokens,
            token_ttl,
        }
    }

    /// Random HS256 secret and default hashing; tokens die with the process
    pub fn development() -> Self {
        Self {
            hashing: HashingPolicy::default(),
            tokens: TokenCodec::hs256(random_bytes(32)),
            token_ttl: Duration::from_secs(3600),
        }
    }

    /// Token TTL in seconds, for the `exp` claim
    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }
}
