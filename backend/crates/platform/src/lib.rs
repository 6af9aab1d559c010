//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Secure random bytes
//! - Password hashing (Argon2, configurable variant and salt length)
//! - Signed session tokens (HMAC JWT)
//! - Bearer token extraction from request headers

pub mod bearer;
pub mod crypto;
pub mod password;
pub mod token;
