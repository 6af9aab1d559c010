//! Value Object Module

pub mod email;
pub mod gender;
pub mod user_password;
pub mod username;
