//! Entity Module

pub mod group;
pub mod telegram;
pub mod user;
