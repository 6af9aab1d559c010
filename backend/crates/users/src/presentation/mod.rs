//! Presentation Layer
//!
//! HTTP handlers, DTOs and the bearer-auth helper shared with other routers.

pub mod auth;
pub mod dto;
pub mod handlers;
pub mod router;
