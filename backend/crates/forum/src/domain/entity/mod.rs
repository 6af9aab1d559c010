//! Entity Module

pub mod post;
pub mod tag;
pub mod thread;
pub mod topic;
