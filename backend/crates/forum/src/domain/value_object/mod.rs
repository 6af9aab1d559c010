//! Value Objects Module

pub mod tag_name;
pub mod text;
pub mod topic_symbol;
