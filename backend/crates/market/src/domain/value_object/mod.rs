//! Value Objects Module

pub mod currency_code;
pub mod price;
