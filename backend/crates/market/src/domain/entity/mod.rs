//! Entity Module

pub mod cart;
pub mod currency;
pub mod product;
pub mod shop;
