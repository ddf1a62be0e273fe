//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::{ParseProductIdError, ProductId};
pub use price::{Discount, Price, PriceError};
