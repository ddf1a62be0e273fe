//! Sneaker Shop Core - Shared types library.
//!
//! This crate provides the value types shared by the storefront and its tests:
//! - [`ProductId`] - type-safe catalog identifier
//! - [`Price`], [`Discount`] - decimal money and discount fractions
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no templates. This
//! keeps it lightweight and usable from any layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
