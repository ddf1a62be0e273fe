//! Session models for storefront.

pub mod session;

pub use session::keys;
