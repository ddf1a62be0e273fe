//! Session-related types.
//!
//! The session only identifies the browser. Its storage and history mirror
//! are kept server-side in [`crate::browsers::Browsers`] under that id.

/// Session keys for browser state.
pub mod keys {
    /// Key for the browser's [`crate::browsers::BrowserId`].
    pub const BROWSER_ID: &str = "browser_id";
}
