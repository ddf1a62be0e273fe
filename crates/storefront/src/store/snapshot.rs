//! Serialized form of [`AppState`] kept in storage.
//!
//! Products are stored by id and resolved against the catalog on restore.
//! Stored text is untrusted: unknown ids fall back to the default product,
//! lines for unknown products are dropped and the image index is clamped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sneaker_shop_core::ProductId;
use thiserror::Error;

use super::{AppState, Cart, ViewName};
use crate::catalog::Catalog;

/// Storage key holding the serialized app state.
pub const STORAGE_KEY: &str = "sneaker-shop:app-state";

/// Bumped whenever [`StateSnapshot`] changes shape.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is not supported (expected {})", SNAPSHOT_VERSION)]
    Version { found: u32 },
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    saved_at: DateTime<Utc>,
    state: StateSnapshot,
}

/// Id-based copy of [`AppState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub product_id: ProductId,
    pub selected_image: usize,
    pub quantity: u32,
    pub cart: Vec<CartLineSnapshot>,
    pub view: ViewName,
    pub cart_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineSnapshot {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl StateSnapshot {
    #[must_use]
    pub fn capture(state: &AppState) -> Self {
        Self {
            product_id: state.product.id,
            selected_image: state.selected_image,
            quantity: state.quantity,
            cart: state
                .cart
                .lines()
                .iter()
                .map(|line| CartLineSnapshot {
                    product_id: line.product.id,
                    quantity: line.quantity,
                })
                .collect(),
            view: state.view,
            cart_open: state.cart_open,
        }
    }

    /// Rebuild the state, re-establishing its invariants.
    #[must_use]
    pub fn resolve(self, catalog: &Catalog) -> AppState {
        let product = catalog.get(self.product_id).map_or_else(
            || {
                tracing::warn!(product_id = %self.product_id, "Stored product no longer exists");
                Arc::clone(catalog.first())
            },
            Arc::clone,
        );

        let mut cart = Cart::new();
        for line in self.cart {
            match catalog.get(line.product_id) {
                Some(product) => {
                    cart.add(product, line.quantity);
                }
                None => {
                    tracing::warn!(product_id = %line.product_id, "Dropping unknown cart line");
                }
            }
        }

        let last_image = product.image_count().saturating_sub(1);
        AppState {
            selected_image: self.selected_image.min(last_image),
            product,
            quantity: self.quantity,
            cart,
            view: self.view,
            cart_open: self.cart_open,
        }
    }
}

/// Serialize `state` with version and timestamp.
///
/// # Errors
///
/// Returns the serializer error, which does not happen for well-formed state.
pub fn encode(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        state: StateSnapshot::capture(state),
    })
}

/// Parse stored text back into state.
///
/// # Errors
///
/// Returns `SnapshotError` for malformed text or a different version.
pub fn decode(text: &str, catalog: &Catalog) -> Result<AppState, SnapshotError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Version {
            found: envelope.version,
        });
    }
    Ok(envelope.state.resolve(catalog))
}
