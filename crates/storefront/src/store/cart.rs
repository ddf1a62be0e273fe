//! Cart contents: an ordered list of lines, at most one per product.

use std::sync::Arc;

use sneaker_shop_core::{Price, ProductId};

use crate::catalog::Product;

/// A product and how many of it are in the cart. Quantity is at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Arc<Product>,
    pub quantity: u32,
}

impl CartLine {
    /// Final unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.final_price.times(self.quantity)
    }
}

/// Ordered cart lines keyed by product id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.line(id).is_some()
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// Returns `false` (and leaves the cart untouched) when `quantity` is 0.
    pub fn add(&mut self, product: &Arc<Product>, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product: Arc::clone(product),
                quantity,
            }),
        }
        true
    }

    /// Drop the line for `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != id);
        self.lines.len() != before
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over all lines (the header badge).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        let mut total = Price::usd_cents(0);
        if let Some(first) = self.lines.first() {
            total.currency_code = first.product.final_price.currency_code;
        }
        for line in &self.lines {
            total.amount += line.line_total().amount;
        }
        total
    }
}
