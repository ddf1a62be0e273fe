//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing prices and discounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("discount must be in [0, 1), got {0}")]
    DiscountOutOfRange(Decimal),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NegativeAmount` for amounts below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::NegativeAmount(amount));
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Create a USD price from a whole number of cents.
    #[must_use]
    pub fn usd_cents(cents: u64) -> Self {
        Self {
            amount: Decimal::from(cents) / Decimal::ONE_HUNDRED,
            currency_code: CurrencyCode::USD,
        }
    }

    /// The price after taking `discount` off.
    #[must_use]
    pub fn discounted(&self, discount: Discount) -> Self {
        Self {
            amount: self.amount * (Decimal::ONE - discount.fraction()),
            currency_code: self.currency_code,
        }
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code,
        }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// A discount expressed as a fraction of the base price, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Discount(Decimal);

impl Discount {
    /// No discount.
    pub const NONE: Self = Self(Decimal::ZERO);

    /// Create a discount from a fraction.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::DiscountOutOfRange` unless `0 <= fraction < 1`.
    pub fn new(fraction: Decimal) -> Result<Self, PriceError> {
        if fraction < Decimal::ZERO || fraction >= Decimal::ONE {
            return Err(PriceError::DiscountOutOfRange(fraction));
        }
        Ok(Self(fraction))
    }

    /// Create a discount from whole percent points (`50` is half off).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::DiscountOutOfRange` for 100 or more.
    pub fn percent(points: u32) -> Result<Self, PriceError> {
        Self::new(Decimal::from(points) / Decimal::ONE_HUNDRED)
    }

    /// The discount as a fraction.
    #[must_use]
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Badge text shown next to a discounted price (e.g., "50%").
    #[must_use]
    pub fn badge(&self) -> String {
        format!("{}%", (self.0 * Decimal::ONE_HUNDRED).normalize())
    }
}

impl TryFrom<Decimal> for Discount {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Discount> for Decimal {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Symbol printed before the amount.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}
