//! # Money Module
//!
//! Provides the `Money` type for prices and totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    unit price 50, bundle 3-for-130: every step is exact                 │
//! │    (7 div 3) × 130 + (7 mod 3) × 50 = 310                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use checkout_core::money::Money;
//!
//! let unit = Money::from_minor(50);
//! let line = unit.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line.minor(), 150);
//!
//! let total = line.checked_add(Money::from_minor(45)).unwrap();
//! assert_eq!(total.minor(), 195);
//!
//! // Overflow is reported, never wrapped
//! assert!(Money::from_minor(i64::MAX).checked_add(line).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: same width the pricing table is configured in; the
///   table validators keep configured prices non-negative
/// - **Checked arithmetic only**: a product or sum that leaves the i64
///   range comes back as `None`, the caller turns it into an error
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No currency**: the checkout never formats or converts currencies
///
/// ## Where Money is Used
/// ```text
/// PricingRule.unit_price ──┬──► count × unit_price ─────────┐
///                          │                                ├──► LinePrice.subtotal
/// PricingRule.bundle_price ┴──► groups × bundle_price ──────┘          │
///                                                                       ▼
///                                                          total_price() (sum)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::money::Money;
    ///
    /// let price = Money::from_minor(130);
    /// assert_eq!(price.minor(), 130);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a scanned quantity.
    ///
    /// Returns `None` when the quantity does not fit in an i64 or the
    /// product overflows.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(40);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_minor(120)));
    /// assert_eq!(Money::from_minor(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: u64) -> Option<Self> {
        let qty = i64::try_from(qty).ok()?;
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Money(sum)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain minor units. Currency formatting belongs to whoever prints it.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
