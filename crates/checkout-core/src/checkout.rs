//! # Checkout
//!
//! One checkout transaction: scan items, ask for the total.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Operations                                  │
//! │                                                                         │
//! │  Caller Action         Operation              State Change              │
//! │  ─────────────         ─────────              ────────────              │
//! │                                                                         │
//! │  Scan barcode ───────► scan(sku) ───────────► cart[sku] += 1            │
//! │                          └── "" → InvalidArgument (cart untouched)      │
//! │                                                                         │
//! │  Ask total ──────────► total_price() ───────► (read only)               │
//! │                          └── unpriced sku → PricingNotFound             │
//! │                                                                         │
//! │  Show lines ─────────► price_breakdown() ───► (read only)               │
//! │                                                                         │
//! │  NOTE: the total is recomputed from the cart on every call.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use checkout_core::{Checkout, PricingRule, PricingRules};
//!
//! let rules = PricingRules::new()
//!     .with_rule("A", PricingRule::bundled(50, 3, 130).unwrap())
//!     .with_rule("C", PricingRule::flat(20).unwrap());
//!
//! let mut checkout = Checkout::new(rules);
//! for sku in ["A", "C", "A", "A"] {
//!     checkout.scan(sku).unwrap();
//! }
//! assert_eq!(checkout.total_price().unwrap().minor(), 150);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::Money;
use crate::pricing::{PricingRule, PricingRules};
use crate::validation::{validate_scan_input, validate_sku};

// =============================================================================
// Transaction State
// =============================================================================

/// Where a transaction is in its (two-phase) lifecycle.
///
/// Both states accept `scan` and `total_price`; there is no closing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Just constructed, nothing scanned.
    Empty,
    /// At least one successful scan.
    Accumulating,
}

// =============================================================================
// Line Price
// =============================================================================

/// Priced line for one distinct item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinePrice {
    pub sku: String,
    /// Units scanned.
    pub quantity: u64,
    /// Whole bundle offers charged on this line.
    pub bundles_applied: u64,
    pub subtotal: Money,
}

// =============================================================================
// Checkout
// =============================================================================

/// A single checkout transaction.
///
/// ## Ownership
/// - `rules`: shared read-only with every other transaction (`Arc`)
/// - `cart`: owned exclusively by this transaction, dropped with it
///
/// For access from several threads wrap it in [`SharedCheckout`].
#[derive(Debug)]
pub struct Checkout {
    id: Uuid,
    started_at: DateTime<Utc>,
    rules: Arc<PricingRules>,
    cart: Cart,
}

impl Checkout {
    /// Starts a transaction against `rules` with an empty cart.
    ///
    /// Accepts an owned table or an `Arc` already shared with other
    /// transactions.
    pub fn new(rules: impl Into<Arc<PricingRules>>) -> Self {
        let checkout = Checkout {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            rules: rules.into(),
            cart: Cart::new(),
        };
        debug!(transaction = %checkout.id, rules = checkout.rules.len(), "Checkout started");
        checkout
    }

    /// Adds one unit of `sku` to the cart.
    ///
    /// ## Errors
    /// - `InvalidArgument` if `sku` is empty. The cart is not touched.
    ///
    /// Items missing from the pricing table are accepted here and only
    /// reported by [`total_price`](Self::total_price).
    pub fn scan(&mut self, sku: &str) -> CheckoutResult<()> {
        validate_sku(sku)?;
        self.record(sku);
        Ok(())
    }

    /// Adds one unit from a raw scanner read.
    ///
    /// `None` (no read) is rejected with `InvalidArgument`, as is `Some("")`.
    pub fn scan_input(&mut self, input: Option<&str>) -> CheckoutResult<()> {
        let sku = validate_scan_input(input)?;
        self.record(sku);
        Ok(())
    }

    fn record(&mut self, sku: &str) {
        let count = self.cart.add(sku);
        debug!(transaction = %self.id, sku, count, "Scanned item");
    }

    /// Total price of everything scanned so far.
    ///
    /// ## Algorithm
    /// ```text
    /// total = 0
    /// for (sku, count) in cart:
    ///     rule = rules[sku]            ← missing: PricingNotFound, abort
    ///     total += rule.subtotal(count) ← overflow: TotalOverflow, abort
    /// ```
    ///
    /// An empty cart totals 0. Calling this repeatedly without scanning
    /// in between returns the same value.
    pub fn total_price(&self) -> CheckoutResult<Money> {
        let mut total = Money::zero();
        for (sku, count) in self.cart.iter() {
            let subtotal = self.line_subtotal(sku, count)?;
            total = total
                .checked_add(subtotal)
                .ok_or_else(|| self.overflow(sku))?;
        }

        debug!(transaction = %self.id, total = %total, "Computed total price");
        Ok(total)
    }

    /// Priced lines ordered by sku. The subtotals add up to
    /// [`total_price`](Self::total_price) and fail the same way.
    pub fn price_breakdown(&self) -> CheckoutResult<Vec<LinePrice>> {
        self.cart
            .iter()
            .map(|(sku, count)| -> CheckoutResult<LinePrice> {
                Ok(LinePrice {
                    sku: sku.to_owned(),
                    quantity: count,
                    bundles_applied: self.rule_for(sku)?.bundles_applied(count),
                    subtotal: self.line_subtotal(sku, count)?,
                })
            })
            .collect()
    }

    fn line_subtotal(&self, sku: &str, count: u64) -> CheckoutResult<Money> {
        self.rule_for(sku)?
            .subtotal(count)
            .ok_or_else(|| self.overflow(sku))
    }

    fn overflow(&self, sku: &str) -> CheckoutError {
        warn!(transaction = %self.id, sku, "Price overflows the total");
        CheckoutError::TotalOverflow {
            sku: sku.to_owned(),
        }
    }

    fn rule_for(&self, sku: &str) -> CheckoutResult<&PricingRule> {
        self.rules.get(sku).ok_or_else(|| {
            warn!(transaction = %self.id, sku, "No pricing rule for scanned item");
            CheckoutError::PricingNotFound {
                sku: sku.to_owned(),
            }
        })
    }

    /// Transaction id, attached to every log event of this checkout.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the transaction was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// `Empty` until the first successful scan, then `Accumulating`.
    pub fn state(&self) -> TransactionState {
        if self.cart.is_empty() {
            TransactionState::Empty
        } else {
            TransactionState::Accumulating
        }
    }

    /// Items scanned so far.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The pricing table this transaction prices against.
    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }
}

// =============================================================================
// Shared Checkout
// =============================================================================

/// A checkout that several threads may drive.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Checkout>>`:
/// - `Arc`: shared ownership across threads
/// - `Mutex`: the read-modify-write in `scan` runs one caller at a time
///
/// Neither `scan` nor `total_price` can leave the cart half-updated, so a
/// poisoned lock is recovered rather than propagated.
#[derive(Debug, Clone)]
pub struct SharedCheckout {
    inner: Arc<Mutex<Checkout>>,
}

impl SharedCheckout {
    /// Moves `checkout` behind the mutex.
    pub fn new(checkout: Checkout) -> Self {
        SharedCheckout {
            inner: Arc::new(Mutex::new(checkout)),
        }
    }

    /// Locked [`Checkout::scan`].
    pub fn scan(&self, sku: &str) -> CheckoutResult<()> {
        self.lock().scan(sku)
    }

    /// Locked [`Checkout::total_price`].
    pub fn total_price(&self) -> CheckoutResult<Money> {
        self.lock().total_price()
    }

    /// Executes a function with exclusive access to the checkout.
    ///
    /// ## Usage
    /// ```rust
    /// # use checkout_core::{Checkout, PricingRules, SharedCheckout};
    /// let shared = SharedCheckout::new(Checkout::new(PricingRules::new()));
    /// let distinct = shared.with_checkout(|c| c.cart().distinct_items());
    /// assert_eq!(distinct, 0);
    /// ```
    pub fn with_checkout<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Checkout) -> R,
    {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Checkout> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Checkout> for SharedCheckout {
    fn from(checkout: Checkout) -> Self {
        SharedCheckout::new(checkout)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
