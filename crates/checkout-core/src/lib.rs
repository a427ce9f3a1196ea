//! # checkout-core: Scan and Price
//!
//! Point-of-sale checkout calculator. Items are scanned one at a time and
//! the total is computed with per-item "N for a fixed price" bundle offers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Architecture                            │
//! │                                                                         │
//! │  pricing.toml / pricing.json                                           │
//! │        │  PricingRules::load (once, at startup)                        │
//! │        ▼                                                                │
//! │  ┌─────────────────┐   Arc (read-only)   ┌─────────────────────────┐   │
//! │  │  PricingRules   │ ──────────────────► │  Checkout (1 per txn)   │   │
//! │  │  sku → rule     │                     │  ├── Cart  sku → count  │   │
//! │  └─────────────────┘                     │  ├── scan(sku)          │   │
//! │                                          │  └── total_price()      │   │
//! │                                          └─────────────────────────┘   │
//! │                                                                         │
//! │  NO I/O IN scan / total_price • INTEGER MONEY • TYPED ERRORS           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`checkout`] - Checkout transaction, SharedCheckout, LinePrice
//! - [`pricing`] - PricingRule (Flat / Bundled) and the PricingRules table
//! - [`cart`] - Scanned item counts
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input and rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use checkout_core::{Checkout, CheckoutError, PricingRule, PricingRules};
//!
//! let rules = PricingRules::new()
//!     .with_rule("A", PricingRule::bundled(50, 3, 130).unwrap())
//!     .with_rule("B", PricingRule::bundled(30, 2, 45).unwrap());
//!
//! let mut checkout = Checkout::new(rules);
//! for sku in ["A", "B", "A", "A", "B"] {
//!     checkout.scan(sku).unwrap();
//! }
//! assert_eq!(checkout.total_price().unwrap().minor(), 175);
//!
//! // Unpriced items are accepted at scan time and rejected when pricing
//! checkout.scan("Z").unwrap();
//! assert!(matches!(
//!     checkout.total_price(),
//!     Err(CheckoutError::PricingNotFound { .. })
//! ));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use checkout::{Checkout, LinePrice, SharedCheckout, TransactionState};
pub use error::{CheckoutError, CheckoutResult, ConfigError, ConfigResult, ValidationError};
pub use money::Money;
pub use pricing::{PricingRule, PricingRules};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Environment variable naming the pricing file when
/// [`PricingRules::load`] is called without a path.
pub const PRICING_PATH_ENV: &str = "CHECKOUT_PRICING_PATH";
