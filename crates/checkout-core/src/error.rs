//! # Error Types
//!
//! Domain-specific error types for checkout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CheckoutError    - scan / total_price failures                        │
//! │  ├── InvalidArgument(ValidationError)                                  │
//! │  ├── PricingNotFound { sku }                                           │
//! │  └── TotalOverflow { sku }                                             │
//! │                                                                         │
//! │  ValidationError  - field-level input failures                         │
//! │                                                                         │
//! │  ConfigError      - pricing file loading failures                      │
//! │                                                                         │
//! │  Flow: ValidationError → CheckoutError (scan)                          │
//! │        ValidationError → ConfigError   (rule construction on load)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, field name)
//! 3. Errors are enum variants, never String
//! 4. No error is ever swallowed into a default price

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Checkout Error
// =============================================================================

/// Errors raised by the checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The scanned identifier was missing or empty.
    ///
    /// ## When This Occurs
    /// - `scan("")`
    /// - `scan_input(None)` (scanner produced no read)
    ///
    /// The cart is left untouched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// A scanned item has no pricing rule.
    ///
    /// ## User Workflow
    /// ```text
    /// scan("Z")          ← accepted, Z is well-formed
    ///      │
    ///      ▼
    /// total_price()
    ///      │
    ///      ▼
    /// PricingNotFound { sku: "Z" }   (no partial total)
    /// ```
    #[error("The item '{sku}' does not have a defined price")]
    PricingNotFound { sku: String },

    /// A line subtotal or the running total left the i64 range.
    ///
    /// Aborts `total_price` like `PricingNotFound`; no wrapped or partial
    /// total is ever returned.
    #[error("Price of '{sku}' overflows the total")]
    TotalOverflow { sku: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used both for scanned identifiers and for pricing rule construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading a pricing table from a file or string.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The pricing file could not be read.
    #[error("Failed to read pricing file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error.
    #[error("Invalid TOML pricing config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or shape error.
    #[error("Invalid JSON pricing config: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule was well-formed syntactically but breaks a pricing invariant.
    #[error("Invalid pricing rule for '{sku}': {reason}")]
    InvalidRule { sku: String, reason: String },

    /// Neither an explicit path nor the environment variable was given.
    #[error("No pricing file given (set {env_var})")]
    MissingPath { env_var: &'static str },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CheckoutError.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Convenience type alias for pricing config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================
