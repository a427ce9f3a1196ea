//! # Validation Module
//!
//! Input validation for scanned identifiers and pricing rules.
//!
//! ## Validation Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Runs                              │
//! │                                                                         │
//! │  scan(item)                                                             │
//! │  └── validate_sku         non-empty identifier                          │
//! │      (pricing table is NOT consulted here)                              │
//! │                                                                         │
//! │  PricingRule::flat / PricingRule::bundled / config load                 │
//! │  ├── validate_price       unit_price >= 0, bundle_price >= 0            │
//! │  └── validate_bundle_quantity   quantity >= 1                           │
//! │                                                                         │
//! │  total_price()                                                          │
//! │  └── rule lookup          unknown item → PricingNotFound                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use checkout_core::validation::{validate_bundle_quantity, validate_sku};
//!
//! validate_sku("A").unwrap();
//! assert!(validate_sku("").is_err());
//! assert!(validate_bundle_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a scanned item identifier.
///
/// ## Rules
/// - Must not be empty
///
/// Any other string is a well-formed identifier, including ones the pricing
/// table does not know. Whitespace is significant and is not trimmed.
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional scanner read.
///
/// `None` means the scanner produced nothing and is rejected the same way
/// as an empty string.
pub fn validate_scan_input(input: Option<&str>) -> ValidationResult<&str> {
    let sku = input.ok_or_else(|| ValidationError::Required {
        field: "sku".to_string(),
    })?;
    validate_sku(sku)?;
    Ok(sku)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in minor units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, free bundles)
///
/// ## Example
/// ```rust
/// use checkout_core::validation::validate_price;
///
/// assert!(validate_price("unit_price", 50).is_ok());
/// assert!(validate_price("unit_price", 0).is_ok());
/// assert!(validate_price("bundle_price", -1).is_err());
/// ```
pub fn validate_price(field: &str, minor: i64) -> ValidationResult<()> {
    if minor < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the quantity that triggers a bundle offer.
///
/// ## Rules
/// - Must be positive (>= 1); a zero-quantity bundle would divide by zero
pub fn validate_bundle_quantity(quantity: u64) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "bundle_quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("A").is_ok());
        assert!(validate_sku("COKE-330").is_ok());
        // Well-formed even though no pricing table has it
        assert!(validate_sku("NOT-PRICED").is_ok());
        assert!(validate_sku(" ").is_ok());

        assert_eq!(
            validate_sku(""),
            Err(ValidationError::Required {
                field: "sku".to_string()
            })
        );
    }

    #[test]
    fn test_validate_scan_input() {
        assert_eq!(validate_scan_input(Some("B")), Ok("B"));
        assert!(validate_scan_input(Some("")).is_err());
        assert!(validate_scan_input(None).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("unit_price", 0).is_ok());
        assert!(validate_price("unit_price", 130).is_ok());

        let err = validate_price("bundle_price", -5).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("bundle_price must be between 0 and {}", i64::MAX)
        );
    }

    #[test]
    fn test_validate_bundle_quantity() {
        assert!(validate_bundle_quantity(1).is_ok());
        assert!(validate_bundle_quantity(5).is_ok());
        assert_eq!(
            validate_bundle_quantity(0).unwrap_err().to_string(),
            "bundle_quantity must be positive"
        );
    }
}
