//! # Pricing Rules
//!
//! Per-item pricing configuration and the bundle offer math.
//!
//! ## Rule Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         PricingRule                                     │
//! │                                                                         │
//! │  Flat { unit_price }                                                    │
//! │  └── subtotal = count × unit_price                                      │
//! │                                                                         │
//! │  Bundled { unit_price, quantity, bundle_price }                         │
//! │  ├── count <  quantity: subtotal = count × unit_price                   │
//! │  └── count >= quantity: subtotal = (count div quantity) × bundle_price  │
//! │                                  + (count mod quantity) × unit_price    │
//! │                                                                         │
//! │  Example: A = 50, 3-for-130, count 7                                    │
//! │           2 × 130 + 1 × 50 = 310                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File
//! ```toml
//! [items.A]
//! unit_price = 50
//! bundle_quantity = 3
//! bundle_price = 130
//!
//! [items.C]
//! unit_price = 20
//! ```
//!
//! The same shape is accepted as JSON. `bundle_quantity` and `bundle_price`
//! come as a pair; half an offer is rejected at load time.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_bundle_quantity, validate_price, validate_sku, ValidationResult};
use crate::PRICING_PATH_ENV;

// =============================================================================
// Pricing Rule
// =============================================================================

/// How one item is priced.
///
/// "No offer" is its own variant rather than a pair of empty fields, so a
/// rule can never carry a bundle quantity without a bundle price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingRule {
    /// Every unit costs `unit_price`.
    Flat { unit_price: Money },

    /// Every `quantity` units cost `bundle_price`; leftovers cost `unit_price`.
    ///
    /// Nothing requires `bundle_price < quantity × unit_price`.
    Bundled {
        unit_price: Money,
        quantity: u64,
        bundle_price: Money,
    },
}

impl PricingRule {
    /// Creates a rule without an offer.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::PricingRule;
    ///
    /// let c = PricingRule::flat(20).unwrap();
    /// assert_eq!(c.subtotal(3).unwrap().minor(), 60);
    /// assert!(PricingRule::flat(-1).is_err());
    /// ```
    pub fn flat(unit_price: i64) -> ValidationResult<Self> {
        validate_price("unit_price", unit_price)?;
        Ok(PricingRule::Flat {
            unit_price: Money::from_minor(unit_price),
        })
    }

    /// Creates a rule with a "`quantity` for `bundle_price`" offer.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::PricingRule;
    ///
    /// let e = PricingRule::bundled(40, 4, 120).unwrap();
    /// assert_eq!(e.subtotal(4).unwrap().minor(), 120);
    /// assert!(PricingRule::bundled(40, 0, 120).is_err());
    /// ```
    pub fn bundled(unit_price: i64, quantity: u64, bundle_price: i64) -> ValidationResult<Self> {
        validate_price("unit_price", unit_price)?;
        validate_bundle_quantity(quantity)?;
        validate_price("bundle_price", bundle_price)?;
        Ok(PricingRule::Bundled {
            unit_price: Money::from_minor(unit_price),
            quantity,
            bundle_price: Money::from_minor(bundle_price),
        })
    }

    /// Builds a rule from the configuration shape
    /// `(unit_price, optional bundle_quantity, optional bundle_price)`.
    ///
    /// Both bundle fields or neither; one without the other is an error.
    pub fn from_parts(
        unit_price: i64,
        bundle_quantity: Option<u64>,
        bundle_price: Option<i64>,
    ) -> ValidationResult<Self> {
        match (bundle_quantity, bundle_price) {
            (None, None) => Self::flat(unit_price),
            (Some(quantity), Some(price)) => Self::bundled(unit_price, quantity, price),
            (Some(_), None) => Err(ValidationError::Required {
                field: "bundle_price".to_string(),
            }),
            (None, Some(_)) => Err(ValidationError::Required {
                field: "bundle_quantity".to_string(),
            }),
        }
    }

    /// Returns the single-unit price.
    pub fn unit_price(&self) -> Money {
        match *self {
            PricingRule::Flat { unit_price } | PricingRule::Bundled { unit_price, .. } => {
                unit_price
            }
        }
    }

    /// Returns `(quantity, bundle_price)` when the rule has an offer.
    pub fn bundle(&self) -> Option<(u64, Money)> {
        match *self {
            PricingRule::Flat { .. } => None,
            PricingRule::Bundled {
                quantity,
                bundle_price,
                ..
            } => Some((quantity, bundle_price)),
        }
    }

    /// Number of whole bundles charged for `count` units.
    pub fn bundles_applied(&self, count: u64) -> u64 {
        match self.bundle() {
            Some((quantity, _)) if count >= quantity => count / quantity,
            _ => 0,
        }
    }

    /// Price of `count` units of this item, `None` if it overflows i64.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::PricingRule;
    ///
    /// let a = PricingRule::bundled(50, 3, 130).unwrap();
    /// assert_eq!(a.subtotal(2).unwrap().minor(), 100); // below threshold
    /// assert_eq!(a.subtotal(3).unwrap().minor(), 130);
    /// assert_eq!(a.subtotal(7).unwrap().minor(), 310); // 2 × 130 + 1 × 50
    ///
    /// let huge = PricingRule::flat(i64::MAX).unwrap();
    /// assert!(huge.subtotal(2).is_none());
    /// ```
    pub fn subtotal(&self, count: u64) -> Option<Money> {
        match *self {
            PricingRule::Bundled {
                unit_price,
                quantity,
                bundle_price,
            } if count >= quantity => {
                let groups = count / quantity;
                let remainder = count % quantity;
                bundle_price
                    .checked_multiply_quantity(groups)?
                    .checked_add(unit_price.checked_multiply_quantity(remainder)?)
            }
            _ => self.unit_price().checked_multiply_quantity(count),
        }
    }
}

// =============================================================================
// File Shape
// =============================================================================

/// One entry of the pricing file, before invariants are checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPricingRule {
    unit_price: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    bundle_quantity: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    bundle_price: Option<i64>,
}

impl From<&PricingRule> for RawPricingRule {
    fn from(rule: &PricingRule) -> Self {
        let bundle = rule.bundle();
        RawPricingRule {
            unit_price: rule.unit_price().minor(),
            bundle_quantity: bundle.map(|(quantity, _)| quantity),
            bundle_price: bundle.map(|(_, price)| price.minor()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPricingTable {
    #[serde(default)]
    items: BTreeMap<String, RawPricingRule>,
}

// =============================================================================
// Pricing Rules Table
// =============================================================================

/// The pricing table: item identifier → rule.
///
/// Built once, then handed to every [`Checkout`](crate::Checkout) read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingRules {
    rules: HashMap<String, PricingRule>,
}

impl PricingRules {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::{PricingRule, PricingRules};
    ///
    /// let rules = PricingRules::new()
    ///     .with_rule("A", PricingRule::bundled(50, 3, 130).unwrap())
    ///     .with_rule("C", PricingRule::flat(20).unwrap());
    /// assert_eq!(rules.len(), 2);
    /// ```
    pub fn with_rule(mut self, sku: impl Into<String>, rule: PricingRule) -> Self {
        self.insert(sku, rule);
        self
    }

    /// Adds or replaces the rule for `sku`. Returns the replaced rule.
    pub fn insert(&mut self, sku: impl Into<String>, rule: PricingRule) -> Option<PricingRule> {
        self.rules.insert(sku.into(), rule)
    }

    /// Looks up the rule for `sku`.
    pub fn get(&self, sku: &str) -> Option<&PricingRule> {
        self.rules.get(sku)
    }

    /// Whether `sku` is priced. Callers that want scan-time rejection of
    /// unknown items check this before scanning.
    pub fn contains(&self, sku: &str) -> bool {
        self.rules.contains_key(sku)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over `(sku, rule)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PricingRule)> {
        self.rules.iter().map(|(sku, rule)| (sku.as_str(), rule))
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Parses a TOML pricing table.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let raw: RawPricingTable = toml::from_str(contents)?;
        Self::from_raw(raw)
    }

    /// Parses a JSON pricing table (same shape as the TOML file).
    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        let raw: RawPricingTable = serde_json::from_str(contents)?;
        Self::from_raw(raw)
    }

    /// Serializes the table back to the TOML file shape, ordered by sku.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let raw = RawPricingTable {
            items: self
                .rules
                .iter()
                .map(|(sku, rule)| (sku.clone(), RawPricingRule::from(rule)))
                .collect(),
        };
        toml::to_string_pretty(&raw)
    }

    /// Reads a pricing file. `.json` files are parsed as JSON, everything
    /// else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let rules = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_toml_str(&contents)?
        };

        info!(?path, items = rules.len(), "Loaded pricing rules");
        Ok(rules)
    }

    /// Loads the pricing table.
    ///
    /// ## Load Order
    /// 1. `config_path`, when given
    /// 2. The file named by the `CHECKOUT_PRICING_PATH` environment variable
    /// 3. Otherwise `ConfigError::MissingPath`; there is no default table
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let path = config_path
            .or_else(|| std::env::var_os(PRICING_PATH_ENV).map(PathBuf::from))
            .ok_or(ConfigError::MissingPath {
                env_var: PRICING_PATH_ENV,
            })?;

        debug!(?path, "Resolved pricing file");
        Self::from_file(path)
    }

    fn from_raw(raw: RawPricingTable) -> ConfigResult<Self> {
        let mut rules = HashMap::with_capacity(raw.items.len());

        for (sku, entry) in raw.items {
            let rule = validate_sku(&sku)
                .and_then(|_| {
                    PricingRule::from_parts(entry.unit_price, entry.bundle_quantity, entry.bundle_price)
                })
                .map_err(|e| ConfigError::InvalidRule {
                    sku: sku.clone(),
                    reason: e.to_string(),
                })?;
            rules.insert(sku, rule);
        }

        Ok(PricingRules { rules })
    }
}

impl<S: Into<String>> FromIterator<(S, PricingRule)> for PricingRules {
    fn from_iter<I: IntoIterator<Item = (S, PricingRule)>>(iter: I) -> Self {
        PricingRules {
            rules: iter.into_iter().map(|(sku, rule)| (sku.into(), rule)).collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_TOML: &str = include_str!("../config/pricing.example.toml");

    #[test]
    fn test_flat_subtotal_is_linear() {
        let d = PricingRule::flat(15).unwrap();
        for count in 0..20 {
            assert_eq!(d.subtotal(count).unwrap().minor(), 15 * count as i64);
        }
        assert_eq!(d.bundle(), None);
        assert_eq!(d.bundles_applied(10), 0);
    }

    #[test]
    fn test_bundle_below_threshold_uses_unit_price() {
        let f = PricingRule::bundled(10, 5, 40).unwrap();
        for count in 0..5 {
            assert_eq!(f.subtotal(count).unwrap().minor(), 10 * count as i64);
            assert_eq!(f.bundles_applied(count), 0);
        }
    }

    #[test]
    fn test_bundle_at_and_above_threshold() {
        let (unit, q, p) = (60_i64, 2_u64, 100_i64);
        let h = PricingRule::bundled(unit, q, p).unwrap();
        for count in q..30 {
            let expected = (count / q) as i64 * p + (count % q) as i64 * unit;
            assert_eq!(h.subtotal(count).unwrap().minor(), expected, "count {count}");
        }
        assert_eq!(h.bundles_applied(5), 2);
    }

    #[test]
    fn test_bundle_of_one_replaces_unit_price() {
        let rule = PricingRule::bundled(50, 1, 45).unwrap();
        assert_eq!(rule.subtotal(4).unwrap().minor(), 180);
    }

    #[test]
    fn test_bundle_need_not_be_a_discount() {
        // 2-for-70 on a 30 unit price is accepted and charged as configured
        let rule = PricingRule::bundled(30, 2, 70).unwrap();
        assert_eq!(rule.subtotal(2).unwrap().minor(), 70);
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        let x = PricingRule::flat(5_000_000_000_000_000_000).unwrap();
        assert!(x.subtotal(1).is_some());
        assert_eq!(x.subtotal(2), None);

        // Each part fits, the bundle part plus the remainder does not
        let y = PricingRule::bundled(i64::MAX / 2 + 1, 2, i64::MAX).unwrap();
        assert_eq!(y.subtotal(2), Some(Money::from_minor(i64::MAX)));
        assert_eq!(y.subtotal(3), None);
    }

    #[test]
    fn test_rule_constructors_enforce_invariants() {
        assert!(PricingRule::flat(0).is_ok());
        assert!(PricingRule::bundled(0, 1, 0).is_ok());

        assert!(matches!(
            PricingRule::flat(-1),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "unit_price"
        ));
        assert!(matches!(
            PricingRule::bundled(10, 0, 5),
            Err(ValidationError::MustBePositive { ref field }) if field == "bundle_quantity"
        ));
        assert!(matches!(
            PricingRule::bundled(10, 2, -5),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "bundle_price"
        ));
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            PricingRule::from_parts(20, None, None).unwrap(),
            PricingRule::flat(20).unwrap()
        );
        assert_eq!(
            PricingRule::from_parts(50, Some(3), Some(130)).unwrap(),
            PricingRule::bundled(50, 3, 130).unwrap()
        );
        assert!(PricingRule::from_parts(50, Some(3), None).is_err());
        assert!(PricingRule::from_parts(50, None, Some(130)).is_err());
    }

    #[test]
    fn test_example_toml_loads() {
        let rules = PricingRules::from_toml_str(EXAMPLE_TOML).unwrap();

        assert_eq!(rules.len(), 8);
        assert_eq!(rules.get("A"), Some(&PricingRule::bundled(50, 3, 130).unwrap()));
        assert_eq!(rules.get("C"), Some(&PricingRule::flat(20).unwrap()));
        assert_eq!(rules.get("H"), Some(&PricingRule::bundled(60, 2, 100).unwrap()));
        assert!(!rules.contains("Z"));
    }

    #[test]
    fn test_json_matches_toml() {
        let json = r#"{
            "items": {
                "A": { "unit_price": 50, "bundle_quantity": 3, "bundle_price": 130 },
                "C": { "unit_price": 20 }
            }
        }"#;
        let rules = PricingRules::from_json_str(json).unwrap();

        let expected = PricingRules::new()
            .with_rule("A", PricingRule::bundled(50, 3, 130).unwrap())
            .with_rule("C", PricingRule::flat(20).unwrap());
        assert_eq!(rules, expected);
    }

    #[test]
    fn test_half_a_bundle_is_rejected_with_sku() {
        let toml = r#"
            [items.B]
            unit_price = 30
            bundle_quantity = 2
        "#;
        match PricingRules::from_toml_str(toml) {
            Err(ConfigError::InvalidRule { sku, reason }) => {
                assert_eq!(sku, "B");
                assert_eq!(reason, "bundle_price is required");
            }
            other => panic!("expected InvalidRule, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_price_and_unknown_field_rejected() {
        let negative = r#"
            [items.C]
            unit_price = -20
        "#;
        assert!(matches!(
            PricingRules::from_toml_str(negative),
            Err(ConfigError::InvalidRule { ref sku, .. }) if sku == "C"
        ));

        let typo = r#"
            [items.C]
            unit_prize = 20
        "#;
        assert!(matches!(
            PricingRules::from_toml_str(typo),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_empty_sku_key_rejected() {
        let json = r#"{ "items": { "": { "unit_price": 1 } } }"#;
        assert!(matches!(
            PricingRules::from_json_str(json),
            Err(ConfigError::InvalidRule { ref sku, .. }) if sku.is_empty()
        ));
    }

    #[test]
    fn test_toml_round_trip_preserves_rules() {
        let rules = PricingRules::from_toml_str(EXAMPLE_TOML).unwrap();
        let written = rules.to_toml_string().unwrap();
        assert_eq!(PricingRules::from_toml_str(&written).unwrap(), rules);
    }

    #[test]
    fn test_from_file_and_load() {
        let dir = std::env::temp_dir();
        let toml_path = dir.join(format!("checkout-pricing-{}.toml", uuid::Uuid::new_v4()));
        let json_path = dir.join(format!("checkout-pricing-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&toml_path, EXAMPLE_TOML).unwrap();
        std::fs::write(&json_path, r#"{ "items": { "G": { "unit_price": 25 } } }"#).unwrap();

        assert_eq!(PricingRules::from_file(&toml_path).unwrap().len(), 8);
        assert_eq!(
            PricingRules::from_file(&json_path).unwrap().get("G"),
            Some(&PricingRule::flat(25).unwrap())
        );
        assert_eq!(PricingRules::load(Some(toml_path.clone())).unwrap().len(), 8);

        // Only test in the crate that touches the environment variable
        std::env::remove_var(PRICING_PATH_ENV);
        assert!(matches!(
            PricingRules::load(None),
            Err(ConfigError::MissingPath { .. })
        ));
        std::env::set_var(PRICING_PATH_ENV, &json_path);
        assert_eq!(PricingRules::load(None).unwrap().len(), 1);
        std::env::remove_var(PRICING_PATH_ENV);

        let missing = dir.join(format!("checkout-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            PricingRules::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        std::fs::remove_file(toml_path).unwrap();
        std::fs::remove_file(json_path).unwrap();
    }

    #[test]
    fn test_from_iterator() {
        let rules: PricingRules = vec![
            ("C", PricingRule::flat(20).unwrap()),
            ("D", PricingRule::flat(15).unwrap()),
        ]
        .into_iter()
        .collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.iter().count(), 2);
    }
}
