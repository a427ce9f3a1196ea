//! # Cart
//!
//! The multiset of scanned items for one transaction.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Checkout::new ──► Cart (empty)                                         │
//! │                        │                                                │
//! │  scan("A") ───────────►│ A: 1                                           │
//! │  scan("A") ───────────►│ A: 2                                           │
//! │  scan("B") ───────────►│ A: 2, B: 1                                     │
//! │                        │                                                │
//! │  No remove / void: counts only ever grow.                               │
//! │  Dropped together with its Checkout.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// Scanned item identifier → count.
///
/// ## Invariants
/// - Every stored count is >= 1 (an item is present only once scanned)
/// - Counts never decrease
///
/// Ordered by sku so breakdowns come out stable; totals do not depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: BTreeMap<String, u64>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more unit of `sku` and returns its new count.
    ///
    /// Validation happens in [`Checkout::scan`](crate::Checkout::scan);
    /// the cart itself stores any key.
    pub fn add(&mut self, sku: &str) -> u64 {
        let count = self.items.entry(sku.to_owned()).or_insert(0);
        *count += 1;
        *count
    }

    /// Count of `sku` scanned so far (0 if never scanned).
    pub fn count(&self, sku: &str) -> u64 {
        self.items.get(sku).copied().unwrap_or(0)
    }

    /// Number of different items scanned.
    pub fn distinct_items(&self) -> usize {
        self.items.len()
    }

    /// Total units scanned across all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(sku, count)` pairs ordered by sku.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.items.iter().map(|(sku, count)| (sku.as_str(), *count))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_starts_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.distinct_items(), 0);
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.count("A"), 0);
    }

    #[test]
    fn test_add_same_item_increases_count() {
        let mut cart = Cart::new();

        assert_eq!(cart.add("A"), 1);
        assert_eq!(cart.add("A"), 2);
        assert_eq!(cart.add("B"), 1);

        assert_eq!(cart.distinct_items(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.count("A"), 2);
    }

    #[test]
    fn test_iteration_order_is_by_sku() {
        let mut cart = Cart::new();
        cart.add("H");
        cart.add("A");
        cart.add("E");

        let skus: Vec<&str> = cart.iter().map(|(sku, _)| sku).collect();
        assert_eq!(skus, vec!["A", "E", "H"]);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut first = Cart::new();
        for sku in ["A", "B", "A"] {
            first.add(sku);
        }
        let mut second = Cart::new();
        for sku in ["B", "A", "A"] {
            second.add(sku);
        }
        assert_eq!(first, second);
    }
}
