//! # Pricing Engine
//!
//! Turns cart quantities into amounts, applying "N for P" bulk offers.
//!
//! ## The Partition Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Banana: unit 50, offer 3 for 130, quantity 7                           │
//! │                                                                         │
//! │   [■ ■ ■] [■ ■ ■] [■]                                                   │
//! │    130     130    50                                                    │
//! │                                                                         │
//! │   groups    = 7 / 3 = 2          (maximal full groups, greedy)          │
//! │   remainder = 7 % 3 = 1          (priced at the unit price)             │
//! │   line      = 2 × 130 + 1 × 50 = 310                                    │
//! │                                                                         │
//! │  No other partition is ever tried, even when a different split would   │
//! │  be cheaper for the customer.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function over [`Money`]; totals are
//! order-independent sums of line amounts.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartLine, CartLineView, ItemId, OfferTerms};

// =============================================================================
// Line Pricing
// =============================================================================

/// Full breakdown of how one line was priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinePricing {
    /// Number of complete offer groups (0 without an offer).
    pub bulk_groups: i64,

    /// Units left over after grouping, charged at the unit price.
    pub remainder: i64,

    /// `bulk_groups × P`.
    pub offer_total: Money,

    /// `remainder × unit_price`.
    pub remainder_total: Money,

    /// What the customer pays for the line.
    pub line_total: Money,

    /// `quantity × unit_price`, the price without any offer.
    pub regular_total: Money,

    /// `regular_total - line_total`. Negative if the offer is a bad deal.
    pub savings: Money,
}

impl LinePricing {
    /// Prices `quantity` units at `unit_price`, applying `offer` if present.
    ///
    /// An offer whose group size is not positive can never form a group and
    /// prices like no offer at all. Stores reject such offers, so this only
    /// keeps the function total.
    pub fn compute(unit_price: Money, quantity: i64, offer: Option<OfferTerms>) -> Self {
        let regular_total = unit_price * quantity;

        let (bulk_groups, remainder, offer_total) = match offer {
            Some(terms) if terms.quantity > 0 => {
                let groups = quantity / terms.quantity;
                (groups, quantity % terms.quantity, terms.total_price * groups)
            }
            _ => (0, quantity, Money::zero()),
        };

        let remainder_total = unit_price * remainder;
        let line_total = offer_total + remainder_total;

        LinePricing {
            bulk_groups,
            remainder,
            offer_total,
            remainder_total,
            line_total,
            regular_total,
            savings: regular_total - line_total,
        }
    }
}

/// Prices a single line.
///
/// ## Example
/// ```rust
/// use checkout_core::money::Money;
/// use checkout_core::pricing::price_line;
/// use checkout_core::types::OfferTerms;
///
/// let unit = Money::from_cents(50);
/// let offer = OfferTerms::new(2, Money::from_cents(80));
///
/// assert_eq!(price_line(unit, 3, Some(offer)).cents(), 130);
/// assert_eq!(price_line(unit, 3, None).cents(), 150);
/// assert_eq!(price_line(unit, 0, Some(offer)).cents(), 0);
/// ```
pub fn price_line(unit_price: Money, quantity: i64, offer: Option<OfferTerms>) -> Money {
    LinePricing::compute(unit_price, quantity, offer).line_total
}

/// Totals a set of cart lines using caller-supplied lookups.
///
/// `price_of` returns an item's unit price and `offer_for` its offer, if
/// any. Both are only called for items that appear in `lines`, and the
/// engine trusts them: unknown items are the caller's problem.
///
/// ## Example
/// ```rust,ignore
/// let total = pricing::total(&lines, |id| prices[&id], |id| offers.get(&id).copied());
/// ```
pub fn total<'a, L, P, O>(lines: L, price_of: P, offer_for: O) -> Money
where
    L: IntoIterator<Item = &'a CartLine>,
    P: Fn(ItemId) -> Money,
    O: Fn(ItemId) -> Option<OfferTerms>,
{
    lines
        .into_iter()
        .map(|line| price_line(price_of(line.item_id), line.quantity, offer_for(line.item_id)))
        .sum()
}

impl CartLineView {
    /// Prices this line with its item's current price and offer.
    pub fn pricing(&self) -> LinePricing {
        LinePricing::compute(self.item.unit_price(), self.quantity, self.offer)
    }

    /// Shorthand for `self.pricing().line_total`.
    pub fn line_total(&self) -> Money {
        self.pricing().line_total
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// One priced line of a [`CartSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub offer: Option<OfferTerms>,
    pub pricing: LinePricing,
}

/// Receipt-style view of a whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSummary {
    pub lines: Vec<PricedLine>,

    /// Number of distinct items.
    pub line_count: usize,

    /// Sum of all quantities.
    pub total_quantity: i64,

    /// Total without any offers.
    pub regular_total: Money,

    /// `regular_total - total`.
    pub savings: Money,

    /// The amount due.
    pub total: Money,
}

/// Builds a [`CartSummary`] from priced cart lines.
///
/// `summary.total` always equals the sum of `line_total()` over `lines`.
pub fn summarize(lines: &[CartLineView]) -> CartSummary {
    let mut summary = CartSummary::default();

    for view in lines {
        let pricing = view.pricing();

        summary.total_quantity += view.quantity;
        summary.regular_total += pricing.regular_total;
        summary.total += pricing.line_total;
        summary.lines.push(PricedLine {
            item_id: view.item.id,
            name: view.item.name.clone(),
            quantity: view.quantity,
            unit_price: view.item.unit_price(),
            offer: view.offer,
            pricing,
        });
    }

    summary.line_count = summary.lines.len();
    summary.savings = summary.regular_total - summary.total;
    summary
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CartId, Item};
    use chrono::Utc;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    fn item(id: ItemId, name: &str, price: i64) -> Item {
        let now = Utc::now();
        Item {
            id,
            name: name.to_string(),
            unit_price_cents: price,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(id: i64, item_id: ItemId, quantity: i64) -> CartLine {
        let now = Utc::now();
        CartLine {
            id,
            cart_id: CartId::default(),
            item_id,
            quantity,
            added_at: now,
            updated_at: now,
        }
    }

    fn view(item: Item, quantity: i64, offer: Option<OfferTerms>) -> CartLineView {
        CartLineView {
            line_id: item.id,
            cart_id: CartId::default(),
            item,
            quantity,
            offer,
        }
    }

    #[test]
    fn test_price_line_without_offer() {
        assert_eq!(price_line(cents(30), 4, None), cents(120));
        assert_eq!(price_line(cents(30), 0, None), Money::zero());
    }

    #[test]
    fn test_price_line_with_offer() {
        let offer = Some(OfferTerms::new(2, cents(80)));
        assert_eq!(price_line(cents(50), 1, offer), cents(50));
        assert_eq!(price_line(cents(50), 2, offer), cents(80));
        assert_eq!(price_line(cents(50), 3, offer), cents(130));
        assert_eq!(price_line(cents(50), 4, offer), cents(160));
        assert_eq!(price_line(cents(50), 0, offer), Money::zero());
    }

    #[test]
    fn test_price_line_is_greedy_even_when_worse() {
        // A "deal" that costs more than singles is still applied.
        let offer = Some(OfferTerms::new(2, cents(100)));
        let pricing = LinePricing::compute(cents(30), 5, offer);
        assert_eq!(pricing.bulk_groups, 2);
        assert_eq!(pricing.remainder, 1);
        assert_eq!(pricing.line_total, cents(230));
        assert_eq!(pricing.savings, cents(-80));
    }

    #[test]
    fn test_non_positive_group_size_prices_like_no_offer() {
        let offer = Some(OfferTerms::new(0, cents(10)));
        assert_eq!(price_line(cents(30), 3, offer), cents(90));
    }

    #[test]
    fn test_line_breakdown() {
        let pricing = LinePricing::compute(cents(50), 7, Some(OfferTerms::new(3, cents(130))));
        assert_eq!(
            pricing,
            LinePricing {
                bulk_groups: 2,
                remainder: 1,
                offer_total: cents(260),
                remainder_total: cents(50),
                line_total: cents(310),
                regular_total: cents(350),
                savings: cents(40),
            }
        );
    }

    #[test]
    fn test_total_with_lookups() {
        let prices: HashMap<ItemId, Money> = [(1, cents(30)), (2, cents(50))].into();
        let offers: HashMap<ItemId, OfferTerms> = [(1, OfferTerms::new(2, cents(45)))].into();
        let lines = vec![line(1, 1, 3), line(2, 2, 1)];

        let total = total(&lines, |id| prices[&id], |id| offers.get(&id).copied());
        assert_eq!(total, cents(125));
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        let lines: Vec<CartLine> = Vec::new();
        assert_eq!(total(&lines, |_| cents(1), |_| None), Money::zero());
    }

    #[test]
    fn test_summarize_checkout_scenario() {
        let apple = view(item(1, "Apple", 30), 3, Some(OfferTerms::new(2, cents(45))));
        let banana = view(item(2, "Banana", 50), 1, Some(OfferTerms::new(3, cents(130))));

        let summary = summarize(&[apple, banana]);

        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.total_quantity, 4);
        assert_eq!(summary.regular_total, cents(140));
        assert_eq!(summary.total, cents(125));
        assert_eq!(summary.savings, cents(15));
        assert_eq!(summary.lines[0].pricing.bulk_groups, 1);
        assert_eq!(summary.lines[1].pricing.bulk_groups, 0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.line_count, 0);
        assert!(summary.total.is_zero());
        assert!(summary.savings.is_zero());
    }

    proptest! {
        #[test]
        fn prop_offer_partition_law(
            unit in 0i64..10_000,
            quantity in 0i64..1_000,
            n in 1i64..50,
            p in 0i64..100_000,
        ) {
            let pricing = LinePricing::compute(cents(unit), quantity, Some(OfferTerms::new(n, cents(p))));
            prop_assert_eq!(pricing.bulk_groups * n + pricing.remainder, quantity);
            prop_assert!(pricing.remainder >= 0 && pricing.remainder < n);
            prop_assert_eq!(
                pricing.line_total,
                cents((quantity / n) * p + (quantity % n) * unit)
            );
        }

        #[test]
        fn prop_no_offer_total_is_sum_of_products(
            entries in proptest::collection::vec((0i64..10_000, 1i64..100), 0..20),
        ) {
            let lines: Vec<CartLine> = entries
                .iter()
                .enumerate()
                .map(|(i, (_, q))| line(i as i64, i as ItemId, *q))
                .collect();
            let expected: i64 = entries.iter().map(|(price, q)| price * q).sum();

            let got = total(&lines, |id| cents(entries[id as usize].0), |_| None);
            prop_assert_eq!(got, cents(expected));
        }

        #[test]
        fn prop_total_is_order_independent(
            entries in proptest::collection::vec((0i64..10_000, 1i64..100, 1i64..5), 0..10),
        ) {
            let lines: Vec<CartLine> = entries
                .iter()
                .enumerate()
                .map(|(i, (_, q, _))| line(i as i64, i as ItemId, *q))
                .collect();
            let price_of = |id: ItemId| cents(entries[id as usize].0);
            let offer_for = |id: ItemId| Some(OfferTerms::new(entries[id as usize].2, cents(99)));

            let forward = total(&lines, price_of, offer_for);
            let reversed = total(lines.iter().rev(), price_of, offer_for);
            prop_assert_eq!(forward, reversed);
        }
    }
}
