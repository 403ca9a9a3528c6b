//! # Pricing Calculator
//!
//! Turns reconciled cart lines into itemized totals under a [`FeePolicy`].
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Σ unit_price × quantity ──► subtotal                                  │
//! │                                 │                                       │
//! │               ┌─────────────────┼───────────────────┐                  │
//! │               ▼                                     ▼                  │
//! │   tax = round2(subtotal × rate)     shipping = subtotal >= threshold   │
//! │               │                           ? 0 : flat_fee               │
//! │               └─────────────────┬───────────────────┘                  │
//! │                                 ▼                                       │
//! │           grand_total = subtotal + tax + shipping                      │
//! │                                                                         │
//! │  Each stage is rounded before it feeds the next one. With integer     │
//! │  cents the only stage that actually rounds is tax.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use cartwise_core::money::Money;
//! use cartwise_core::pricing::{price, FeePolicy};
//! use cartwise_core::ReconciledLineItem;
//!
//! let items = vec![ReconciledLineItem::new("A", Money::from_cents(2000), 2)];
//! let result = price(&items, &FeePolicy::default());
//!
//! assert_eq!(result.subtotal.cents(), 4000);
//! assert_eq!(result.tax_amount.cents(), 340);
//! assert_eq!(result.shipping_amount.cents(), 0);
//! assert_eq!(result.grand_total.cents(), 4340);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ReconciledLineItem, TaxRate};
use crate::validation::{validate_fee_cents, validate_tax_rate_bps};
use crate::{DEFAULT_FLAT_SHIPPING_FEE_CENTS, DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS, DEFAULT_TAX_RATE_BPS};

// =============================================================================
// Fee Policy
// =============================================================================

/// Tax and shipping rules applied to every cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeePolicy {
    /// Applied to the subtotal.
    pub tax_rate: TaxRate,

    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Money,

    /// Charged when the subtotal is below the threshold.
    pub flat_shipping_fee: Money,
}

impl Default for FeePolicy {
    /// 8.5% tax, free shipping from $35.00, otherwise $5.99.
    fn default() -> Self {
        FeePolicy {
            tax_rate: TaxRate::from_bps(DEFAULT_TAX_RATE_BPS),
            free_shipping_threshold: Money::from_cents(DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS),
            flat_shipping_fee: Money::from_cents(DEFAULT_FLAT_SHIPPING_FEE_CENTS),
        }
    }
}

impl FeePolicy {
    pub fn new(tax_rate: TaxRate, free_shipping_threshold: Money, flat_shipping_fee: Money) -> Self {
        FeePolicy {
            tax_rate,
            free_shipping_threshold,
            flat_shipping_fee,
        }
    }

    /// Rejects rates above 100% and negative amounts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_tax_rate_bps(self.tax_rate.bps())?;
        validate_fee_cents("free_shipping_threshold", self.free_shipping_threshold.cents())?;
        validate_fee_cents("flat_shipping_fee", self.flat_shipping_fee.cents())?;
        Ok(())
    }

    /// Shipping charged for a given subtotal.
    #[inline]
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping_fee
        }
    }

    /// How much more the customer must add to ship free.
    ///
    /// ## User Workflow
    /// ```text
    /// Subtotal $10.00, threshold $35.00
    ///      │
    ///      ▼
    /// free_shipping_remaining() ← THIS FUNCTION
    ///      │
    ///      ▼
    /// "Add $25.00 of eligible items to your order to qualify for FREE Shipping"
    /// ```
    #[inline]
    pub fn free_shipping_remaining(&self, subtotal: Money) -> Money {
        self.free_shipping_threshold.saturating_sub_to_zero(subtotal)
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Itemized totals for one cart. Every field is at currency precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingResult {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub shipping_amount: Money,
    pub grand_total: Money,
    pub total_units: i64,
}

impl PricingResult {
    /// The "Total before tax" line: subtotal plus shipping.
    #[inline]
    pub fn total_before_tax(&self) -> Money {
        self.subtotal.saturating_add(self.shipping_amount)
    }

    /// True when no shipping was charged on a non-empty cart.
    pub fn ships_free(&self) -> bool {
        self.total_units > 0 && self.shipping_amount.is_zero()
    }
}

/// Item count and subtotal only, for cart badges and mini-carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartSummary {
    pub item_count: i64,
    pub subtotal: Money,
}

// =============================================================================
// Calculations
// =============================================================================

/// Exact sum of line totals, accumulated in `i128`.
fn raw_subtotal(items: &[ReconciledLineItem]) -> i128 {
    items
        .iter()
        .map(|item| item.unit_price.cents() as i128 * item.quantity as i128)
        .sum()
}

fn total_units(items: &[ReconciledLineItem]) -> i64 {
    items
        .iter()
        .fold(0i64, |units, item| units.saturating_add(item.quantity))
}

/// Prices a reconciled cart.
///
/// Total over any input: an empty cart prices to all zeros (no shipping is
/// charged for nothing).
pub fn price(items: &[ReconciledLineItem], policy: &FeePolicy) -> PricingResult {
    if items.is_empty() {
        return PricingResult::default();
    }

    // Integer cents are already at currency precision: round2 is the identity.
    let subtotal = Money::saturating_from_i128(raw_subtotal(items));
    let tax_amount = subtotal.calculate_tax(policy.tax_rate);
    let shipping_amount = policy.shipping_for(subtotal);
    let grand_total = subtotal
        .saturating_add(tax_amount)
        .saturating_add(shipping_amount);

    PricingResult {
        subtotal,
        tax_amount,
        shipping_amount,
        grand_total,
        total_units: total_units(items),
    }
}

/// Item count and subtotal without fees.
pub fn summarize(items: &[ReconciledLineItem]) -> CartSummary {
    CartSummary {
        item_count: total_units(items),
        subtotal: Money::saturating_from_i128(raw_subtotal(items)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, cents: i64, qty: i64) -> ReconciledLineItem {
        ReconciledLineItem::new(id, Money::from_cents(cents), qty)
    }

    #[test]
    fn test_price_above_free_shipping_threshold() {
        let result = price(&[line("A", 2000, 2)], &FeePolicy::default());

        assert_eq!(result.subtotal, Money::from_cents(4000));
        assert_eq!(result.tax_amount, Money::from_cents(340));
        assert_eq!(result.shipping_amount, Money::zero());
        assert_eq!(result.grand_total, Money::from_cents(4340));
        assert_eq!(result.total_units, 2);
        assert!(result.ships_free());
    }

    #[test]
    fn test_price_below_free_shipping_threshold() {
        let result = price(&[line("A", 1000, 1)], &FeePolicy::default());

        assert_eq!(result.subtotal, Money::from_cents(1000));
        assert_eq!(result.tax_amount, Money::from_cents(85));
        assert_eq!(result.shipping_amount, Money::from_cents(599));
        assert_eq!(result.grand_total, Money::from_cents(1684));
        assert_eq!(result.total_before_tax(), Money::from_cents(1599));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let result = price(&[line("A", 3500, 1)], &FeePolicy::default());
        assert!(result.shipping_amount.is_zero());

        let result = price(&[line("A", 3499, 1)], &FeePolicy::default());
        assert_eq!(result.shipping_amount, Money::from_cents(599));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let result = price(&[], &FeePolicy::default());
        assert_eq!(result, PricingResult::default());
        assert!(result.grand_total.is_zero());
        assert!(!result.ships_free());
    }

    #[test]
    fn test_grand_total_is_sum_of_rounded_parts() {
        let items = vec![line("A", 1999, 1), line("B", 333, 3)];
        let result = price(&items, &FeePolicy::default());

        // 1999 + 999 = 2998; tax 254.83 → 255; below threshold
        assert_eq!(result.subtotal.cents(), 2998);
        assert_eq!(result.tax_amount.cents(), 255);
        assert_eq!(
            result.grand_total,
            result.subtotal + result.tax_amount + result.shipping_amount
        );
    }

    #[test]
    fn test_zero_tax_policy() {
        let policy = FeePolicy::new(TaxRate::zero(), Money::from_cents(0), Money::from_cents(599));
        let result = price(&[line("A", 1000, 1)], &policy);
        assert!(result.tax_amount.is_zero());
        // Threshold 0: everything ships free
        assert!(result.shipping_amount.is_zero());
    }

    #[test]
    fn test_oversized_cart_saturates_instead_of_wrapping() {
        let huge = i64::MAX / 10;
        let items = vec![line("A", 100, huge), line("B", 100, huge)];

        let result = price(&items, &FeePolicy::default());

        assert_eq!(result.subtotal.cents(), i64::MAX);
        assert!(result.tax_amount.cents() > 0);
        assert_eq!(result.grand_total.cents(), i64::MAX);
        assert_eq!(result.total_units, huge * 2);

        let summary = summarize(&items);
        assert_eq!(summary.subtotal.cents(), i64::MAX);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[line("A", 2000, 2), line("B", 150, 3)]);
        assert_eq!(summary.item_count, 5);
        assert_eq!(summary.subtotal, Money::from_cents(4450));

        assert_eq!(summarize(&[]), CartSummary::default());
    }

    #[test]
    fn test_free_shipping_remaining() {
        let policy = FeePolicy::default();
        assert_eq!(
            policy.free_shipping_remaining(Money::from_cents(1000)),
            Money::from_cents(2500)
        );
        assert!(policy.free_shipping_remaining(Money::from_cents(3500)).is_zero());
        assert!(policy.free_shipping_remaining(Money::from_cents(9000)).is_zero());
    }

    #[test]
    fn test_policy_validation() {
        assert!(FeePolicy::default().validate().is_ok());

        let mut policy = FeePolicy::default();
        policy.tax_rate = TaxRate::from_bps(10_001);
        assert!(policy.validate().is_err());

        let mut policy = FeePolicy::default();
        policy.flat_shipping_fee = Money::from_cents(-1);
        assert!(policy.validate().is_err());
    }
}
