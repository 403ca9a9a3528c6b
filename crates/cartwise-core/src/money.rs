//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Storefront totals computed with floats drift:                          │
//! │    19.99 * 3 = 59.970000000000006  ❌                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1999 cents * 3 = 5997 cents       ✅ exact                           │
//! │                                                                         │
//! │  Every emitted amount is already at currency precision (2 places).     │
//! │  Rounding only happens where a fractional rate is applied (tax).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartwise_core::money::Money;
//!
//! let price = Money::from_cents(1999); // $19.99
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 5997);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Where Money is Used
/// ```text
/// CatalogEntry.unit_price ──► ReconciledLineItem.line_total ──► subtotal
///                                                                  │
///                              tax_amount ◄── calculate_tax ◄──────┤
///                              shipping_amount ◄── FeePolicy ◄─────┘
///                                      │
///                                      ▼
///                                 grand_total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let price = Money::from_cents(599); // $5.99
    /// assert_eq!(price.cents(), 599);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Calculates tax on this amount, rounded half away from zero.
    ///
    /// ## Rounding
    /// ```text
    /// $10.00 × 8.5%  = 0.850  → $0.85
    /// $0.01  × 50%   = 0.005  → $0.01   (half rounds away from zero)
    /// -$0.01 × 50%   = -0.005 → -$0.01
    /// ```
    ///
    /// The product is formed in `i128` so large carts cannot overflow
    /// before the division.
    ///
    /// ```rust
    /// use cartwise_core::money::Money;
    /// use cartwise_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(4000).calculate_tax(TaxRate::from_bps(850));
    /// assert_eq!(tax.cents(), 340);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        Money::saturating_from_i128(div_round_half_away(scaled, 10_000))
    }

    /// Multiplies a unit price by a quantity, saturating at the `i64` bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Adds, saturating at the `i64` bounds.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Narrows a wide intermediate sum, saturating at the `i64` bounds.
    pub fn saturating_from_i128(cents: i128) -> Money {
        Money(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Subtracts, flooring the result at zero.
    ///
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let threshold = Money::from_cents(3500);
    /// assert_eq!(threshold.saturating_sub_to_zero(Money::from_cents(1000)).cents(), 2500);
    /// assert!(threshold.saturating_sub_to_zero(Money::from_cents(5000)).is_zero());
    /// ```
    #[inline]
    pub fn saturating_sub_to_zero(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

/// Integer division rounding half away from zero. `divisor` must be positive.
fn div_round_half_away(value: i128, divisor: i128) -> i128 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient + value.signum()
    } else {
        quotient
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly dollar rendering. Localized formatting belongs to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(4340)), "$43.40");
        assert_eq!(format!("{}", Money::from_cents(599)), "$5.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_tax_at_storefront_rate() {
        let rate = TaxRate::from_bps(850);
        assert_eq!(Money::from_cents(4000).calculate_tax(rate).cents(), 340);
        assert_eq!(Money::from_cents(1000).calculate_tax(rate).cents(), 85);
        // $19.99 × 8.5% = 1.69915 → $1.70
        assert_eq!(Money::from_cents(1999).calculate_tax(rate).cents(), 170);
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        let half = TaxRate::from_bps(5000);
        assert_eq!(Money::from_cents(1).calculate_tax(half).cents(), 1);
        assert_eq!(Money::from_cents(3).calculate_tax(half).cents(), 2);
        assert_eq!(Money::from_cents(-1).calculate_tax(half).cents(), -1);

        // 0.4999 stays down
        let rate = TaxRate::from_bps(4999);
        assert_eq!(Money::from_cents(1).calculate_tax(rate).cents(), 0);
    }

    #[test]
    fn test_tax_does_not_overflow_on_large_amounts() {
        let big = Money::from_cents(i64::MAX / 2);
        let tax = big.calculate_tax(TaxRate::from_bps(10_000));
        assert_eq!(tax, big);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 350);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_multiply_quantity() {
        let line_total = Money::from_cents(2000).multiply_quantity(2);
        assert_eq!(line_total.cents(), 4000);
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let line_total = Money::from_cents(100).multiply_quantity(i64::MAX / 10);
        assert_eq!(line_total.cents(), i64::MAX);

        let total = line_total.saturating_add(Money::from_cents(599));
        assert_eq!(total.cents(), i64::MAX);

        assert_eq!(Money::saturating_from_i128(i128::MAX).cents(), i64::MAX);
        assert_eq!(Money::saturating_from_i128(-5).cents(), -5);
    }
}
