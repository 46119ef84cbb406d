//! # Money Module
//!
//! Integer minor-unit money for client-side arithmetic.
//!
//! ## Where Money Is Used
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backend JSON number (f64) ──► Money::from_amount ──► integer math     │
//! │                                                                         │
//! │  • Campaign effect preview (percentage with cap, fixed amount)          │
//! │  • Cart consistency checks (sum of line subtotals)                      │
//! │  • Display formatting in the app                                        │
//! │                                                                         │
//! │  The pricing resolver itself works on the wire f64 values and uses     │
//! │  PRICE_EPSILON for comparisons.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_amount(150000.0);
//! let doubled = price * 2;
//! assert_eq!(doubled.amount(), 300000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Number of minor units in one major unit.
pub const MINOR_UNITS: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (1/100 of the currency's major unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values appear in discount deltas
/// - **Fixed scale**: the backend speaks in major units; conversion happens
///   once at the edge via [`Money::from_amount`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from a backend amount in major units.
    ///
    /// Rounds half away from zero to the nearest minor unit. Non-finite
    /// input becomes zero.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(10.995).minor(), 1100);
    /// assert_eq!(Money::from_amount(f64::NAN).minor(), 0);
    /// ```
    pub fn from_amount(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * MINOR_UNITS as f64).round() as i64)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the value in major units (for the wire format and display).
    #[inline]
    pub fn amount(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS as f64
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `bps` basis points of this amount (1000 bps = 10%).
    ///
    /// Rounds half up on the minor unit.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_minor(999);
    /// assert_eq!(price.percentage(1500).minor(), 150); // 149.85 → 150
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // i128 keeps large VND-scale amounts from overflowing
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money(part as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let subtotal = Money::from_amount(100.0);
    /// let discounted = subtotal.apply_percentage_discount(1000); // 10% off
    /// assert_eq!(discounted.amount(), 90.0);
    /// ```
    pub fn apply_percentage_discount(&self, bps: u32) -> Money {
        *self - self.percentage(bps)
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Clamps negative values to zero.
    #[inline]
    pub fn non_negative(self) -> Money {
        if self.0 < 0 {
            Money::zero()
        } else {
            self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering with two fraction digits.
///
/// Currency symbol and precision are applied by the app's display settings.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / MINOR_UNITS, abs % MINOR_UNITS)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_amount_rounds_to_minor_units() {
        assert_eq!(Money::from_amount(150000.0).minor(), 15_000_000);
        assert_eq!(Money::from_amount(10.994).minor(), 1099);
        assert_eq!(Money::from_amount(-5.5).minor(), -550);
        assert_eq!(Money::from_amount(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "10.99");
        assert_eq!(Money::from_minor(500).to_string(), "5.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
        assert_eq!(vec![a, b, b].into_iter().sum::<Money>().minor(), 2000);
    }

    #[test]
    fn test_quantity_multiplication_saturates() {
        let a = Money::from_minor(1000);
        assert_eq!((a * i64::MAX).minor(), i64::MAX);
        assert_eq!(a.multiply_quantity(i64::MIN).minor(), i64::MIN);
    }

    #[test]
    fn test_percentage_discount() {
        let subtotal = Money::from_minor(10000);
        assert_eq!(subtotal.apply_percentage_discount(2500).minor(), 7500);
        assert_eq!(subtotal.percentage(10000), subtotal);
    }

    #[test]
    fn test_min_and_non_negative() {
        let a = Money::from_minor(300);
        let b = Money::from_minor(200);
        assert_eq!(a.min(b), b);
        assert_eq!(Money::from_minor(-1).non_negative(), Money::zero());
        assert!(Money::from_minor(-1).is_negative());
        assert!(a.is_positive());
    }
}
