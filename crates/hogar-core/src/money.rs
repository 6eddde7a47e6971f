//! Money type for representing Chilean peso amounts.
//!
//! The peso has no minor unit, so amounts are whole pesos in the catalog.
//! Percentage coupons still produce fractional discounts, which is why the
//! amount is kept as a float and only rounded when formatted.

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// A peso amount. Whole amounts serialize as JSON integers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(f64);

/// Largest magnitude an f64 holds without losing integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT_INTEGER {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl Money {
    /// Create a Money value from a peso amount.
    pub const fn new(amount: f64) -> Self {
        Self(amount)
    }

    /// Zero pesos.
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// The raw amount.
    pub fn amount(self) -> f64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Check if this is positive.
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    /// Check if this is negative.
    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }

    /// Calculate a percentage of this amount.
    pub fn percentage(self, percent: f64) -> Money {
        Money(self.0 * percent / 100.0)
    }

    /// Multiply by a line quantity.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0 * f64::from(quantity))
    }

    /// The larger of two amounts.
    pub fn max(self, other: Money) -> Money {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Total order for sorting; NaN sorts last.
    pub fn total_cmp(&self, other: &Money) -> Ordering {
        self.0.total_cmp(&other.0)
    }

    /// Format as a display string (e.g., "$899.990").
    pub fn display(self) -> String {
        crate::format::format_price(self)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl From<f64> for Money {
    fn from(amount: f64) -> Self {
        Money(amount)
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Money(amount as f64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_pesos_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&Money::new(899990.0)).unwrap(), "899990");
        assert_eq!(serde_json::to_string(&Money::new(-5000.0)).unwrap(), "-5000");
        assert_eq!(serde_json::to_string(&Money::new(5999.5)).unwrap(), "5999.5");

        let back: Money = serde_json::from_str("899990").unwrap();
        assert_eq!(back, Money::new(899990.0));
    }

    #[test]
    fn test_money_percentage() {
        let m = Money::new(60000.0);
        assert_eq!(m.percentage(10.0), Money::new(6000.0));
    }

    #[test]
    fn test_money_percentage_keeps_fraction() {
        let m = Money::new(12345.0);
        assert!((m.percentage(10.0).amount() - 1234.5).abs() < 1e-9);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1000.0);
        let b = Money::new(500.0);
        assert_eq!(a + b, Money::new(1500.0));
        assert_eq!(a - b, Money::new(500.0));
        assert_eq!(a * 3, Money::new(3000.0));
        assert!((b - a).is_negative());
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [Money::new(2000.0), Money::new(500.0)].into_iter().sum();
        assert_eq!(total, Money::new(2500.0));
    }

    #[test]
    fn test_money_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Money::new(899990.0)).unwrap(), "899990.0");
        let m: Money = serde_json::from_str("159990").unwrap();
        assert_eq!(m, Money::new(159990.0));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(899990.0).display(), "$899.990");
    }
}
