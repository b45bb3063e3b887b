//! Sri Lankan rupee amounts
//!
//! Amounts are held as whole cents so sums and line totals stay exact.
//! Percentage discounts round to a whole rupee, half up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// An amount in LKR, stored in cents. Serializes as the cent count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lkr(u64);

impl Lkr {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    #[inline]
    pub const fn from_rupees(rupees: u64) -> Self {
        Self(rupees * 100)
    }

    /// Convert a decimal rupee figure, as sent by the API, into cents.
    ///
    /// Negative, NaN and infinite inputs become zero.
    pub fn from_decimal(rupees: f64) -> Self {
        if !rupees.is_finite() || rupees <= 0.0 {
            return Self::ZERO;
        }
        Self((rupees * 100.0).round() as u64)
    }

    #[inline]
    pub const fn cents(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiply by a line quantity
    pub const fn times(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(qty as u64))
    }

    /// `percent`% of this amount, rounded half up to a whole rupee
    pub const fn percent_rounded(self, percent: u64) -> Self {
        let rupees = (self.0.saturating_mul(percent) + 5_000) / 10_000;
        Self::from_rupees(rupees)
    }

    /// Subtraction floored at zero
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }
}

impl Add for Lkr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Lkr {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Lkr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rupees = (self.0 / 100).to_string();
        let mut grouped = String::with_capacity(rupees.len() + rupees.len() / 3);
        for (i, ch) in rupees.chars().enumerate() {
            if i > 0 && (rupees.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "LKR {}.{:02}", grouped, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Lkr::from_rupees(0).to_string(), "LKR 0.00");
        assert_eq!(Lkr::from_rupees(999).to_string(), "LKR 999.00");
        assert_eq!(Lkr::from_cents(123_456_789).to_string(), "LKR 1,234,567.89");
    }

    #[test]
    fn test_from_decimal() {
        assert_eq!(Lkr::from_decimal(125_000.5), Lkr::from_cents(12_500_050));
        assert_eq!(Lkr::from_decimal(-3.0), Lkr::ZERO);
        assert_eq!(Lkr::from_decimal(f64::NAN), Lkr::ZERO);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(
            Lkr::from_rupees(500_000).percent_rounded(1),
            Lkr::from_rupees(5_000)
        );
        // 1% of 150 = 1.5 -> 2
        assert_eq!(Lkr::from_rupees(150).percent_rounded(1), Lkr::from_rupees(2));
        // 1% of 149.99 = 1.4999 -> 1
        assert_eq!(Lkr::from_cents(14_999).percent_rounded(1), Lkr::from_rupees(1));
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        assert_eq!(Lkr::from_rupees(5).saturating_sub(Lkr::from_rupees(9)), Lkr::ZERO);
    }
}
