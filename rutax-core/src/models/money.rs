//! Exact decimal money and rate primitives.
//!
//! [`Money`] keeps full decimal precision through every operation; the only
//! rounding is [`Money::round`], which the calculation primitives call at
//! fixed points. [`Rate`] is a fraction in `[0, 1]` checked on construction.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;

/// An amount in roubles, held at full decimal precision.
///
/// Negative values are allowed: intermediate results such as a USN charge on
/// a loss or a negative net VAT are legitimate until a formula clamps them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Rounds to kopecks, half-up.
    pub fn round(self) -> Self {
        Self(round_half_up(self.0))
    }

    pub fn max(
        self,
        other: Self,
    ) -> Self {
        Ord::max(self, other)
    }

    pub fn min(
        self,
        other: Self,
    ) -> Self {
        Ord::min(self, other)
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} RUB", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(
        self,
        rhs: Money,
    ) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(
        &mut self,
        rhs: Money,
    ) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(
        self,
        rhs: Money,
    ) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Rate> for Money {
    type Output = Money;

    fn mul(
        self,
        rhs: Rate,
    ) -> Money {
        Money(self.0 * rhs.0)
    }
}

impl Mul<Money> for Rate {
    type Output = Money;

    fn mul(
        self,
        rhs: Money,
    ) -> Money {
        Money(self.0 * rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// Errors raised when constructing a [`Rate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// Rates are fractions; 6% is written `0.06`.
    #[error("rate must be between 0 and 1, got {0}")]
    OutOfRange(Decimal),
}

/// A percentage written as a fraction in `[0, 1]` (`0.06` is 6%).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);
    pub const HALF: Rate = Rate(Decimal::from_parts(5, 0, 0, false, 1));

    /// Creates a rate, rejecting values outside `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use rutax_core::{Rate, RateError};
    ///
    /// assert_eq!(Rate::new(dec!(0.06)).map(Rate::value), Ok(dec!(0.06)));
    /// assert_eq!(Rate::new(dec!(6)), Err(RateError::OutOfRange(dec!(6))));
    /// ```
    pub fn new(value: Decimal) -> Result<Self, RateError> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(RateError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub const fn value(self) -> Decimal {
        self.0
    }

    /// The share of a VAT-inclusive gross amount that is VAT: `rate / (1 + rate)`.
    pub fn vat_extraction_coefficient(self) -> Rate {
        Rate(self.0 / (Decimal::ONE + self.0))
    }

    /// The complement `1 - rate`, used to gross up amounts net of withholding.
    pub fn complement(self) -> Rate {
        Rate(Decimal::ONE - self.0)
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = RateError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Rate::new(value)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl fmt::Display for Rate {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}%", self.0 * Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn rate(value: Decimal) -> Rate {
        Rate::new(value).unwrap()
    }

    // =========================================================================
    // Money tests
    // =========================================================================

    #[test]
    fn money_equality_ignores_trailing_zeros() {
        assert_eq!(Money::new(dec!(100)), Money::new(dec!(100.000)));
    }

    #[test]
    fn money_keeps_full_precision_until_rounded() {
        let third = Money::new(dec!(100)) * rate(dec!(1) / dec!(3));

        assert!(third != Money::new(dec!(33.33)));
        assert_eq!(third.round(), Money::new(dec!(33.33)));
    }

    #[test]
    fn money_round_is_half_up() {
        assert_eq!(Money::new(dec!(0.125)).round(), Money::new(dec!(0.13)));
        assert_eq!(Money::new(dec!(-0.125)).round(), Money::new(dec!(-0.13)));
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::new(dec!(1500.50));
        let b = Money::new(dec!(500.25));

        assert_eq!(a + b, Money::new(dec!(2000.75)));
        assert_eq!(b - a, Money::new(dec!(-1000.25)));
        assert_eq!(-a, Money::new(dec!(-1500.50)));
    }

    #[test]
    fn money_times_rate_in_either_order() {
        let income = Money::new(dec!(1000000));
        let usn = rate(dec!(0.06));

        assert_eq!(income * usn, Money::new(dec!(60000)));
        assert_eq!(usn * income, Money::new(dec!(60000)));
    }

    #[test]
    fn money_min_max() {
        let low = Money::new(dec!(-5));
        let high = Money::new(dec!(5));

        assert_eq!(low.max(Money::ZERO), Money::ZERO);
        assert_eq!(high.min(Money::ZERO), Money::ZERO);
        assert_eq!(low.min(high), low);
    }

    #[test]
    fn money_sum() {
        let total: Money = [dec!(1), dec!(2.5), dec!(3)]
            .into_iter()
            .map(Money::new)
            .sum();

        assert_eq!(total, Money::new(dec!(6.5)));
    }

    #[test]
    fn money_sign_checks() {
        assert!(Money::new(dec!(0.01)).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(Money::new(dec!(-0.01)).is_negative());
    }

    // =========================================================================
    // Rate tests
    // =========================================================================

    #[test]
    fn rate_accepts_bounds() {
        assert_eq!(Rate::new(dec!(0)), Ok(Rate::ZERO));
        assert_eq!(Rate::new(dec!(1)), Ok(Rate::ONE));
    }

    #[test]
    fn rate_rejects_negative() {
        assert_eq!(Rate::new(dec!(-0.01)), Err(RateError::OutOfRange(dec!(-0.01))));
    }

    #[test]
    fn rate_rejects_percentage_notation() {
        assert_eq!(Rate::new(dec!(20)), Err(RateError::OutOfRange(dec!(20))));
    }

    #[test]
    fn rate_half_constant() {
        assert_eq!(Rate::HALF.value(), dec!(0.5));
    }

    #[test]
    fn vat_extraction_coefficient_for_twenty_percent() {
        let k = rate(dec!(0.20)).vat_extraction_coefficient();

        assert_eq!(k.value(), dec!(0.20) / dec!(1.20));
        assert_eq!((Money::new(dec!(120)) * k).round(), Money::new(dec!(20.00)));
    }

    #[test]
    fn rate_complement() {
        assert_eq!(rate(dec!(0.13)).complement().value(), dec!(0.87));
    }

    #[test]
    fn rate_deserializes_through_checked_constructor() {
        let err = Rate::try_from(dec!(1.5)).unwrap_err();

        assert_eq!(err, RateError::OutOfRange(dec!(1.5)));
    }

    #[test]
    fn rate_display_as_percent() {
        assert_eq!(rate(dec!(0.06)).to_string(), "6.00%");
    }
}
