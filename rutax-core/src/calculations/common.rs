//! Common utility functions for tax calculations.
//!
//! This module provides the rounding and ratio helpers shared by the
//! calculation primitives. Rounding only ever happens at the points that
//! call into this module explicitly.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use rutax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Expresses `part` as a percentage of `whole`, rounded half-up to two places.
///
/// A non-positive `whole` yields zero instead of dividing by it.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use rutax_core::calculations::common::percentage_of;
///
/// assert_eq!(percentage_of(dec!(60000), dec!(1000000)), dec!(6.00));
/// assert_eq!(percentage_of(dec!(1), dec!(3)), dec!(33.33));
/// assert_eq!(percentage_of(dec!(500), dec!(0)), dec!(0));
/// ```
pub fn percentage_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole > Decimal::ZERO {
        round_half_up(part / whole * Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    }
}
