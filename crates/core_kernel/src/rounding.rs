//! Rounding policies for monetary amounts
//!
//! The rating pipeline keeps running premiums at full decimal precision and
//! rounds only the amounts that are recorded in breakdowns or returned to
//! callers. Recorded amounts use two decimal places, half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of decimal places for recorded currency amounts
pub const CURRENCY_DP: u32 = 2;

/// Rounds a recorded amount to two decimal places, half away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds using banker's rounding (round half to even)
pub fn round_bankers(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

/// Clamps a premium at zero
///
/// Credits can never drive a premium negative.
pub fn floor_at_zero(amount: Decimal) -> Decimal {
    if amount < dec!(0) {
        dec!(0)
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(dec!(1.005)), dec!(1.01));
        assert_eq!(round_currency(dec!(1.004)), dec!(1.00));
        assert_eq!(round_currency(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn test_round_bankers() {
        assert_eq!(round_bankers(dec!(2.5), 0), dec!(2));
        assert_eq!(round_bankers(dec!(3.5), 0), dec!(4));
    }

    #[test]
    fn test_floor_at_zero() {
        assert_eq!(floor_at_zero(dec!(-10.50)), dec!(0));
        assert_eq!(floor_at_zero(dec!(10.50)), dec!(10.50));
        assert_eq!(floor_at_zero(dec!(0)), dec!(0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rounded_amount_has_at_most_two_decimals(
                mantissa in -1_000_000_000i64..1_000_000_000i64,
                scale in 0u32..8u32
            ) {
                let amount = Decimal::new(mantissa, scale);
                let rounded = round_currency(amount);
                prop_assert!(rounded.scale() <= CURRENCY_DP);
            }

            #[test]
            fn floor_at_zero_is_never_negative(
                mantissa in -1_000_000_000i64..1_000_000_000i64,
                scale in 0u32..4u32
            ) {
                let amount = Decimal::new(mantissa, scale);
                prop_assert!(floor_at_zero(amount) >= Decimal::ZERO);
            }
        }
    }
}
