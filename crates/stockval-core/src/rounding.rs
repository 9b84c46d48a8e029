//! Price rounding at a configured decimal precision.
//!
//! Monetary results are rounded half away from zero, the convention the
//! surrounding accounting stack uses wherever prices are written back.
//! Running totals are never rounded; only per-layer deltas and final prices
//! go through here.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a price or monetary delta to `digits` decimal places.
///
/// Ties round away from zero, so `0.125` at two digits becomes `0.13` and
/// `-0.125` becomes `-0.13`.
///
/// # Examples
///
/// ```
/// use stockval_core::round_price;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_price(dec!(58.7963), 2), dec!(58.80));
/// assert_eq!(round_price(dec!(0.00975), 5), dec!(0.00975));
/// ```
#[must_use]
pub fn round_price(value: Decimal, digits: u32) -> Decimal {
    value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
}
