//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Default surcharge for an extra espresso shot (1.00)
pub const DEFAULT_EXTRA_SHOT_PRICE: Decimal = Decimal::from_parts(100, 0, 0, false, 2);

/// Convert f64 to Decimal (non-finite values become zero)
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round to cents, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Price of a new order: catalog drink price (zero when unknown) plus the
/// extra-shot surcharge when requested.
pub fn order_price(drink_price: Option<Decimal>, extra_shot: bool, extra_shot_price: Decimal) -> Decimal {
    let base = drink_price.unwrap_or(Decimal::ZERO);
    let surcharge = if extra_shot { extra_shot_price } else { Decimal::ZERO };
    round_money(base + surcharge)
}
