use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Minor units per display currency unit (cents per whole unit).
const MINOR_PER_UNIT: i64 = 100;

/// Converts a display amount into minor units.
///
/// Returns `None` for negative values and for amounts with sub-minor
/// precision; the core only ever sees whole minor units.
pub fn to_minor_units(value: Decimal) -> Option<u64> {
    let scaled = value.checked_mul(Decimal::from(MINOR_PER_UNIT))?;
    if scaled.is_sign_negative() || scaled.fract() != Decimal::ZERO {
        return None;
    }
    scaled.to_u64()
}

/// Renders minor units as a display amount with two decimal places.
pub fn from_minor_units(minor: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(minor), 2)
}
