//! Bounds shared by both storage backends. They mirror the column types in
//! `migrations/`, so a value the domain accepts always fits the database.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode};

use super::errors::DomainError;

/// Money columns are `NUMERIC(12,2)`.
pub const MONEY_SCALE: i64 = 2;
const MAX_MONEY_CENTS: i64 = 999_999_999_999;

pub const MAX_ID_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_ICON_LEN: usize = 32;
pub const MAX_UNIT_LEN: usize = 32;
pub const MAX_PHONE_LEN: usize = 32;
pub const MAX_PIN_LEN: usize = 16;

fn max_money() -> BigDecimal {
    BigDecimal::new(BigInt::from(MAX_MONEY_CENTS), MONEY_SCALE)
}

/// Rounds `value` half-up to cents and rejects amounts the money columns
/// cannot hold.
pub fn money(value: &BigDecimal, field: &str) -> Result<BigDecimal, DomainError> {
    let rounded = value.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp);
    let max = max_money();
    if rounded.abs() > max {
        return Err(DomainError::invalid(format!("{} cannot exceed {}", field, max)));
    }
    Ok(rounded)
}

/// Fails when `value` is longer than `max` characters.
pub fn check_length(value: &str, max: usize, field: &str) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::invalid(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
