//! Decimal amount conversion.
//!
//! Caller amounts are decimal strings in display units (`"1.5"` tez,
//! `"1.00"` of a token). They are scaled to integer minor units with exact
//! integer arithmetic; floating point never touches an on-chain amount.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::OperationError;

/// Decimal places of the native currency (1 tez = 10^6 mutez).
pub const TEZ_DECIMALS: u32 = 6;

/// Scale a decimal string by `10^decimals`.
///
/// # Arguments
/// * `amount` - Non-negative decimal such as `"12"`, `"0.5"` or `".25"`.
/// * `decimals` - Number of decimal places of the unit.
///
/// # Returns
/// The integer minor-unit amount, `FractionalAmount` if digits remain
/// after the last allowed decimal place, or `InvalidAmount` if the text is
/// not a plain decimal number.
pub fn to_minor_units(amount: &str, decimals: u32) -> Result<BigUint, OperationError> {
    let trimmed = amount.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(OperationError::InvalidAmount(amount.to_string()));
    }

    let places = decimals as usize;
    let significant = frac.trim_end_matches('0');
    if significant.len() > places {
        return Err(OperationError::FractionalAmount {
            amount: amount.to_string(),
            decimals,
        });
    }

    let mut digits = String::with_capacity(whole.len() + places);
    digits.push_str(whole);
    digits.push_str(significant);
    digits.extend(std::iter::repeat('0').take(places - significant.len()));
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| OperationError::InvalidAmount(amount.to_string()))
}

/// Convert a tez amount to mutez.
///
/// # Returns
/// The mutez value, or an error if it has more than six decimals or does
/// not fit the protocol's 64-bit amount.
pub fn tez_to_mutez(amount: &str) -> Result<u64, OperationError> {
    to_minor_units(amount, TEZ_DECIMALS)?
        .to_u64()
        .ok_or_else(|| OperationError::InvalidAmount(format!("{amount} tez is out of range")))
}
