//! Decimal-string unit conversions.
//!
//! Amounts enter as decimal strings and are converted to base units once, at
//! request construction. No float arithmetic.

use alloy::primitives::utils::{self, ParseUnits, UnitsError};
use alloy::primitives::{ruint, ParseSignedError, U256};

/// Parse an unsigned decimal amount; negative amounts are a unit error.
fn parse_unsigned(amount: &str, unit: &str) -> Result<U256, UnitsError> {
    match utils::parse_units(amount, unit)? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(value) if value.is_negative() => Err(UnitsError::ParseSigned(
            ParseSignedError::Ruint(ruint::ParseError::InvalidDigit('-')),
        )),
        ParseUnits::I256(value) => Ok(value.into_raw()),
    }
}

/// Convert a decimal ether amount to wei.
pub fn parse_ether(amount: &str) -> Result<U256, UnitsError> {
    parse_unsigned(amount, "ether")
}

/// Convert a decimal gwei amount to wei.
pub fn parse_gwei(amount: &str) -> Result<U256, UnitsError> {
    parse_unsigned(amount, "gwei")
}

/// Render a wei amount as a decimal ether string.
pub fn format_ether(wei: U256) -> String {
    utils::format_ether(wei)
}
