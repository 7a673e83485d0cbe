use crate::BridgeError;
use alloy_primitives::{
    utils::{format_units, parse_units, ParseUnits},
    U256,
};

/// Parse a human-entered amount into the token's smallest unit.
///
/// Zero, negative and malformed amounts are rejected, as are amounts with
/// more fractional digits than the token has decimals.
pub fn parse_amount(value: &str, decimals: u8) -> Result<U256, BridgeError> {
    let value = value.trim();
    if let Some((_, fraction)) = value.split_once('.') {
        if fraction.len() > usize::from(decimals) {
            return Err(BridgeError::InvalidAmount(format!(
                "{value:?} has more than {decimals} decimal places"
            )));
        }
    }

    let parsed = parse_units(value, decimals)
        .map_err(|e| BridgeError::InvalidAmount(format!("{value:?}: {e}")))?;

    match parsed {
        ParseUnits::U256(amount) if !amount.is_zero() => Ok(amount),
        ParseUnits::U256(_) => Err(BridgeError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        )),
        ParseUnits::I256(_) => Err(BridgeError::InvalidAmount(
            "amount must not be negative".to_string(),
        )),
    }
}

/// Format a smallest-unit amount for display.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}
