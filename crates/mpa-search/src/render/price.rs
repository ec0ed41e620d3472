use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Normalizes a price for display.
///
/// `$` and `,` are stripped and the rest parsed as a decimal; a parse yields
/// `$` plus the value to two places. Anything unparseable (`"Call for price"`)
/// is returned unchanged.
#[must_use]
pub fn format_price(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    match Decimal::from_str(cleaned.trim()) {
        Ok(value) => {
            let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("${rounded:.2}")
        }
        Err(_) => raw.to_string(),
    }
}
