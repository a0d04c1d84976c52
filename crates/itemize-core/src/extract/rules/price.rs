//! Price parsing, currency formatting, and the wholesale-price heuristic.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{NON_PRICE_CHARS, PRICE_TOKEN};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::PriceConfig;

/// Extractor for `D.DD` price tokens.
pub struct PriceExtractor;

impl PriceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        for caps in PRICE_TOKEN.captures_iter(text) {
            let group = caps.get(1).unwrap();
            if let Ok(value) = Decimal::from_str(group.as_str()) {
                results.push(
                    ExtractionMatch::new(value, group.as_str())
                        .with_position(group.start(), group.end()),
                );
            }
        }
        results
    }
}

/// Format a decimal as display currency, `$D.DD`.
pub fn format_currency(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// Normalize a raw price string to `$D.DD`.
///
/// Strips everything except digits, `.` and `-`, then parses what remains;
/// unparseable input collapses to an empty string, never an error.
pub fn clean_price(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let numeric = NON_PRICE_CHARS.replace_all(raw, "");
    if numeric.is_empty() {
        return String::new();
    }
    match Decimal::from_str(&numeric) {
        Ok(value) => format_currency(value),
        Err(_) => String::new(),
    }
}

/// Pick the wholesale price out of a raw line-item snippet.
///
/// Vendor lines print list price then wholesale price, so with several
/// candidates the second one wins. A lone decimal sitting at the end of the
/// snippet is a quantity, not a price ("SMG6H Smudge Hippo Tiny 6.00"), and
/// is ignored. The winner must fall inside the configured bounds.
pub fn extract_wholesale_price(text: &str, config: &PriceConfig) -> Option<String> {
    let all = PriceExtractor::new().extract_all(text);

    let mut candidates: Vec<&ExtractionMatch<Decimal>> = Vec::new();
    for candidate in &all {
        if all.len() == 1 && text.trim().ends_with(&candidate.source) {
            continue;
        }
        candidates.push(candidate);
    }

    let winner = match candidates.len() {
        0 => return None,
        1 => candidates[0],
        _ => candidates[1],
    };

    if winner.value >= config.min_price && winner.value <= config.max_price {
        Some(format_currency(winner.value))
    } else {
        None
    }
}
