//! Premium/discount rate normalization
//!
//! Quotes arrive either as percent text (`"-0.49%"`) or as bare numbers. Both
//! are reduced to a signed rate in percent units; anything unreadable becomes
//! `None` instead of an error.

use serde::{Deserialize, Serialize};

/// Raw quotation cell as supplied by an input table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuote {
    Number(f64),
    Text(String),
}

impl From<f64> for RawQuote {
    fn from(value: f64) -> Self {
        RawQuote::Number(value)
    }
}

impl From<&str> for RawQuote {
    fn from(value: &str) -> Self {
        RawQuote::Text(value.to_string())
    }
}

/// Parse a raw quotation into a rate in percent units.
///
/// # Arguments
/// * `raw` - Quotation text or number, possibly absent
///
/// # Returns
/// * `Option<f64>` - Parsed rate, `None` on absence or parse failure
pub fn parse_rate(raw: Option<&RawQuote>) -> Option<f64> {
    let value = match raw? {
        RawQuote::Number(value) => *value,
        RawQuote::Text(text) => {
            let trimmed = text.trim();
            let stripped = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
            if stripped.is_empty() {
                return None;
            }
            stripped.parse::<f64>().ok()?
        }
    };

    value.is_finite().then_some(value)
}

/// Parse a plain numeric cell (price, index level). No percent marker allowed.
pub fn parse_value(raw: Option<&RawQuote>) -> Option<f64> {
    let value = match raw? {
        RawQuote::Number(value) => *value,
        RawQuote::Text(text) => text.trim().replace(',', "").parse::<f64>().ok()?,
    };

    value.is_finite().then_some(value)
}

/// Render a rate back to two-decimal percent text
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent_text() {
        assert_eq!(parse_rate(Some(&RawQuote::from("-0.49%"))), Some(-0.49));
        assert_eq!(parse_rate(Some(&RawQuote::from("0.38"))), Some(0.38));
        assert_eq!(parse_rate(Some(&RawQuote::from("  1.2 % "))), Some(1.2));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_rate(Some(&RawQuote::from(-0.16))), Some(-0.16));
        assert_eq!(parse_rate(Some(&RawQuote::Number(f64::NAN))), None);
    }

    #[test]
    fn test_parse_failures_are_undefined() {
        assert_eq!(parse_rate(None), None);
        assert_eq!(parse_rate(Some(&RawQuote::from(""))), None);
        assert_eq!(parse_rate(Some(&RawQuote::from("%"))), None);
        assert_eq!(parse_rate(Some(&RawQuote::from("--"))), None);
        assert_eq!(parse_rate(Some(&RawQuote::from("N/A"))), None);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(Some(&RawQuote::from("1,234.5"))), Some(1234.5));
        assert_eq!(parse_value(Some(&RawQuote::from(18.2))), Some(18.2));
        assert_eq!(parse_value(Some(&RawQuote::from("18.2%"))), None);
        assert_eq!(parse_value(Some(&RawQuote::from("."))), None);
    }

    #[test]
    fn test_round_trip_two_decimals() {
        let rate = parse_rate(Some(&RawQuote::from("-0.49%"))).unwrap();
        assert_eq!(format_rate(rate), "-0.49%");
        assert_eq!(format_rate(0.1), "0.10%");
    }

    #[test]
    fn test_raw_quote_deserializes_text_or_number() {
        let text: RawQuote = serde_json::from_str("\"0.25%\"").unwrap();
        let number: RawQuote = serde_json::from_str("0.25").unwrap();
        assert_eq!(parse_rate(Some(&text)), parse_rate(Some(&number)));
    }
}
