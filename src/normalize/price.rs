use regex::Regex;
use std::sync::LazyLock;

/// First maximal run of digits, spaces, commas, and periods.
static NUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d\s,.]+").expect("static regex"));

/// Non-numeric token immediately following the numeric run. The optional
/// dotted tail picks up abbreviations like "у.е".
static CURRENCY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\d\s,.]+\s*([^\d\s,.]+(?:\.[^\d\s,.]+)?)").expect("static regex")
});

/// Result of price normalization
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    pub value: Option<f64>,
    pub currency: Option<String>,
}

/// Normalizes a raw price block into a numeric value and a currency label
///
/// Example input: `"1 200 у.е. Договорная"`. The numeric token has its
/// internal spaces (including non-breaking ones) removed and a comma is
/// treated as the decimal separator. A token that still fails to parse as
/// a number yields `value = None`.
///
/// The currency is whatever non-numeric word trails the number; it is kept
/// verbatim (`"сум"`, `"у.е"`), with no symbol canonicalization. Consumers
/// compare against the raw local-currency word.
pub fn parse_price(raw: &str) -> ParsedPrice {
    let s = raw.trim().replace('\u{a0}', " ");
    if s.is_empty() {
        return ParsedPrice {
            value: None,
            currency: None,
        };
    }

    let value = NUMERIC_RUN.find(&s).and_then(|m| {
        let token = m.as_str().replace(' ', "").replace(',', ".");
        token.parse::<f64>().ok()
    });

    let currency = CURRENCY_TOKEN
        .captures(&s)
        .map(|caps| caps[1].trim().to_string())
        .filter(|c| !c.is_empty());

    ParsedPrice { value, currency }
}
