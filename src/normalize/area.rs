use regex::Regex;
use std::sync::LazyLock;

static AREA_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)").expect("static regex"));

/// Extracts the first decimal-looking number from arbitrary surrounding text
///
/// Area values arrive with unit suffixes and labels ("54.5 м²",
/// "Общая площадь: 54.5 м²"). A comma is tolerated as the decimal
/// separator. No number → `None`.
pub fn parse_area(raw: &str) -> Option<f64> {
    AREA_NUMBER
        .captures(raw)
        .and_then(|caps| caps[1].replace(',', ".").parse::<f64>().ok())
}
