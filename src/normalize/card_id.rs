use regex::Regex;
use std::sync::LazyLock;

static CARD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ID([A-Za-z0-9]+)").expect("static regex"));

/// Returns the alphanumeric token following the literal `ID` marker in a
/// listing URL, e.g. `...-ID16WPSG.html` → `16WPSG`. `None` if the URL
/// carries no such marker.
pub fn extract_card_id(url: &str) -> Option<String> {
    CARD_ID.captures(url).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_in_listing_url() {
        let url = "https://www.olx.uz/d/obyavlenie/kvartira-v-arendu-ID16WPSG.html";
        assert_eq!(extract_card_id(url), Some("16WPSG".to_string()));
    }

    #[test]
    fn test_id_stops_at_non_alphanumeric() {
        assert_eq!(
            extract_card_id("https://example.com/x-IDabc123.html"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(extract_card_id("https://www.olx.uz/d/obyavlenie/"), None);
    }
}
