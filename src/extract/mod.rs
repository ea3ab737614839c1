//! Markup extraction for listing pages
//!
//! This module recovers structured records from page markup:
//!
//! - `extract_cards`: one candidate record per listing card on a results page
//! - `parse_detail_page`: the fixed parameter set from a listing's own page
//! - `recover_boundary`: the ancestor walk that finds a card's container
//!
//! Extraction never fails: malformed markup yields fewer cards or absent
//! fields. Validation (dropping records without a URL or card id) is the
//! caller's job.

mod boundary;
mod card;
mod detail;

pub use boundary::recover_boundary;
pub use card::{extract_cards, CardCandidate};
pub use detail::parse_detail_page;

use scraper::ElementRef;

/// Collects an element's text nodes, trimmed and joined with single spaces.
///
/// Mirrors what a browser shows for nested inline markup: `<p><span>1 200
/// </span>сум</p>` reads as "1 200 сум".
pub(crate) fn text_joined(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
