use crate::extract::{recover_boundary, text_joined};
use crate::normalize::{parse_location_date, parse_price, LocationDate};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// How many ancestor levels the card-boundary walk may climb.
const BOUNDARY_HOPS: usize = 4;

/// One card recovered from a results page, fields normalized but not yet
/// validated
///
/// The extractor reports what it saw; dropping candidates without a URL or
/// card id is the crawl engine's decision.
#[derive(Debug, Clone)]
pub struct CardCandidate {
    pub title: Option<String>,
    pub url: Option<Url>,
    pub price_raw: Option<String>,
    pub price_value: Option<f64>,
    pub price_currency: Option<String>,
    pub location_date: LocationDate,
}

/// Extracts all listing cards from one results page
///
/// Card anchors are located with a primary structural selector; when the
/// markup variant in play yields nothing, an alternate wrapper selector is
/// tried (the site's class soup changes across deployments). Each anchor's
/// card container is recovered with a bounded ancestor walk, then the
/// fixed field set is read from labeled children and handed to the
/// normalizers.
pub fn extract_cards(html: &str, base: &Url, today: NaiveDate) -> Vec<CardCandidate> {
    let document = Html::parse_document(html);

    let anchors = select_card_anchors(&document);
    anchors
        .into_iter()
        .map(|anchor| parse_card(recover_boundary(anchor, BOUNDARY_HOPS), base, today))
        .collect()
}

/// Finds candidate card anchors, falling back to the alternate wrapper
/// selector when the primary one matches nothing.
fn select_card_anchors(document: &Html) -> Vec<ElementRef<'_>> {
    if let Ok(primary) = Selector::parse("div[data-testid='listing-grid'] a.css-1tqlkj0") {
        let anchors: Vec<_> = document.select(&primary).collect();
        if !anchors.is_empty() {
            return anchors;
        }
    }

    if let Ok(fallback) = Selector::parse("div.css-1sw7q4x") {
        return document.select(&fallback).collect();
    }

    Vec::new()
}

/// Reads the fixed field set out of one card element
fn parse_card(card: ElementRef<'_>, base: &Url, today: NaiveDate) -> CardCandidate {
    let mut title = None;
    let mut url = None;

    if let Ok(anchor_selector) = Selector::parse("a.css-1tqlkj0") {
        if let Some(anchor) = card.select(&anchor_selector).next() {
            title = anchor_title(anchor);
            url = anchor
                .value()
                .attr("href")
                .and_then(|href| base.join(href).ok());
        }
    }

    let price_raw = labeled_text(card, "p[data-testid='ad-price']");
    let parsed_price = price_raw.as_deref().map(parse_price);
    let (price_value, price_currency) = match parsed_price {
        Some(parsed) => (parsed.value, parsed.currency),
        None => (None, None),
    };

    let location_raw = labeled_text(card, "p[data-testid='location-date']");
    let location_date = parse_location_date(location_raw.as_deref().unwrap_or(""), today);

    CardCandidate {
        title,
        url,
        price_raw,
        price_value,
        price_currency,
        location_date,
    }
}

/// Title is the first heading inside the anchor, else the anchor's own text.
fn anchor_title(anchor: ElementRef<'_>) -> Option<String> {
    if let Ok(heading_selector) = Selector::parse("h4") {
        if let Some(heading) = anchor.select(&heading_selector).next() {
            let text = text_joined(heading);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    let text = text_joined(anchor);
    (!text.is_empty()).then_some(text)
}

fn labeled_text(card: ElementRef<'_>, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    card.select(&selector)
        .next()
        .map(text_joined)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.olx.uz").unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    const GRID_PAGE: &str = r#"
        <html><body>
        <div data-testid="listing-grid">
            <div class="wrapper">
                <a class="css-1tqlkj0" href="/d/obyavlenie/kvartira-ID16WPSG.html">
                    <h4>2-комнатная квартира</h4>
                </a>
                <p data-testid="ad-price">1 200 сум</p>
                <p data-testid="location-date">Ташкент, Юнусабадский район - 21 ноября в 13:20</p>
            </div>
            <div class="wrapper">
                <a class="css-1tqlkj0" href="/d/obyavlenie/studiya-ID9AABB.html">Студия</a>
                <p data-testid="ad-price">900 у.е.</p>
                <p data-testid="location-date">Ташкент, Сергели - Сегодня в 10:47</p>
            </div>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_cards_from_grid() {
        let cards = extract_cards(GRID_PAGE, &base(), today());
        assert_eq!(cards.len(), 2);

        let first = &cards[0];
        assert_eq!(first.title, Some("2-комнатная квартира".to_string()));
        assert_eq!(
            first.url.as_ref().map(Url::as_str),
            Some("https://www.olx.uz/d/obyavlenie/kvartira-ID16WPSG.html")
        );
        assert_eq!(first.price_raw, Some("1 200 сум".to_string()));
        assert_eq!(first.price_value, Some(1200.0));
        assert_eq!(first.price_currency, Some("сум".to_string()));
        assert_eq!(
            first.location_date.location_text,
            Some("Ташкент, Юнусабадский район".to_string())
        );
        assert_eq!(
            first.location_date.posted_date,
            NaiveDate::from_ymd_opt(2024, 11, 21)
        );
        assert_eq!(first.location_date.time_raw, Some("13:20".to_string()));
    }

    #[test]
    fn test_anchor_text_is_title_fallback() {
        let cards = extract_cards(GRID_PAGE, &base(), today());
        assert_eq!(cards[1].title, Some("Студия".to_string()));
        assert_eq!(cards[1].location_date.posted_date, Some(today()));
    }

    #[test]
    fn test_fallback_selector_when_grid_absent() {
        let html = r#"
            <html><body>
            <div class="css-1sw7q4x">
                <a class="css-1tqlkj0" href="/d/obyavlenie/dom-ID7CCDD.html"><h4>Дом</h4></a>
                <p data-testid="ad-price">5 000 000 сум</p>
            </div>
            </body></html>
        "#;
        let cards = extract_cards(html, &base(), today());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, Some("Дом".to_string()));
        assert_eq!(cards[0].price_value, Some(5_000_000.0));
        assert_eq!(cards[0].location_date.posted_date, None);
    }

    #[test]
    fn test_card_without_href_has_no_url() {
        let html = r#"
            <html><body>
            <div data-testid="listing-grid">
                <div><a class="css-1tqlkj0"><h4>Без ссылки</h4></a></div>
            </div>
            </body></html>
        "#;
        let cards = extract_cards(html, &base(), today());
        assert_eq!(cards.len(), 1);
        assert!(cards[0].url.is_none());
    }

    #[test]
    fn test_empty_page_yields_no_cards() {
        let cards = extract_cards("<html><body></body></html>", &base(), today());
        assert!(cards.is_empty());
    }
}
