use crate::config::Config;
use crate::crawler::{fetch_page, FetchOutcome};
use crate::extract::{extract_cards, CardCandidate};
use crate::model::{District, ListingSummary};
use crate::normalize::extract_card_id;
use crate::storage::ListingStore;
use crate::Result;
use chrono::NaiveDate;
use reqwest::Client;
use std::path::PathBuf;

/// Why a district's pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Non-2xx status; the site answers past-the-end pages this way, so it
    /// is treated as a benign end-of-results signal.
    HttpStatus(u16),

    /// Timeout or connection failure; accumulated pages are kept.
    Transport,

    /// A page yielded zero valid cards: no more results.
    EmptyPage,

    /// The configured page cap was reached.
    PageLimit,
}

/// Result of one district's crawl pass
#[derive(Debug)]
pub struct DistrictCrawlStats {
    pub pages_fetched: u32,
    pub records: usize,
    pub stop_reason: StopReason,
    pub output_path: PathBuf,
}

/// Sequential pagination engine for one district's listing pages
///
/// Drives `Fetching(page) -> extracting -> deciding` until a stop
/// condition, then persists the accumulated set wholesale — each crawl
/// pass is authoritative for its district, with no merge against prior
/// runs.
pub struct DistrictCrawler<'a> {
    client: &'a Client,
    config: &'a Config,
    store: &'a ListingStore,
}

impl<'a> DistrictCrawler<'a> {
    pub fn new(client: &'a Client, config: &'a Config, store: &'a ListingStore) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    /// Crawls one district and persists its listing summaries
    ///
    /// Fetches pages starting at 1. A non-2xx status or a transport error
    /// ends the district's pagination without failing it: whatever was
    /// accumulated so far is saved. Only configuration and filesystem
    /// problems surface as errors.
    pub async fn run(&self, district: &District, today: NaiveDate) -> Result<DistrictCrawlStats> {
        let base = self.config.site.base()?;
        let max_pages = self.config.fetch.max_pages;

        let mut accumulated: Vec<ListingSummary> = Vec::new();
        let mut pages_fetched = 0u32;
        let mut page = 1u32;

        let stop_reason = loop {
            let page_url = self.config.site.listing_page_url(district.id, page)?;
            tracing::info!("[{}] fetching page {}: {}", district.name, page, page_url);

            match fetch_page(self.client, page_url.as_str()).await {
                FetchOutcome::Success { body, .. } => {
                    pages_fetched += 1;
                    let validated = validate_cards(extract_cards(&body, &base, today), district);
                    tracing::info!(
                        "[{}] parsed {} listings on page {}",
                        district.name,
                        validated.len(),
                        page
                    );

                    if validated.is_empty() {
                        break StopReason::EmptyPage;
                    }
                    accumulated.extend(validated);

                    if page >= max_pages {
                        break StopReason::PageLimit;
                    }

                    tokio::time::sleep(self.config.fetch.page_delay()).await;
                    page += 1;
                }

                FetchOutcome::HttpStatus { status } => {
                    tracing::warn!(
                        "[{}] HTTP {} on page {}, stopping",
                        district.name,
                        status,
                        page
                    );
                    break StopReason::HttpStatus(status);
                }

                FetchOutcome::Transport { error } => {
                    tracing::warn!(
                        "[{}] request failed on page {}: {}, stopping",
                        district.name,
                        page,
                        error
                    );
                    break StopReason::Transport;
                }
            }
        };

        let output_path = self.store.save(&district.file_stem(), &accumulated)?;
        tracing::info!(
            "[{}] saved {} rows to {}",
            district.name,
            accumulated.len(),
            output_path.display()
        );

        Ok(DistrictCrawlStats {
            pages_fetched,
            records: accumulated.len(),
            stop_reason,
            output_path,
        })
    }
}

/// Drops candidates without a URL or a card id and stamps the rest with
/// their district.
fn validate_cards(cards: Vec<CardCandidate>, district: &District) -> Vec<ListingSummary> {
    cards
        .into_iter()
        .filter_map(|card| {
            let url = card.url?;
            let card_id = extract_card_id(url.as_str())?;
            Some(ListingSummary {
                title: card.title,
                url: url.to_string(),
                price_raw: card.price_raw,
                price_value: card.price_value,
                price_currency: card.price_currency,
                location_text: card.location_date.location_text,
                posted_date_raw: card.location_date.posted_date_raw,
                posted_date: card.location_date.posted_date,
                time_raw: card.location_date.time_raw,
                card_id,
                district_id: district.id,
                district_name: district.name.clone(),
            })
        })
        .collect()
}
