//! Crawl engines for listing pages and detail pages
//!
//! This module contains the stateful half of the harvester:
//! - HTTP client construction and per-request outcome classification
//! - `DistrictCrawler`: sequential pagination over one district's results
//! - `DetailEngine`: resumable, checkpointed fetch of per-listing details
//!
//! Both engines are strictly sequential: one request in flight at a time,
//! with a politeness delay between requests. Transport failures and bad
//! statuses terminate a page or item, never the surrounding batch.

mod details;
mod district;
mod fetcher;

pub use details::{DetailEngine, DetailStats};
pub use district::{DistrictCrawlStats, DistrictCrawler, StopReason};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
