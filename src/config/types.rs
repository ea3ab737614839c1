use crate::model::District;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Arenda-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_districts", rename = "district")]
    pub districts: Vec<District>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            site: SiteConfig::default(),
            output: OutputConfig::default(),
            districts: default_districts(),
        }
    }
}

/// Request pacing and batching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Fixed delay between listing-page fetches (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Lower bound of the random delay between detail fetches (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the random delay between detail fetches (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    /// Checkpoint the detail output after this many processed items
    #[serde(rename = "save-interval")]
    pub save_interval: usize,

    /// Maximum listing pages fetched per district
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            page_delay_ms: 1500,
            min_delay_ms: 1000,
            max_delay_ms: 2500,
            save_interval: 50,
            max_pages: 10,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Target-site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root, e.g. "https://www.olx.uz"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Listing search path under the root
    #[serde(rename = "search-path")]
    pub search_path: String,

    /// Browser-like User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.olx.uz".to_string(),
            search_path: "/nedvizhimost/kvartiry/arenda-dolgosrochnaya/tashkent/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        }
    }
}

impl SiteConfig {
    /// The parsed site root, used to resolve card hrefs to absolute URLs.
    pub fn base(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }

    /// Results-page URL for one district and page number.
    pub fn listing_page_url(
        &self,
        district_id: u32,
        page: u32,
    ) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}{}?search[district_id]={}&currency=UZS&page={}",
            self.base_url.trim_end_matches('/'),
            self.search_path,
            district_id,
            page
        ))
    }
}

/// Output directory configuration, one directory per pipeline stage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(rename = "listings-dir")]
    pub listings_dir: String,

    #[serde(rename = "cleaned-dir")]
    pub cleaned_dir: String,

    #[serde(rename = "details-dir")]
    pub details_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            listings_dir: "./district_listing_page".to_string(),
            cleaned_dir: "./district_listing_page_cleaned".to_string(),
            details_dir: "./cards_details".to_string(),
        }
    }
}

/// The fixed district enumeration the harvester ships with.
fn default_districts() -> Vec<District> {
    [
        (26, "yakkasarai"),
        (25, "yunusabad"),
        (24, "shaykhantohur"),
        (23, "chilonzor"),
        (22, "yashnabad"),
        (21, "uchtepa"),
        (20, "almazar"),
        (19, "sergeli"),
        (18, "bektemir"),
        (13, "mirabad"),
        (12, "mirzo-ulugbek"),
    ]
    .into_iter()
    .map(|(id, name)| District {
        id,
        name: name.to_string(),
    })
    .collect()
}
