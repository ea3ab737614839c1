use crate::config::Config;
use crate::crawler::{fetch_page, FetchOutcome};
use crate::extract::parse_detail_page;
use crate::model::CardRef;
use crate::storage::DetailStore;
use crate::Result;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;

/// Counters for one district's detail pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetailStats {
    /// Input pairs seen
    pub total: usize,
    /// Already present in the persisted output, not re-fetched
    pub skipped: usize,
    /// Fetched and parsed this run
    pub succeeded: usize,
    /// Bad status or transport failure; eligible for retry on the next run
    pub failed: usize,
    /// Records in the persisted output after the run
    pub final_count: usize,
}

/// Resumable batch fetcher for per-listing detail pages
///
/// The persisted output doubles as the checkpoint: its card-id set defines
/// "already processed", so a re-run is strictly additive and idempotent. A
/// failed item is simply absent from the output and will be retried by the
/// next invocation, never within the same run.
pub struct DetailEngine<'a> {
    client: &'a Client,
    config: &'a Config,
    store: &'a DetailStore,
}

impl<'a> DetailEngine<'a> {
    pub fn new(client: &'a Client, config: &'a Config, store: &'a DetailStore) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    /// Processes one district's input list in order
    ///
    /// Checkpoints the full in-memory set (previously done + newly
    /// fetched) after every `save-interval` processed items and
    /// unconditionally after the last one. Sleeps a uniformly random
    /// `[min-delay, max-delay]` interval before each subsequent fetch,
    /// skipped after the final item.
    pub async fn run(
        &self,
        district_stem: &str,
        inputs: &[CardRef],
        today: NaiveDate,
    ) -> Result<DetailStats> {
        let mut records = self.store.load_existing(district_stem)?;
        let done = DetailStore::done_ids(&records);

        let total = inputs.len();
        tracing::info!(
            "[{}] {} cards to process, {} already done",
            district_stem,
            total,
            done.len()
        );

        let mut stats = DetailStats {
            total,
            ..DetailStats::default()
        };
        let mut processed = 0usize;

        for (index, input) in inputs.iter().enumerate() {
            if done.contains(&input.card_id) {
                stats.skipped += 1;
                continue;
            }

            tracing::debug!("[{}/{}] card {}", index + 1, total, input.card_id);

            match fetch_page(self.client, &input.url).await {
                FetchOutcome::Success { body, .. } => {
                    records.push(parse_detail_page(&body, &input.card_id, today));
                    stats.succeeded += 1;
                }
                FetchOutcome::HttpStatus { status } => {
                    tracing::warn!("[{}] HTTP {} for card {}", district_stem, status, input.card_id);
                    stats.failed += 1;
                }
                FetchOutcome::Transport { error } => {
                    tracing::warn!(
                        "[{}] request failed for card {}: {}",
                        district_stem,
                        input.card_id,
                        error
                    );
                    stats.failed += 1;
                }
            }

            processed += 1;
            if processed % self.config.fetch.save_interval == 0 {
                self.store.save(district_stem, &records)?;
                tracing::info!("[{}] checkpoint: {} records", district_stem, records.len());
            }

            if index + 1 < total {
                tokio::time::sleep(self.random_delay()).await;
            }
        }

        // Final checkpoint regardless of cadence.
        self.store.save(district_stem, &records)?;
        stats.final_count = records.len();

        tracing::info!(
            "[{}] done: {} skipped, {} succeeded, {} failed, {} total in output",
            district_stem,
            stats.skipped,
            stats.succeeded,
            stats.failed,
            stats.final_count
        );

        Ok(stats)
    }

    fn random_delay(&self) -> Duration {
        let min = self.config.fetch.min_delay_ms;
        let max = self.config.fetch.max_delay_ms;
        Duration::from_millis(fastrand::u64(min..=max))
    }
}
