//! Multi-district orchestration: scrape, clean, details
//!
//! Each stage runs sequentially over the configured districts. A failure
//! inside one district is caught at this boundary, recorded with the
//! district's name, and never stops the remaining districts. Stage reports
//! carry aggregate counters; the exit code is derived from them.

use crate::cleaning;
use crate::config::Config;
use crate::crawler::{build_http_client, DetailEngine, DetailStats, DistrictCrawler};
use crate::model::{CardRef, District};
use crate::storage::{DetailStore, ListingStore};
use crate::{HarvestError, Result};
use chrono::Local;
use std::path::Path;

/// One district-level failure, recorded without stopping the batch
#[derive(Debug)]
pub struct UnitError {
    pub unit: String,
    pub message: String,
}

/// Aggregate result of the scrape stage
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub scraped: usize,
    pub records: usize,
    pub errors: Vec<UnitError>,
}

impl ScrapeReport {
    /// At least one district produced output; lets the pipeline proceed.
    pub fn proceed(&self) -> bool {
        self.scraped > 0
    }

    pub fn success(&self) -> bool {
        self.proceed() && self.errors.is_empty()
    }
}

/// Aggregate result of the cleaning stage
#[derive(Debug, Default)]
pub struct CleanReport {
    pub processed: usize,
    pub rows_removed: usize,
    pub errors: Vec<UnitError>,
}

impl CleanReport {
    pub fn proceed(&self) -> bool {
        self.processed > 0
    }

    pub fn success(&self) -> bool {
        self.proceed() && self.errors.is_empty()
    }
}

/// Aggregate result of the details stage
#[derive(Debug, Default)]
pub struct DetailsReport {
    pub processed: usize,
    pub stats: Vec<(String, DetailStats)>,
    pub errors: Vec<UnitError>,
}

impl DetailsReport {
    pub fn success(&self) -> bool {
        self.processed > 0 && self.errors.is_empty()
    }
}

/// Combined report of a full pipeline run
#[derive(Debug, Default)]
pub struct FullReport {
    pub scrape: Option<ScrapeReport>,
    pub clean: Option<CleanReport>,
    pub details: Option<DetailsReport>,
}

impl FullReport {
    pub fn success(&self) -> bool {
        matches!(&self.scrape, Some(report) if report.success())
            && matches!(&self.clean, Some(report) if report.success())
            && matches!(&self.details, Some(report) if report.success())
    }
}

/// Sequential pipeline over the configured districts
pub struct Pipeline {
    config: Config,
    districts: Vec<District>,
}

impl Pipeline {
    /// Builds a pipeline over all configured districts, or the subset
    /// matching `district_filter` ids when one is given.
    pub fn new(config: Config, district_filter: Option<&[u32]>) -> Self {
        let districts = match district_filter {
            Some(ids) => config
                .districts
                .iter()
                .filter(|district| ids.contains(&district.id))
                .cloned()
                .collect(),
            None => config.districts.clone(),
        };
        Self { config, districts }
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// Stage 1: crawl listing pages for every district.
    pub async fn run_scrape(&self) -> Result<ScrapeReport> {
        let client = build_http_client(&self.config.site.user_agent, self.config.fetch.timeout())?;
        let store = ListingStore::new(&self.config.output.listings_dir)?;
        let crawler = DistrictCrawler::new(&client, &self.config, &store);
        let today = Local::now().date_naive();

        let mut report = ScrapeReport::default();
        for district in &self.districts {
            match crawler.run(district, today).await {
                Ok(stats) => {
                    report.scraped += 1;
                    report.records += stats.records;
                }
                Err(e) => {
                    tracing::error!("[{}] scrape failed: {}", district.name, e);
                    report.errors.push(UnitError {
                        unit: district.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "scrape stage: {} districts, {} records, {} errors",
            report.scraped,
            report.records,
            report.errors.len()
        );
        Ok(report)
    }

    /// Stage 2: clean every scraped listing file.
    pub fn run_clean(&self) -> Result<CleanReport> {
        let input = ListingStore::new(&self.config.output.listings_dir)?;
        let output = ListingStore::new(&self.config.output.cleaned_dir)?;

        let mut report = CleanReport::default();
        for file in input.list_files()? {
            match cleaning::clean_file(&file, &output) {
                Ok(stats) => {
                    report.processed += 1;
                    report.rows_removed += stats.removed;
                }
                Err(e) => {
                    let unit = display_stem(&file);
                    tracing::error!("[{}] cleaning failed: {}", unit, e);
                    report.errors.push(UnitError {
                        unit,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "clean stage: {} files, {} rows removed, {} errors",
            report.processed,
            report.rows_removed,
            report.errors.len()
        );
        Ok(report)
    }

    /// Stage 3: fetch detail records for every cleaned listing file.
    ///
    /// An empty input directory is a hard error: there is nothing to
    /// process and the run must exit non-zero.
    pub async fn run_details(&self) -> Result<DetailsReport> {
        let input = ListingStore::new(&self.config.output.cleaned_dir)?;
        let files = input.list_files()?;
        if files.is_empty() {
            return Err(HarvestError::EmptyInput(
                self.config.output.cleaned_dir.clone(),
            ));
        }

        let client = build_http_client(&self.config.site.user_agent, self.config.fetch.timeout())?;
        let store = DetailStore::new(&self.config.output.details_dir)?;
        let engine = DetailEngine::new(&client, &self.config, &store);
        let today = Local::now().date_naive();

        let mut report = DetailsReport::default();
        for file in &files {
            let stem = detail_stem(file);
            let outcome = async {
                let records = ListingStore::load(file)?;
                let inputs: Vec<CardRef> = records
                    .into_iter()
                    .map(|record| CardRef {
                        card_id: record.card_id,
                        url: record.url,
                    })
                    .collect();
                engine.run(&stem, &inputs, today).await
            }
            .await;

            match outcome {
                Ok(stats) => {
                    report.processed += 1;
                    report.stats.push((stem, stats));
                }
                Err(e) => {
                    tracing::error!("[{}] details failed: {}", stem, e);
                    report.errors.push(UnitError {
                        unit: stem,
                        message: e.to_string(),
                    });
                }
            }
        }

        let succeeded: usize = report.stats.iter().map(|(_, s)| s.succeeded).sum();
        let failed: usize = report.stats.iter().map(|(_, s)| s.failed).sum();
        let final_count: usize = report.stats.iter().map(|(_, s)| s.final_count).sum();
        tracing::info!(
            "details stage: {} districts, {} new, {} failed, {} total in output, {} errors",
            report.processed,
            succeeded,
            failed,
            final_count,
            report.errors.len()
        );
        Ok(report)
    }

    /// Full pipeline: scrape, then clean, then details.
    ///
    /// A stage that produced nothing at all stops the pipeline (the next
    /// stage would only report an empty input); district-level errors do
    /// not, but they do show up in the final report.
    pub async fn run_full(&self) -> Result<FullReport> {
        let mut report = FullReport::default();

        let scrape = self.run_scrape().await?;
        let scrape_ok = scrape.proceed();
        report.scrape = Some(scrape);
        if !scrape_ok {
            tracing::error!("pipeline stopped: no district scraped");
            return Ok(report);
        }

        let clean = self.run_clean()?;
        let clean_ok = clean.proceed();
        report.clean = Some(clean);
        if !clean_ok {
            tracing::error!("pipeline stopped: no file cleaned");
            return Ok(report);
        }

        report.details = Some(self.run_details().await?);
        Ok(report)
    }
}

/// Output stem for a cleaned input file: `yunusabad_cleaned.csv` feeds
/// `yunusabad_cards_details.csv`.
fn detail_stem(file: &Path) -> String {
    let stem = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("district");
    stem.strip_suffix("_cleaned").unwrap_or(stem).to_string()
}

fn display_stem(file: &Path) -> String {
    file.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("district")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detail_stem_strips_cleaned_suffix() {
        assert_eq!(
            detail_stem(&PathBuf::from("/tmp/yunusabad_cleaned.csv")),
            "yunusabad"
        );
        assert_eq!(detail_stem(&PathBuf::from("/tmp/yunusabad.csv")), "yunusabad");
    }

    #[test]
    fn test_district_filter() {
        let pipeline = Pipeline::new(Config::default(), Some(&[25, 24]));
        let ids: Vec<u32> = pipeline.districts().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![25, 24]);
    }

    #[test]
    fn test_no_filter_keeps_all_districts() {
        let pipeline = Pipeline::new(Config::default(), None);
        assert_eq!(pipeline.districts().len(), 11);
    }

    #[test]
    fn test_full_report_success_requires_all_stages() {
        let report = FullReport {
            scrape: Some(ScrapeReport {
                scraped: 3,
                records: 10,
                errors: vec![],
            }),
            clean: Some(CleanReport {
                processed: 3,
                rows_removed: 1,
                errors: vec![],
            }),
            details: None,
        };
        assert!(!report.success());
    }

    #[test]
    fn test_unit_error_breaks_success_but_not_proceed() {
        let report = ScrapeReport {
            scraped: 2,
            records: 5,
            errors: vec![UnitError {
                unit: "sergeli".to_string(),
                message: "boom".to_string(),
            }],
        };
        assert!(report.proceed());
        assert!(!report.success());
    }
}
