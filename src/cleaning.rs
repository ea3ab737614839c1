//! Listing-set cleaning between the scrape and detail stages
//!
//! Results pages repeat promoted listings across pages, and the repeated
//! card often carries no price block. Cleaning drops rows that are
//! duplicates by card id *and* have no price information at all; every
//! other row survives, including unique rows without a price.

use crate::model::ListingSummary;
use crate::storage::ListingStore;
use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Result of cleaning one district file
#[derive(Debug)]
pub struct CleanStats {
    pub kept: usize,
    pub removed: usize,
    pub output_path: PathBuf,
}

/// Drops duplicate-by-card-id rows that carry no price information.
///
/// Returns the surviving rows and the number removed. All members of a
/// duplicate group are candidates: if every copy lacks a price, every copy
/// goes.
pub fn clean_records(records: Vec<ListingSummary>) -> (Vec<ListingSummary>, usize) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in &records {
        *counts.entry(record.card_id.clone()).or_default() += 1;
    }

    let before = records.len();
    let kept: Vec<ListingSummary> = records
        .into_iter()
        .filter(|record| {
            let duplicated = counts.get(&record.card_id).copied().unwrap_or(0) > 1;
            let price_missing = record
                .price_raw
                .as_deref()
                .map_or(true, |raw| raw.trim().is_empty())
                && record.price_value.is_none();
            !(duplicated && price_missing)
        })
        .collect();

    let removed = before - kept.len();
    (kept, removed)
}

/// Cleans one district file and writes `<stem>_cleaned.csv` to the output
/// store.
pub fn clean_file(input: &Path, output_store: &ListingStore) -> Result<CleanStats> {
    let records = ListingStore::load(input)?;
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("district")
        .to_string();

    let (kept, removed) = clean_records(records);
    let kept_count = kept.len();
    let output_path = output_store.save(&format!("{}_cleaned", stem), &kept)?;

    tracing::info!(
        "{}: {} rows removed, saved to {}",
        stem,
        removed,
        output_path.display()
    );

    Ok(CleanStats {
        kept: kept_count,
        removed,
        output_path,
    })
}
