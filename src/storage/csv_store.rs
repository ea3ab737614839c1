use crate::model::{ListingDetail, ListingSummary};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Store for per-district listing-summary files
#[derive(Debug, Clone)]
pub struct ListingStore {
    dir: PathBuf,
}

impl ListingStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", stem))
    }

    /// Rewrites the district's file with the full record set.
    pub fn save(&self, stem: &str, records: &[ListingSummary]) -> Result<PathBuf> {
        let path = self.path_for(stem);
        write_records(&path, records)?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Vec<ListingSummary>> {
        read_records(path)
    }

    /// All CSV files in the store directory, sorted by name.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        list_csv_files(&self.dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Store for per-district detail files; its key set is the resume marker
#[derive(Debug, Clone)]
pub struct DetailStore {
    dir: PathBuf,
}

impl DetailStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}_cards_details.csv", stem))
    }

    /// Loads the district's prior output, or an empty set when none exists.
    pub fn load_existing(&self, stem: &str) -> Result<Vec<ListingDetail>> {
        let path = self.path_for(stem);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_records(&path)
    }

    /// Rewrites the district's file with the full record set (done + new).
    pub fn save(&self, stem: &str, records: &[ListingDetail]) -> Result<PathBuf> {
        let path = self.path_for(stem);
        write_records(&path, records)?;
        Ok(path)
    }

    /// The card ids already present in a record set.
    pub fn done_ids(records: &[ListingDetail]) -> HashSet<String> {
        records
            .iter()
            .map(|record| record.card_id.clone())
            .collect()
    }
}

/// Serializes records to `path` atomically: write a sibling temp file,
/// then rename over the target.
fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
