//! CSV persistence, one file per district per stage
//!
//! Every save is a full-file rewrite through a temp-file-then-rename, so a
//! crash mid-write never corrupts prior state: the last successful
//! checkpoint always wins. The detail store's key set doubles as the
//! resume marker for the detail engine.

mod csv_store;

pub use csv_store::{DetailStore, ListingStore};
