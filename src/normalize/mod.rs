//! Normalizers for raw scraped text
//!
//! Listing markup carries prices, dates, and areas as free-form
//! Russian-language strings. Every function in this module is total: bad
//! input yields `None` fields, never a panic or an error, because a single
//! malformed record must not abort a batch.

mod area;
mod card_id;
mod date;
mod price;

pub use area::parse_area;
pub use card_id::extract_card_id;
pub use date::{parse_location_date, parse_posted, LocationDate, PostedAt};
pub use price::{parse_price, ParsedPrice};
