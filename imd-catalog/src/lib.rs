//! Group catalog data model, master sheet CSV loading, and row mapping.
//!
//! This crate has no database dependencies. It turns the master profile
//! sheet into typed records that `imd-db` persists and `imd-import` drives.

pub mod mapping;
pub mod master_csv;
pub mod normalize;
pub mod records;
pub mod types;

pub use mapping::{RowPlan, RowSkip, map_row};
pub use master_csv::{MasterCsvError, filter_flagged, load_master_csv, parse_master_csv};
pub use normalize::{extract_handle, extract_spotify_id, is_valid_slug, normalize_slug};
pub use records::{build_external_records, build_profile_records};
pub use types::*;
