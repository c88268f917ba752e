// src/lib.rs

pub mod config;
pub mod error;
pub mod export;
pub mod market;
pub mod store;
pub mod summary;

pub use error::{ConfigError, FormatError};
pub use market::{MarketRecord, SiteKind, Tags};
pub use store::{filter_by_tag, find_by_name, Diagnostic, LoadOptions, RecordStore};
pub use summary::Summary;
