// src/market/mod.rs

pub mod normalize;
pub mod types;

pub use normalize::{categorize_site, normalize_url, short_name};
pub use types::{MarketRecord, SiteKind, Tags};
