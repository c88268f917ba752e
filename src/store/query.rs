// src/store/query.rs

use crate::market::{MarketRecord, SiteKind};

/// Records whose tag set contains `tag`, ignoring case, in source order.
pub fn filter_by_tag<'a>(records: &'a [MarketRecord], tag: &str) -> Vec<&'a MarketRecord> {
    records.iter().filter(|r| r.has_tag(tag)).collect()
}

/// Records whose name contains `substring`, ignoring case, in source order.
/// The substring is matched as given, whitespace included. An empty
/// substring matches everything.
pub fn find_by_name<'a>(records: &'a [MarketRecord], substring: &str) -> Vec<&'a MarketRecord> {
    let needle = substring.to_lowercase();
    records
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}

/// Records with a usable website.
pub fn with_website(records: &[MarketRecord]) -> Vec<&MarketRecord> {
    records.iter().filter(|r| r.website().is_some()).collect()
}

pub fn by_site_kind(records: &[MarketRecord], kind: SiteKind) -> Vec<&MarketRecord> {
    records
        .iter()
        .filter(|r| r.site_kind() == Some(kind))
        .collect()
}
