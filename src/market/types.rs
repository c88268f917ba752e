// src/market/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use super::normalize::{categorize_site, normalize_url, short_name};

/// A single market row as parsed from the source table.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct MarketRecord {
    pub name: String,
    /// Free-text days/hours and seasonal range, kept verbatim.
    pub schedule: String,
    pub address: String,
    pub url: Option<String>,
    pub tags: Tags,
    pub comments: Option<String>,
    /// 1-based line in the source file.
    pub line: u64,
}

impl MarketRecord {
    /// The `url` cell normalised into something fetchable, if it is usable at all.
    pub fn website(&self) -> Option<Url> {
        self.url.as_deref().and_then(normalize_url)
    }

    pub fn site_kind(&self) -> Option<SiteKind> {
        self.website().map(|u| categorize_site(&u))
    }

    /// Name without the location qualifier or a trailing "COUNTY".
    pub fn short_name(&self) -> String {
        short_name(&self.name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Ordered set of labels. Membership ignores case; the first spelling wins.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Default)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Split a raw `Tags` cell on `,` or `;`.
    pub fn parse(cell: &str) -> Self {
        let mut tags = Tags::default();
        for piece in cell.split([',', ';']) {
            tags.insert(piece);
        }
        tags
    }

    /// Adds `tag` (trimmed) unless it is blank or already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        self.0.iter().any(|t| t.to_lowercase() == needle)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for Tags {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tags = Tags::default();
        for t in iter {
            tags.insert(t);
        }
        tags
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Rough category of a market's web presence.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SiteKind {
    Facebook,
    Municipal,
    Chamber,
    DedicatedMarket,
    Other,
}

impl SiteKind {
    pub const ALL: [SiteKind; 5] = [
        SiteKind::Facebook,
        SiteKind::Municipal,
        SiteKind::Chamber,
        SiteKind::DedicatedMarket,
        SiteKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteKind::Facebook => "facebook",
            SiteKind::Municipal => "municipal",
            SiteKind::Chamber => "chamber",
            SiteKind::DedicatedMarket => "dedicated_market",
            SiteKind::Other => "other",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
