// src/summary.rs

use serde::Serialize;
use std::{collections::BTreeMap, fmt};

use crate::market::{MarketRecord, SiteKind};

/// Coverage counts over a set of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Summary {
    pub total: usize,
    pub with_website: usize,
    pub missing_website: usize,
    pub by_site_kind: BTreeMap<SiteKind, usize>,
    /// Tag → count, keyed by the first spelling seen.
    pub tags: Vec<(String, usize)>,
}

impl Summary {
    pub fn from_records(records: &[MarketRecord]) -> Self {
        let mut summary = Summary {
            total: records.len(),
            ..Summary::default()
        };
        for r in records {
            match r.site_kind() {
                Some(kind) => {
                    summary.with_website += 1;
                    *summary.by_site_kind.entry(kind).or_default() += 1;
                }
                None => summary.missing_website += 1,
            }
            for tag in r.tags.iter() {
                match summary
                    .tags
                    .iter_mut()
                    .find(|(t, _)| t.to_lowercase() == tag.to_lowercase())
                {
                    Some((_, n)) => *n += 1,
                    None => summary.tags.push((tag.to_string(), 1)),
                }
            }
        }
        // most common first, ties alphabetical
        summary
            .tags
            .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        summary
    }

    pub fn site_kind_count(&self, kind: SiteKind) -> usize {
        self.by_site_kind.get(&kind).copied().unwrap_or(0)
    }

    fn pct(&self, n: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            n as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total markets: {}", self.total)?;
        writeln!(
            f,
            "With website: {} ({:.1}%)",
            self.with_website,
            self.pct(self.with_website)
        )?;
        writeln!(
            f,
            "Missing website: {} ({:.1}%)",
            self.missing_website,
            self.pct(self.missing_website)
        )?;
        writeln!(f, "\nBy site kind:")?;
        for kind in SiteKind::ALL {
            let n = self.site_kind_count(kind);
            writeln!(f, "  {}: {} ({:.1}%)", kind, n, self.pct(n))?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "\nTags:")?;
            for (tag, n) in &self.tags {
                writeln!(f, "  {}: {}", tag, n)?;
            }
        }
        Ok(())
    }
}
