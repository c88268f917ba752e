// src/export.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    collections::HashSet,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

use crate::market::MarketRecord;

/// Write one normalised website URL per line, after a `#` comment header.
/// Records without a usable URL are skipped; repeated URLs are written once.
/// Returns the number of URLs written.
pub fn write_websites<W: Write>(records: &[MarketRecord], mut out: W) -> Result<usize> {
    writeln!(out, "# market websites, one per line")?;
    let mut seen = HashSet::new();
    let mut written = 0;
    for url in records.iter().filter_map(MarketRecord::website) {
        if seen.insert(url.as_str().to_string()) {
            writeln!(out, "{}", url)?;
            written += 1;
        }
    }
    out.flush()?;
    Ok(written)
}

#[derive(Serialize)]
struct JsonExport<'a> {
    generated_at: DateTime<Utc>,
    count: usize,
    markets: &'a [MarketRecord],
}

pub fn write_json<W: Write>(records: &[MarketRecord], mut out: W) -> Result<()> {
    let doc = JsonExport {
        generated_at: Utc::now(),
        count: records.len(),
        markets: records,
    };
    serde_json::to_writer_pretty(&mut out, &doc).context("serializing markets to JSON")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Create `path` and write the websites list to it.
pub fn write_websites_file(records: &[MarketRecord], path: &Path) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let n = write_websites(records, BufWriter::new(file))
        .with_context(|| format!("writing websites to {:?}", path))?;
    info!(path = %path.display(), urls = n, "wrote websites list");
    Ok(n)
}

pub fn write_json_file(records: &[MarketRecord], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    write_json(records, BufWriter::new(file))
        .with_context(|| format!("writing JSON to {:?}", path))?;
    info!(path = %path.display(), markets = records.len(), "wrote JSON export");
    Ok(())
}
