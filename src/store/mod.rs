// src/store/mod.rs

pub mod diagnostics;
pub mod load;
pub mod query;

pub use diagnostics::Diagnostic;
pub use load::LoadOptions;
pub use query::{by_site_kind, filter_by_tag, find_by_name, with_website};

use chrono::{DateTime, Utc};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::info;

use crate::error::FormatError;
use crate::market::{MarketRecord, SiteKind};

/// Immutable, in-memory collection of market records loaded once from the source table.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<MarketRecord>,
    diagnostics: Vec<Diagnostic>,
    missing_columns: Vec<&'static str>,
    rows_read: usize,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl RecordStore {
    /// Open and parse the table at `path` with default options.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        Self::load_with(path, &LoadOptions::default())
    }

    #[tracing::instrument(level = "info", skip(path, opts), fields(path = %path.as_ref().display()))]
    pub fn load_with<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FormatError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut store = Self::from_reader_with(BufReader::new(file), opts)?;
        store.source = Some(path.to_path_buf());
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FormatError> {
        Self::from_reader_with(reader, &LoadOptions::default())
    }

    pub fn from_reader_with<R: Read>(reader: R, opts: &LoadOptions) -> Result<Self, FormatError> {
        let parsed = load::parse(reader, opts)?;
        let skipped = parsed.diagnostics.iter().filter(|d| d.skipped_row()).count();
        info!(
            records = parsed.records.len(),
            rows = parsed.rows_read,
            skipped,
            "loaded market table"
        );
        Ok(Self {
            records: parsed.records,
            diagnostics: parsed.diagnostics,
            missing_columns: parsed.missing_columns,
            rows_read: parsed.rows_read,
            source: None,
            loaded_at: Utc::now(),
        })
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MarketRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Optional columns that were absent from the header.
    pub fn missing_columns(&self) -> &[&'static str] {
        &self.missing_columns
    }

    /// Non-header rows seen, kept or not.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn filter_by_tag(&self, tag: &str) -> Vec<&MarketRecord> {
        filter_by_tag(&self.records, tag)
    }

    pub fn find_by_name(&self, substring: &str) -> Vec<&MarketRecord> {
        find_by_name(&self.records, substring)
    }

    pub fn with_website(&self) -> Vec<&MarketRecord> {
        with_website(&self.records)
    }

    pub fn by_site_kind(&self, kind: SiteKind) -> Vec<&MarketRecord> {
        by_site_kind(&self.records, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::sync::Arc;
    use std::thread;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,njmarkets::store=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const HEADER: &str = "Name,Day/Hours,Address/Location,URL,Tags,Comments\n";

    #[test]
    fn test_load_example_row() {
        init_test_logging();
        let src = format!(
            "{}Trenton Farmers Market,\"Sat 9-1, May-Nov\",960 Spruce St,https://example.org,WIC,\n",
            HEADER
        );
        let store = RecordStore::from_reader(Cursor::new(src)).unwrap();
        assert_eq!(store.len(), 1);
        let r = &store.records()[0];
        assert_eq!(r.name, "Trenton Farmers Market");
        assert_eq!(r.tags.iter().collect::<Vec<_>>(), vec!["WIC"]);
        assert_eq!(r.comments, None);
        assert!(store.diagnostics().is_empty());

        let hits = store.filter_by_tag("WIC");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], r);
    }

    #[test]
    fn test_malformed_rows_are_skipped_not_fatal() {
        init_test_logging();
        let src = format!(
            "{}\
             Trenton Farmers Market,Sat,960 Spruce St,,WIC,\n\
             Extra Columns Market,Sat,Main St,,,,surplus\n\
             Short Row Market,Sun\n\
             Princeton Farmers Market,Thu,Hinds Plaza,,,\n",
            HEADER
        );
        let store = RecordStore::from_reader(Cursor::new(src)).unwrap();
        assert_eq!(store.rows_read(), 4);
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.diagnostics(),
            &[
                Diagnostic::MalformedRow {
                    line: 3,
                    expected: 6,
                    found: 7
                },
                Diagnostic::MalformedRow {
                    line: 4,
                    expected: 6,
                    found: 2
                },
            ]
        );
    }

    #[test]
    fn test_blank_names_skipped_duplicates_kept() {
        let src = format!(
            "{}\
             Westfield Market,Sat,,,,\n\
             ,Sun,Nowhere,,,\n\
             westfield market,Wed,,,,second listing\n",
            HEADER
        );
        let store = RecordStore::from_reader(Cursor::new(src)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_name("WESTFIELD").len(), 2);
        assert_eq!(
            store.diagnostics(),
            &[
                Diagnostic::MissingName { line: 3 },
                Diagnostic::DuplicateName {
                    line: 4,
                    first_line: 2,
                    name: "westfield market".into()
                },
            ]
        );
    }

    #[test]
    fn test_missing_header_row_fails() {
        // first line is data, so no Name column can be resolved
        let src = "Trenton Farmers Market,Sat,960 Spruce St,,WIC,\n";
        let err = RecordStore::from_reader(Cursor::new(src)).unwrap_err();
        assert!(matches!(err, FormatError::MissingColumn { .. }));

        let err = RecordStore::from_reader(Cursor::new("")).unwrap_err();
        assert!(matches!(err, FormatError::MissingHeader));
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(
            tmp,
            "{}Ocean City Farmers Market,\"Wed 8-1, Jun-Sep\",\"6th St & Asbury Ave, Ocean City\",,\"WIC, SNAP\",Rain or shine\n",
            HEADER
        )?;
        let store = RecordStore::load(tmp.path())?;
        assert_eq!(store.source(), Some(tmp.path()));
        let r = &store.records()[0];
        assert_eq!(r.address, "6th St & Asbury Ave, Ocean City");
        assert!(r.has_tag("snap"));
        assert_eq!(r.url, None);
        assert_eq!(r.comments.as_deref(), Some("Rain or shine"));
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_open_error() {
        let err = RecordStore::load("/nonexistent/markets.csv").unwrap_err();
        assert!(matches!(err, FormatError::Open { .. }));
    }

    #[test]
    fn test_store_shared_across_threads() {
        let src = format!("{}A Market,,,,WIC,\nB Market,,,,,\n", HEADER);
        let store = Arc::new(RecordStore::from_reader(Cursor::new(src)).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.filter_by_tag("wic").len())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 1);
        }
    }
}
