// src/store/load.rs

use csv::{ReaderBuilder, StringRecord};
use std::{collections::HashMap, io::Read};
use tracing::{debug, warn};

use crate::error::FormatError;
use crate::market::{MarketRecord, Tags};

use super::Diagnostic;

/// Knobs for parsing the source table.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Header spellings accepted for each field, compared case-insensitively.
const NAME_HEADERS: &[&str] = &["name"];
const SCHEDULE_HEADERS: &[&str] = &["day/hours", "days/hours"];
const ADDRESS_HEADERS: &[&str] = &["address/location", "address"];
const URL_HEADERS: &[&str] = &["url", "website"];
const TAGS_HEADERS: &[&str] = &["tags"];
const COMMENTS_HEADERS: &[&str] = &["comments"];

/// Positions of each known column within a row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnMap {
    width: usize,
    name: usize,
    schedule: Option<usize>,
    address: Option<usize>,
    url: Option<usize>,
    tags: Option<usize>,
    comments: Option<usize>,
}

impl ColumnMap {
    /// Resolve columns by header name. Returns the map plus the optional
    /// columns that were not found.
    fn from_headers(headers: &StringRecord) -> Result<(Self, Vec<&'static str>), FormatError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();
        if normalized.iter().all(|h| h.is_empty()) {
            return Err(FormatError::MissingHeader);
        }

        let find = |names: &[&str]| normalized.iter().position(|h| names.contains(&h.as_str()));

        let name = find(NAME_HEADERS).ok_or(FormatError::MissingColumn { column: "Name" })?;

        let mut missing = Vec::new();
        let mut optional = |names: &[&str], label: &'static str| {
            let idx = find(names);
            if idx.is_none() {
                missing.push(label);
            }
            idx
        };
        let schedule = optional(SCHEDULE_HEADERS, "Day/Hours");
        let address = optional(ADDRESS_HEADERS, "Address/Location");
        let url = optional(URL_HEADERS, "URL");
        let tags = optional(TAGS_HEADERS, "Tags");
        let comments = optional(COMMENTS_HEADERS, "Comments");

        Ok((
            Self {
                width: headers.len(),
                name,
                schedule,
                address,
                url,
                tags,
                comments,
            },
            missing,
        ))
    }
}

fn cell(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

fn non_blank(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Everything produced by one pass over the source.
#[derive(Debug, Default)]
pub(crate) struct Parsed {
    pub records: Vec<MarketRecord>,
    pub diagnostics: Vec<Diagnostic>,
    pub missing_columns: Vec<&'static str>,
    pub rows_read: usize,
}

/// Parse the market table from any reader.
///
/// The first non-blank row is the header. A row is skipped and recorded as a
/// diagnostic when its field count differs from the header, its `Name` is
/// blank, it repeats the header, or it fails to decode. Only I/O failures
/// abort the load.
pub(crate) fn parse<R: Read>(reader: R, opts: &LoadOptions) -> Result<Parsed, FormatError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(opts.delimiter)
        .from_reader(reader);

    let mut rows = rdr.records();

    let header = loop {
        match rows.next() {
            None => return Err(FormatError::MissingHeader),
            Some(Err(e)) if e.is_io_error() => return Err(FormatError::Csv(e)),
            Some(Err(e)) => {
                warn!(error = %e, "skipping undecodable line before header");
            }
            Some(Ok(rec)) => break rec,
        }
    };

    let (columns, missing_columns) = ColumnMap::from_headers(&header)?;
    for col in &missing_columns {
        warn!(column = col, "optional column missing from header; field left empty");
    }
    debug!(?columns, "resolved header");
    let header_name = cell(&header, Some(columns.name))
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase();

    let mut parsed = Parsed {
        missing_columns,
        ..Parsed::default()
    };
    let mut first_seen: HashMap<String, u64> = HashMap::new();

    for result in rows {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(FormatError::Csv(e)),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!(line, error = %e, "unreadable row skipped");
                parsed.rows_read += 1;
                parsed.diagnostics.push(Diagnostic::UnreadableRow {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        parsed.rows_read += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != columns.width {
            warn!(
                line,
                expected = columns.width,
                found = record.len(),
                "malformed row skipped"
            );
            parsed.diagnostics.push(Diagnostic::MalformedRow {
                line,
                expected: columns.width,
                found: record.len(),
            });
            continue;
        }

        let name = cell(&record, Some(columns.name));
        if name.is_empty() {
            warn!(line, "row with blank Name skipped");
            parsed.diagnostics.push(Diagnostic::MissingName { line });
            continue;
        }

        let key = name.to_lowercase();
        if key == header_name {
            warn!(line, "repeated header row skipped");
            parsed.diagnostics.push(Diagnostic::RepeatedHeader { line });
            continue;
        }
        if let Some(&first_line) = first_seen.get(&key) {
            warn!(line, first_line, name, "duplicate market name kept");
            parsed.diagnostics.push(Diagnostic::DuplicateName {
                line,
                first_line,
                name: name.to_string(),
            });
        } else {
            first_seen.insert(key, line);
        }

        parsed.records.push(MarketRecord {
            name: name.to_string(),
            schedule: cell(&record, columns.schedule).to_string(),
            address: cell(&record, columns.address).to_string(),
            url: non_blank(cell(&record, columns.url)),
            tags: Tags::parse(cell(&record, columns.tags)),
            comments: non_blank(cell(&record, columns.comments)),
            line,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(s: &str) -> Result<Parsed, FormatError> {
        parse(Cursor::new(s.as_bytes()), &LoadOptions::default())
    }

    #[test]
    fn test_header_lookup_ignores_order_and_case() {
        let src = "tags, comments ,URL,Address/Location,\u{feff}NAME,Day/Hours\n\
                   WIC,,https://example.org,960 Spruce St,Trenton Farmers Market,\"Sat 9-1, May-Nov\"\n";
        let parsed = parse_str(src).unwrap();
        assert!(parsed.missing_columns.is_empty());
        let r = &parsed.records[0];
        assert_eq!(r.name, "Trenton Farmers Market");
        assert_eq!(r.schedule, "Sat 9-1, May-Nov");
        assert_eq!(r.address, "960 Spruce St");
        assert_eq!(r.url.as_deref(), Some("https://example.org"));
        assert_eq!(r.line, 2);
    }

    #[test]
    fn test_missing_optional_columns_are_reported() {
        let parsed = parse_str("Name,URL\nCollingswood,collingswood.com\n").unwrap();
        assert_eq!(
            parsed.missing_columns,
            vec!["Day/Hours", "Address/Location", "Tags", "Comments"]
        );
        assert_eq!(parsed.records[0].schedule, "");
        assert!(parsed.records[0].tags.is_empty());
    }

    #[test]
    fn test_missing_name_column_is_fatal() {
        let err = parse_str("Day/Hours,Address/Location\nSat,Main St\n").unwrap_err();
        assert!(matches!(err, FormatError::MissingColumn { column: "Name" }));
    }

    #[test]
    fn test_blank_header_is_missing_header() {
        assert!(matches!(parse_str(""), Err(FormatError::MissingHeader)));
        assert!(matches!(parse_str("\n\n"), Err(FormatError::MissingHeader)));
        assert!(matches!(parse_str(",,,\n"), Err(FormatError::MissingHeader)));
    }

    #[test]
    fn test_repeated_header_row_is_skipped() {
        let src = "Name,Tags\nA,WIC\n name ,TAGS\nB,\n";
        let parsed = parse_str(src).unwrap();
        let names: Vec<_> = parsed.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(parsed.diagnostics, vec![Diagnostic::RepeatedHeader { line: 3 }]);
        assert_eq!(parsed.rows_read, 3);
    }

    #[test]
    fn test_undecodable_row_is_skipped() {
        let mut src = b"Name,Day/Hours,Address/Location,URL,Tags,Comments\nA,,,,,\n".to_vec();
        src.extend_from_slice(b"B\xff,,,,,\n");
        src.extend_from_slice(b"C,,,,,\n");
        let parsed = parse(Cursor::new(src), &LoadOptions::default()).unwrap();
        let names: Vec<_> = parsed.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert!(matches!(
            parsed.diagnostics[0],
            Diagnostic::UnreadableRow { line: 3, .. }
        ));
        assert!(parsed.diagnostics[0].skipped_row());
        assert_eq!(parsed.rows_read, 3);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let opts = LoadOptions { delimiter: b';' };
        let parsed = parse(Cursor::new("Name;Tags\nMadison;WIC\n"), &opts).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.records[0].has_tag("wic"));
    }
}
