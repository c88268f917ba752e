// src/store/diagnostics.rs

use serde::Serialize;
use std::fmt;

/// A row-level problem recovered from during load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Field count differs from the header; the row was skipped.
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    /// `Name` cell is blank; the row was skipped.
    MissingName { line: u64 },
    /// Row repeats the header's `Name` label; the row was skipped.
    RepeatedHeader { line: u64 },
    /// Name seen earlier in the same load. The row was kept.
    DuplicateName { line: u64, first_line: u64, name: String },
    /// Row could not be decoded (e.g. invalid UTF-8); the row was skipped.
    UnreadableRow { line: u64, message: String },
}

impl Diagnostic {
    pub fn line(&self) -> u64 {
        match self {
            Diagnostic::MalformedRow { line, .. }
            | Diagnostic::MissingName { line }
            | Diagnostic::RepeatedHeader { line }
            | Diagnostic::DuplicateName { line, .. }
            | Diagnostic::UnreadableRow { line, .. } => *line,
        }
    }

    /// Whether the row this diagnostic refers to was dropped from the store.
    pub fn skipped_row(&self) -> bool {
        !matches!(self, Diagnostic::DuplicateName { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected {} fields, found {}; row skipped",
                line, expected, found
            ),
            Diagnostic::MissingName { line } => {
                write!(f, "line {}: blank Name; row skipped", line)
            }
            Diagnostic::RepeatedHeader { line } => {
                write!(f, "line {}: repeated header row; row skipped", line)
            }
            Diagnostic::DuplicateName {
                line,
                first_line,
                name,
            } => write!(
                f,
                "line {}: duplicate name {:?} (first on line {})",
                line, name, first_line
            ),
            Diagnostic::UnreadableRow { line, message } => {
                write!(f, "line {}: unreadable row ({}); row skipped", line, message)
            }
        }
    }
}
