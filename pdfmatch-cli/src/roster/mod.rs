//! Roster domain types and join-key rules
//!
//! A roster is the spreadsheet listing employees: contract number, name and
//! resident ID number columns located by header substring. Everything that
//! decides whether two keys are "the same" lives here.

use std::collections::HashMap;
use std::path::PathBuf;

use calamine::Data;

pub mod reader;
pub mod writer;

pub use reader::{employee_name_set, id_number_set, load_contract_mapping, load_keyed_table};
pub use writer::{AnnotatedSave, write_annotated};

/// Substring markers used to locate roster columns by header text.
pub const CONTRACT_MARKERS: &[&str] = &["合同编号"];
pub const NAME_MARKERS: &[&str] = &["姓名"];
pub const ID_NUMBER_MARKERS: &[&str] = &["身份证号", "身份证"];

/// One roster row's payload for the rename pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub id_number: String,
}

/// A resolved column: position plus the header text that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    pub header: String,
}

/// First worksheet of a roster file: header row plus raw data rows, the
/// cells kept verbatim so a write-back loses nothing.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl Table {
    /// Text of one cell; empty string when the row is short.
    pub fn text(&self, row: usize, col: usize) -> String {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(cell_text)
            .unwrap_or_default()
    }
}

/// Error from roster loading.
#[derive(Debug)]
pub enum RosterError {
    NotFound(PathBuf),
    MissingColumn {
        marker: &'static str,
        headers: Vec<String>,
    },
    Unreadable {
        path: PathBuf,
        source: calamine::Error,
    },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::NotFound(path) => {
                write!(f, "roster file not found: {}", path.display())
            }
            RosterError::MissingColumn { marker, headers } => {
                if headers.is_empty() {
                    write!(f, "no column containing '{}' (roster has no columns)", marker)
                } else {
                    write!(
                        f,
                        "no column containing '{}' (available columns: {})",
                        marker,
                        headers.join(", ")
                    )
                }
            }
            RosterError::Unreadable { path, source } => {
                write!(
                    f,
                    "unable to read {} as xls or xlsx: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Contract mapping for the rename run.
pub type ContractMapping = HashMap<String, RosterEntry>;

/// A key cell counts as missing when it is empty after trimming or reads as
/// the literal "nan" some exporters leave behind for blank cells.
pub fn is_blank_key(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "nan"
}

/// Canonical text of a numeric join key. A key that went through a float
/// representation somewhere ("100000123.0") is truncated back to its
/// integer digits; text that does not parse as a finite in-range number is
/// passed through untouched.
pub fn canonical_numeric_key(raw: &str) -> String {
    if !raw.contains('.') {
        return raw.to_string();
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= i64::MIN as f64 && v <= i64::MAX as f64 => {
            (v.trunc() as i64).to_string()
        }
        _ => raw.to_string(),
    }
}

/// Text form of a cell. Whole floats render as plain integers so numeric
/// keys survive the float round trip intact.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}
