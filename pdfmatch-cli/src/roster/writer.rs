//! Annotated roster write-back
//!
//! After a copy/move run the roster gets a per-row match status column. The
//! original file always survives as a backup next to the annotated output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::Data;
use rust_xlsxwriter::{Workbook, Worksheet};

use super::Table;

/// Header of the per-row match status column.
pub const STATUS_COLUMN: &str = "match status";
/// Cell values written into the status column.
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";

/// Where the annotated roster ended up and where the original went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSave {
    pub saved_to: PathBuf,
    pub backup: PathBuf,
}

/// Write `table` back with the status column filled in from `marks`: true
/// rows get "success", false rows "failure", `None` rows (no key) keep
/// whatever the status cell held before. A status column from an earlier
/// run is reused in place; otherwise one is appended after the last column.
///
/// The output is always xlsx. An `.xls` original is renamed to
/// `<stem>.xlsx.backup` and the annotated copy saved as `<stem>.xlsx`; any
/// other original is copied to `<stem>.backup` and overwritten in place.
pub fn write_annotated(
    table: &Table,
    marks: &[Option<bool>],
    source: &Path,
) -> Result<AnnotatedSave> {
    let existing_status_col = table
        .headers
        .iter()
        .position(|h| h.trim() == STATUS_COLUMN);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    let status_col = match existing_status_col {
        Some(col) => col,
        None => {
            let col = table.headers.len();
            worksheet.write_string(0, col as u16, STATUS_COLUMN)?;
            col
        }
    };

    for (row_idx, row) in table.rows.iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            if existing_status_col == Some(col) {
                continue; // rewritten from marks below
            }
            write_cell(worksheet, out_row, col as u16, cell)?;
        }
        match marks.get(row_idx).copied().flatten() {
            Some(true) => {
                worksheet.write_string(out_row, status_col as u16, STATUS_SUCCESS)?;
            }
            Some(false) => {
                worksheet.write_string(out_row, status_col as u16, STATUS_FAILURE)?;
            }
            None => {
                if let Some(col) = existing_status_col {
                    if let Some(cell) = row.get(col) {
                        write_cell(worksheet, out_row, status_col as u16, cell)?;
                    }
                }
            }
        }
    }

    let is_xls = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xls"))
        .unwrap_or(false);

    let (target, backup) = if is_xls {
        (
            source.with_extension("xlsx"),
            source.with_extension("xlsx.backup"),
        )
    } else {
        (source.to_path_buf(), source.with_extension("backup"))
    };

    if backup.exists() {
        fs::remove_file(&backup)
            .with_context(|| format!("Failed to remove stale backup: {}", backup.display()))?;
    }
    if is_xls {
        // The original keeps its bytes under the backup name; the annotated
        // workbook becomes the new .xlsx next to it.
        fs::rename(source, &backup)
            .with_context(|| format!("Failed to move original to {}", backup.display()))?;
    } else {
        fs::copy(source, &backup)
            .with_context(|| format!("Failed to back up roster to {}", backup.display()))?;
    }
    log::debug!("roster backup at {}", backup.display());

    workbook
        .save(&target)
        .with_context(|| format!("Failed to save annotated roster: {}", target.display()))?;

    Ok(AnnotatedSave {
        saved_to: target,
        backup,
    })
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &Data) -> Result<()> {
    match cell {
        Data::Empty | Data::Error(_) => { /* leave cell empty */ }
        Data::String(s) => {
            ws.write_string(row, col, s)?;
        }
        Data::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Data::Float(f) => {
            ws.write_number(row, col, *f)?;
        }
        Data::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        Data::DateTime(dt) => {
            ws.write_number(row, col, dt.as_f64())?;
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => {
            ws.write_string(row, col, s)?;
        }
    }
    Ok(())
}
