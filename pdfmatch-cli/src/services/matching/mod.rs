// Matching service for the three document pipelines
//
// This service holds the run orchestration: try a filename grammar,
// consult the roster, perform the terminal filesystem action, and report
// every document as data. Rendering is the CLI's job; tests collect the
// emitted events instead.

pub mod core;
pub mod models;

// Re-export commonly used types
pub use self::core::scan_documents;
pub use models::{DocumentEvent, Outcome, PayloadField, RunStats};

use crate::filename;
use crate::roster::{ContractMapping, Table, canonical_numeric_key, is_blank_key};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Rename every agreement document in the snapshot to its roster-derived
/// name, in place.
pub fn run_rename(
    files: &[PathBuf],
    mapping: &ContractMapping,
    observer: &mut dyn FnMut(&DocumentEvent),
) -> RunStats {
    let stats = run(files, observer, |path, file_name| {
        rename_document(path, file_name, mapping)
    });
    log::debug!("rename run over {} documents: {:?}", files.len(), stats);
    stats
}

/// Copy every document whose embedded ID number appears in the roster into
/// the output folder.
pub fn run_copy(
    files: &[PathBuf],
    output_dir: &Path,
    id_numbers: &HashSet<String>,
    observer: &mut dyn FnMut(&DocumentEvent),
) -> RunStats {
    let stats = run(files, observer, |path, file_name| {
        copy_document(path, file_name, output_dir, id_numbers)
    });
    log::debug!("copy run over {} documents: {:?}", files.len(), stats);
    stats
}

/// Move every commitment letter whose employee name appears in the roster
/// into the output folder.
pub fn run_move(
    files: &[PathBuf],
    output_dir: &Path,
    names: &HashSet<String>,
    observer: &mut dyn FnMut(&DocumentEvent),
) -> RunStats {
    let stats = run(files, observer, |path, file_name| {
        move_document(path, file_name, output_dir, names)
    });
    log::debug!("move run over {} documents: {:?}", files.len(), stats);
    stats
}

fn run<F>(files: &[PathBuf], observer: &mut dyn FnMut(&DocumentEvent), mut action: F) -> RunStats
where
    F: FnMut(&Path, &str) -> Outcome,
{
    let mut stats = RunStats::default();
    for path in files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let outcome = action(path, &file_name);
        stats.record(&outcome);
        observer(&DocumentEvent { file_name, outcome });
    }
    stats
}

fn rename_document(path: &Path, file_name: &str, mapping: &ContractMapping) -> Outcome {
    let Some(key) = filename::extract_contract_number(file_name) else {
        return Outcome::NoPattern;
    };
    let Some(entry) = mapping.get(&key) else {
        return Outcome::KeyNotFound { key };
    };
    if is_blank_key(&entry.name) {
        return Outcome::EmptyField {
            key,
            field: PayloadField::Name,
        };
    }
    if is_blank_key(&entry.id_number) {
        return Outcome::EmptyField {
            key,
            field: PayloadField::IdNumber,
        };
    }
    let new_name = format!(
        "{}{}{}.pdf",
        filename::AGREEMENT_PREFIX,
        entry.name,
        entry.id_number
    );
    // A document already carrying its target name counts as renamed
    if new_name == file_name {
        return Outcome::Renamed { new_name };
    }
    let dest = path.with_file_name(&new_name);
    if dest.exists() {
        return Outcome::CollisionSkipped { new_name };
    }
    match fs::rename(path, &dest) {
        Ok(()) => Outcome::Renamed { new_name },
        Err(err) => Outcome::Failed {
            message: format!("rename to {}: {}", new_name, err),
        },
    }
}

fn copy_document(
    path: &Path,
    file_name: &str,
    output_dir: &Path,
    id_numbers: &HashSet<String>,
) -> Outcome {
    let Some((_, id_number)) = filename::extract_name_and_id(file_name) else {
        return Outcome::NoPattern;
    };
    if !id_numbers.contains(&id_number) {
        return Outcome::KeyNotFound { key: id_number };
    }
    let dest_name = core::collision_free_name(output_dir, file_name);
    match fs::copy(path, output_dir.join(&dest_name)) {
        Ok(_) => Outcome::Copied { dest_name },
        Err(err) => Outcome::Failed {
            message: format!("copy to {}: {}", dest_name, err),
        },
    }
}

fn move_document(
    path: &Path,
    file_name: &str,
    output_dir: &Path,
    names: &HashSet<String>,
) -> Outcome {
    let Some(name) = filename::extract_employee_name(file_name) else {
        return Outcome::NoPattern;
    };
    if !names.contains(&name) {
        return Outcome::KeyNotFound { key: name };
    }
    let dest_name = core::collision_free_name(output_dir, file_name);
    match core::move_file(path, &output_dir.join(&dest_name)) {
        Ok(()) => Outcome::Moved { dest_name },
        Err(err) => Outcome::Failed {
            message: format!("move to {}: {}", dest_name, err),
        },
    }
}

/// ID numbers extractable from the scan snapshot. Pure path math over the
/// captured list, so documents a run already moved away still count.
pub fn extractable_id_numbers(files: &[PathBuf]) -> HashSet<String> {
    files
        .iter()
        .filter_map(|path| path.file_name())
        .filter_map(|name| filename::extract_name_and_id(&name.to_string_lossy()))
        .map(|(_, id_number)| id_number)
        .collect()
}

/// Employee names extractable from the scan snapshot.
pub fn extractable_employee_names(files: &[PathBuf]) -> HashSet<String> {
    files
        .iter()
        .filter_map(|path| path.file_name())
        .filter_map(|name| filename::extract_employee_name(&name.to_string_lossy()))
        .collect()
}

/// Per-row verdicts for the roster annotation. `statuses` lines up with the
/// table's data rows; `None` marks a row whose key cell is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMarks {
    pub statuses: Vec<Option<bool>>,
    pub success: usize,
    pub failure: usize,
}

/// Mark every roster row by whether its ID number shows up in `found`.
pub fn mark_rows_by_id(table: &Table, column: usize, found: &HashSet<String>) -> RowMarks {
    mark_rows(table, column, |key| {
        found.contains(&canonical_numeric_key(key).to_uppercase())
    })
}

/// Mark every roster row by whether its employee name shows up in `found`.
pub fn mark_rows_by_name(table: &Table, column: usize, found: &HashSet<String>) -> RowMarks {
    mark_rows(table, column, |key| found.contains(key))
}

fn mark_rows<F>(table: &Table, column: usize, is_found: F) -> RowMarks
where
    F: Fn(&str) -> bool,
{
    let mut marks = RowMarks {
        statuses: Vec::with_capacity(table.rows.len()),
        success: 0,
        failure: 0,
    };
    for row in 0..table.rows.len() {
        let raw = table.text(row, column);
        let key = raw.trim();
        if is_blank_key(key) {
            marks.statuses.push(None);
        } else if is_found(key) {
            marks.statuses.push(Some(true));
            marks.success += 1;
        } else {
            marks.statuses.push(Some(false));
            marks.failure += 1;
        }
    }
    marks
}
