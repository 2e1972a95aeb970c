//! Copy pipeline handler

use anyhow::{Context, Result};
use colored::*;
use std::fs;

use super::{annotate_roster, print_event, print_summary};
use crate::cli::CopyArgs;
use crate::roster;
use crate::services::matching;

/// Copy every PDF whose embedded ID number appears in the roster into the
/// output folder, then annotate a copy of the roster with per-row results.
pub fn handle_copy_command(args: CopyArgs) -> Result<()> {
    // Handle --no-color flag
    if args.no_color {
        colored::control::set_override(false);
    }

    // Validate arguments
    if !args.folder.exists() {
        anyhow::bail!("folder does not exist: {}", args.folder.display());
    }
    if !args.folder.is_dir() {
        anyhow::bail!("not a directory: {}", args.folder.display());
    }

    let (table, column) = roster::load_keyed_table(&args.roster, roster::ID_NUMBER_MARKERS)
        .with_context(|| format!("failed to load roster {}", args.roster.display()))?;
    let id_numbers = roster::id_number_set(&table, column.index);
    println!(
        "Loaded {} ID numbers from {} (column: {})",
        id_numbers.len().to_string().cyan(),
        args.roster.display(),
        column.header
    );

    let files = matching::scan_documents(&args.folder)
        .with_context(|| format!("failed to scan {}", args.folder.display()))?;
    if files.is_empty() {
        println!("No PDF documents found in {}", args.folder.display());
        return Ok(());
    }

    let output_dir = args.folder.join(&args.output_dir);
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output folder {}", output_dir.display()))?;
    println!("Processing {} PDF documents", files.len().to_string().cyan());
    println!();

    let stats = matching::run_copy(&files, &output_dir, &id_numbers, &mut print_event);
    print_summary(&stats);

    let found = matching::extractable_id_numbers(&files);
    let marks = matching::mark_rows_by_id(&table, column.index, &found);
    annotate_roster(&table, &marks, &args.roster);

    println!();
    println!(
        "Matched documents in {}",
        output_dir.display().to_string().cyan()
    );

    Ok(())
}
