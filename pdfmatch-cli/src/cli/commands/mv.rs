//! Move pipeline handler

use anyhow::{Context, Result};
use colored::*;
use std::fs;

use super::{annotate_roster, print_event, print_summary};
use crate::cli::MoveArgs;
use crate::roster;
use crate::services::matching;

/// Move every commitment letter whose employee name appears in the roster
/// into the output folder, then annotate a copy of the roster.
pub fn handle_move_command(args: MoveArgs) -> Result<()> {
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

    let (table, column) = roster::load_keyed_table(&args.roster, roster::NAME_MARKERS)
        .with_context(|| format!("failed to load roster {}", args.roster.display()))?;
    let names = roster::employee_name_set(&table, column.index);
    println!(
        "Loaded {} employee names from {} (column: {})",
        names.len().to_string().cyan(),
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

    // The snapshot is captured before the moves, so the second pass still
    // sees every file the run relocated
    let stats = matching::run_move(&files, &output_dir, &names, &mut print_event);
    print_summary(&stats);

    let found = matching::extractable_employee_names(&files);
    let marks = matching::mark_rows_by_name(&table, column.index, &found);
    annotate_roster(&table, &marks, &args.roster);

    println!();
    println!(
        "Matched documents in {}",
        output_dir.display().to_string().cyan()
    );

    Ok(())
}
