//! Rename pipeline handler

use anyhow::{Context, Result};
use colored::*;

use super::{print_event, print_summary};
use crate::cli::RenameArgs;
use crate::roster;
use crate::services::matching;

/// Rename every agreement PDF in the folder to its roster-derived name.
pub fn handle_rename_command(args: RenameArgs) -> Result<()> {
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

    let roster_path = args.folder.join(&args.roster);
    let mapping = roster::load_contract_mapping(&roster_path)
        .with_context(|| format!("failed to load roster {}", roster_path.display()))?;
    println!(
        "Loaded {} contract rows from {}",
        mapping.len().to_string().cyan(),
        roster_path.display()
    );

    let files = matching::scan_documents(&args.folder)
        .with_context(|| format!("failed to scan {}", args.folder.display()))?;
    if files.is_empty() {
        println!("No PDF documents found in {}", args.folder.display());
        return Ok(());
    }
    println!("Processing {} PDF documents", files.len().to_string().cyan());
    println!();

    let stats = matching::run_rename(&files, &mapping, &mut print_event);
    print_summary(&stats);

    Ok(())
}
