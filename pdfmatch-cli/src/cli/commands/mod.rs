//! Command handlers and their shared console rendering

pub mod copy;
pub mod mv;
pub mod rename;

use colored::*;
use std::path::Path;

use crate::roster::{self, Table};
use crate::services::matching::{DocumentEvent, Outcome, RowMarks, RunStats};

/// Render one document event as a progress line.
fn print_event(event: &DocumentEvent) {
    match &event.outcome {
        Outcome::Renamed { new_name } => {
            println!("  {} {} -> {}", "renamed".green(), event.file_name, new_name);
        }
        Outcome::Copied { dest_name } => {
            println!("  {} {} -> {}", "copied".green(), event.file_name, dest_name);
        }
        Outcome::Moved { dest_name } => {
            println!("  {} {} -> {}", "moved".green(), event.file_name, dest_name);
        }
        Outcome::NoPattern => {
            println!(
                "  {}",
                format!("skipped {} (no recognizable pattern)", event.file_name).dimmed()
            );
        }
        Outcome::KeyNotFound { key } => {
            println!(
                "  {} {} ({} not in roster)",
                "unmatched".yellow(),
                event.file_name,
                key
            );
        }
        Outcome::EmptyField { key, field } => {
            println!(
                "  {} {} (row {} has no {})",
                "unmatched".yellow(),
                event.file_name,
                key,
                field.label()
            );
        }
        Outcome::CollisionSkipped { new_name } => {
            println!(
                "  {} {} ({} already exists)",
                "unmatched".yellow(),
                event.file_name,
                new_name
            );
        }
        Outcome::Failed { message } => {
            println!("  {} {}: {}", "error".red(), event.file_name, message);
        }
    }
}

/// Render the final tally block.
fn print_summary(stats: &RunStats) {
    println!();
    println!("{}", "Results".bold());
    println!("  {:<10} {}", "total", stats.total());
    println!("  {:<10} {}", "matched", stats.matched.to_string().green());
    println!(
        "  {:<10} {}",
        "unmatched",
        stats.unmatched.to_string().yellow()
    );
    println!("  {:<10} {}", "skipped", stats.skipped);
    if stats.errors > 0 {
        println!("  {:<10} {}", "errors", stats.errors.to_string().red());
    }
}

/// Write the per-row verdicts back into a copy of the roster. A failure
/// here only produces a warning; the run itself already finished.
fn annotate_roster(table: &Table, marks: &RowMarks, source: &Path) {
    match roster::write_annotated(table, &marks.statuses, source) {
        Ok(save) => {
            println!();
            println!(
                "Roster annotated: {}",
                save.saved_to.display().to_string().cyan()
            );
            println!(
                "Original kept at: {}",
                save.backup.display().to_string().cyan()
            );
            println!("  {:<10} {}", "success", marks.success.to_string().green());
            println!("  {:<10} {}", "failure", marks.failure.to_string().yellow());
        }
        Err(err) => {
            println!();
            println!(
                "{} could not annotate roster: {:#}",
                "warning:".yellow().bold(),
                err
            );
        }
    }
}
