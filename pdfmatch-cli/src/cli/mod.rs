//! Command-line interface definitions and parsing

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Roster the rename pipeline opens when `--roster` is not given.
pub const DEFAULT_RENAME_ROSTER: &str = "协商解除函签署名单-608人.xls";

/// Output folder name the copy and move pipelines create inside the
/// scanned folder when `--output-dir` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "匹配结果";

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pdfmatch-cli")]
#[command(about = "Batch-match and rename PDF documents against an Excel roster", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rename agreement PDFs in place to their roster name and ID number
    Rename(RenameArgs),

    /// Copy PDFs whose embedded ID number appears in the roster
    Copy(CopyArgs),

    /// Move commitment letters whose employee name appears in the roster
    Move(MoveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Folder holding the agreement PDFs
    pub folder: PathBuf,

    /// Roster file; a relative path is resolved inside FOLDER
    #[arg(long = "roster", value_name = "FILE", default_value = DEFAULT_RENAME_ROSTER)]
    pub roster: PathBuf,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    /// Folder holding the PDFs to screen
    pub folder: PathBuf,

    /// Roster file listing the wanted ID numbers
    pub roster: PathBuf,

    /// Output folder name, created inside FOLDER
    #[arg(long = "output-dir", value_name = "NAME", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    /// Folder holding the commitment letter PDFs
    pub folder: PathBuf,

    /// Roster file listing the wanted employee names
    pub roster: PathBuf,

    /// Output folder name, created inside FOLDER
    #[arg(long = "output-dir", value_name = "NAME", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
