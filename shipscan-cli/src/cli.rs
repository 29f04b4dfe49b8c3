//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Shipscan -- shipment registration and barcode reconciliation tool.
///
/// Use `shipscan <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "shipscan", version, about, long_about = None)]
pub struct Cli {
    /// Path to the shipscan.toml configuration file.
    #[arg(short, long, default_value = "shipscan.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a barcode/QR image and reconcile it against the store.
    Scan(ScanArgs),

    /// Register a single shipment.
    Add(AddArgs),

    /// List stored shipments, optionally filtered by creation day.
    List(ListArgs),

    /// Bulk-import shipments from a CSV file.
    Import(ImportArgs),

    /// Export shipments to CSV.
    Export(ExportArgs),

    /// Delete a shipment by track code.
    Delete(DeleteArgs),

    /// Update arrival/issuance flags of a shipment.
    Status(StatusArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Run the reconciliation flow on one image.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image file containing one or more barcodes/QR codes (PNG, JPEG, HEIC).
    pub image: PathBuf,

    /// Arrival flag to apply on confirmation (defaults to the stored value).
    #[arg(long)]
    pub arrived: Option<bool>,

    /// Issuance flag to apply on confirmation (defaults to the stored value).
    #[arg(long)]
    pub issued: Option<bool>,

    /// Apply updates without asking for confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

// ---- add ----

/// Register a single shipment.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Track code (whitespace is stripped).
    pub track_code: String,

    /// Client code (whitespace is stripped).
    pub client_code: String,

    /// Free-form description.
    #[arg(short, long, default_value = "")]
    pub description: String,
}

// ---- list ----

/// List stored shipments.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Restrict to shipments created on this local calendar day (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

// ---- import ----

/// Bulk-import shipments from a CSV file.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file with track_code and client_code columns (description optional).
    pub file: PathBuf,
}

// ---- export ----

/// Export shipments to CSV.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: stdout).
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Restrict to shipments created on this local calendar day (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

// ---- delete ----

/// Delete a shipment by track code.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Track code of the record to delete.
    pub track_code: String,
}

// ---- status ----

/// Update arrival/issuance flags of a shipment.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Track code of the record to update.
    pub track_code: String,

    /// New arrival flag (unchanged if omitted).
    #[arg(long)]
    pub arrived: Option<bool>,

    /// New issuance flag (unchanged if omitted).
    #[arg(long)]
    pub issued: Option<bool>,
}

// ---- config ----

/// Manage shipscan configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, store, decoder).
        #[arg(long)]
        section: Option<String>,
    },
}
