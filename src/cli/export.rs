//! CLI command for grid export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_grid_csv, export_grid_json, export_grid_yaml, GridExport};
use crate::services::{EditSession, SessionContext};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV, amounts as decimals
    Csv,
    /// JSON, amounts in minor units
    Json,
    /// YAML, amounts in minor units
    Yaml,
}

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file path; standard output when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    context: SessionContext,
    args: ExportArgs,
) -> BudgetResult<()> {
    let session = EditSession::open(storage, context)?;
    let export = GridExport::new(session.context(), session.tree());

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(&export, args.format, args.pretty, &mut writer)?;
            writer
                .flush()
                .map_err(|e| BudgetError::Export(e.to_string()))?;
            eprintln!(
                "Exported {} rows of '{}' {} to: {}",
                export.rows.len(),
                export.budget,
                export.year,
                path.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            write_export(&export, args.format, args.pretty, &mut writer)?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    export: &GridExport,
    format: ExportFormat,
    pretty: bool,
    writer: &mut W,
) -> BudgetResult<()> {
    match format {
        ExportFormat::Csv => export_grid_csv(export, writer),
        ExportFormat::Json => export_grid_json(export, writer, pretty),
        ExportFormat::Yaml => export_grid_yaml(export, writer),
    }
}
