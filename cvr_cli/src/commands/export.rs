use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use cvr_lib::{validation, CommandTrigger, DocumentExporter, Settings};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{build_export_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct ExportArgs {
    /// CVR number (8 digits)
    #[arg(long)]
    pub cvr: String,

    /// Override CVR_EXPORT_TIMEOUT_SECS for this run
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

pub async fn run(args: &ExportArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let cvr = validation::validate_cvr_number(&args.cvr)?;

    let mut export = settings.export.clone();
    if let Some(secs) = args.timeout_secs {
        export.timeout = Duration::from_secs(secs);
    }
    let Some(command) = export.command.as_deref() else {
        bail!("CVR_EXPORT_COMMAND is not set; configure the command that drives the browser session");
    };
    let trigger = CommandTrigger::from_command_line(command)?;

    tokio::fs::create_dir_all(&export.download_dir)
        .await
        .with_context(|| format!("create download directory {}", export.download_dir.display()))?;

    let exporter = DocumentExporter::new(trigger, export);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!(
        "waiting for {}* in {}",
        exporter.expected_prefix(cvr),
        exporter.settings().download_dir.display()
    ));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = exporter.export_document(cvr).await;
    pb.finish_and_clear();
    let file = result?;

    match format {
        OutputFormat::Json => print_json(&file),
        _ => print_rows(build_export_rows(&file), format)?,
    }
    Ok(())
}
