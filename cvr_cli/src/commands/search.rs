use anyhow::Result;
use clap::Args;
use cvr_lib::{validation, CvrService, Settings};

use crate::output::{build_match_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// Beginning of the company name
    #[arg(long)]
    pub prefix: String,

    /// Maximum number of results (1-100)
    #[arg(long, default_value = "10")]
    pub size: i64,
}

pub async fn run(args: &SearchArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let prefix = validation::validate_search(&args.prefix)?;
    let size = validation::validate_size(args.size)?;

    let service = CvrService::new(settings.client()).with_search_size(size);
    let matches = service.search_by_partial_name(&prefix).await?;

    eprintln!("{} companies matching '{}'", matches.len(), prefix);

    match format {
        OutputFormat::Json => print_json(&matches),
        _ => print_rows(build_match_rows(&matches), format)?,
    }
    Ok(())
}
