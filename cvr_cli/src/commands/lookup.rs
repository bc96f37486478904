use anyhow::Result;
use clap::Args;
use cvr_lib::{validation, CvrService, Settings};

use crate::output::{build_match_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct LookupArgs {
    /// Company name to resolve to a CVR number
    #[arg(long)]
    pub name: String,
}

pub async fn run(args: &LookupArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let name = validation::validate_search(&args.name)?;
    let service = CvrService::new(settings.client());
    let found = service.lookup_by_name(&name).await?;
    match format {
        OutputFormat::Json => print_json(&found),
        _ => print_rows(build_match_rows(std::slice::from_ref(&found)), format)?,
    }
    Ok(())
}
