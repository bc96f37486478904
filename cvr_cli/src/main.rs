mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cvr_lib::Settings;

use crate::commands::company::View;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "cvr")]
#[command(about = "Look up Danish companies in the CVR registry")]
struct Cli {
    /// Output format: table, json, csv, or md
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a company name to its CVR number
    Lookup(commands::lookup::LookupArgs),
    /// List companies whose name starts with a prefix
    Search(commands::search::SearchArgs),
    /// General registration, address and contact data
    Info(commands::company::CompanyArgs),
    /// Owners guessed from participant names
    PossibleOwners(commands::company::CompanyArgs),
    /// Management, board, founders and fully liable partners
    KeyIndividuals(commands::company::CompanyArgs),
    /// Registered legal, beneficial and former owners
    Ownership(commands::company::CompanyArgs),
    /// Everything above in one record
    Detail(commands::company::CompanyArgs),
    /// Download the registry printout through the browser session
    Export(commands::export::ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("cvr=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);
    let settings = Settings::from_env()?;

    match &cli.command {
        Commands::Lookup(args) => commands::lookup::run(args, &settings, &format).await?,
        Commands::Search(args) => commands::search::run(args, &settings, &format).await?,
        Commands::Info(args) => commands::company::run(View::Info, args, &settings, &format).await?,
        Commands::PossibleOwners(args) => {
            commands::company::run(View::PossibleOwners, args, &settings, &format).await?
        }
        Commands::KeyIndividuals(args) => {
            commands::company::run(View::KeyIndividuals, args, &settings, &format).await?
        }
        Commands::Ownership(args) => {
            commands::company::run(View::Ownership, args, &settings, &format).await?
        }
        Commands::Detail(args) => {
            commands::company::run(View::Detail, args, &settings, &format).await?
        }
        Commands::Export(args) => commands::export::run(args, &settings, &format).await?,
    }

    Ok(())
}
