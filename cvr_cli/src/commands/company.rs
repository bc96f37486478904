//! Subcommands that project one company looked up by CVR number.

use anyhow::Result;
use clap::Args;
use cvr_lib::{validation, CvrService, Settings};

use crate::output::{
    build_field_rows, build_owner_rows, build_person_rows, build_possible_owner_rows,
    print_json, print_markdown, print_rows, print_table, OutputFormat,
};

#[derive(Args)]
pub struct CompanyArgs {
    /// CVR number (8 digits)
    #[arg(long)]
    pub cvr: String,
}

/// Which projection of the company to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Info,
    PossibleOwners,
    KeyIndividuals,
    Ownership,
    Detail,
}

pub async fn run(
    view: View,
    args: &CompanyArgs,
    settings: &Settings,
    format: &OutputFormat,
) -> Result<()> {
    let cvr = validation::validate_cvr_number(&args.cvr)?;
    let service = CvrService::new(settings.client());

    match view {
        View::Info => {
            let info = service.get_general_info(cvr).await?;
            match format {
                OutputFormat::Json => print_json(&info),
                _ => print_rows(build_field_rows(&info), format)?,
            }
        }
        View::PossibleOwners => {
            let owners = service.get_possible_ownership(cvr).await?;
            eprintln!("{} ({})", owners.name, owners.cvr_number);
            match format {
                OutputFormat::Json => print_json(&owners),
                _ => print_rows(build_possible_owner_rows(&owners), format)?,
            }
        }
        View::KeyIndividuals => {
            let people = service.get_key_individuals(cvr).await?;
            eprintln!("{} ({})", people.name, people.cvr_number);
            match format {
                OutputFormat::Json => print_json(&people),
                _ => print_rows(build_person_rows(&people), format)?,
            }
        }
        View::Ownership => {
            let ownership = service.get_ownership(cvr).await?;
            eprintln!("{} ({})", ownership.name, ownership.cvr_number);
            match format {
                OutputFormat::Json => print_json(&ownership),
                _ => print_rows(build_owner_rows(&ownership), format)?,
            }
        }
        View::Detail => {
            let detail = service.get_full_detail(cvr).await?;
            let people = cvr_lib::KeyIndividuals {
                cvr_number: detail.general.cvr_number.clone(),
                name: detail.general.name.clone(),
                roles: detail.roles.clone(),
            };
            let ownership = cvr_lib::Ownership {
                cvr_number: detail.general.cvr_number.clone(),
                name: detail.general.name.clone(),
                owners: detail.owners.clone(),
            };
            match format {
                OutputFormat::Json => print_json(&detail),
                OutputFormat::Csv => print_rows(build_field_rows(&detail), format)?,
                OutputFormat::Table => {
                    print_table(build_field_rows(&detail));
                    print_table(build_person_rows(&people));
                    print_table(build_owner_rows(&ownership));
                }
                OutputFormat::Markdown => {
                    print_markdown(build_field_rows(&detail));
                    println!();
                    print_markdown(build_person_rows(&people));
                    println!();
                    print_markdown(build_owner_rows(&ownership));
                }
            }
        }
    }
    Ok(())
}
