use anyhow::Result;
use cvr_lib::{CompanyMatch, ExportedFile, KeyIndividuals, Owner, Ownership, PossibleOwnership};
use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Parses the `--output` flag. Unknown values fall back to a table.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "md" | "markdown" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct MatchRow {
    #[tabled(rename = "CVR")]
    #[serde(rename = "CVR")]
    cvr_number: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Tabled, Serialize)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
pub struct PersonRow {
    #[tabled(rename = "Role")]
    #[serde(rename = "Role")]
    role: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    #[serde(rename = "Address")]
    address: String,
}

#[derive(Tabled, Serialize)]
pub struct OwnerRow {
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    owner_type: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    #[serde(rename = "Address")]
    address: String,
    #[tabled(rename = "Ownership")]
    #[serde(rename = "Ownership")]
    ownership: String,
    #[tabled(rename = "Voting")]
    #[serde(rename = "Voting")]
    voting: String,
    #[tabled(rename = "From")]
    #[serde(rename = "From")]
    valid_from: String,
    #[tabled(rename = "To")]
    #[serde(rename = "To")]
    valid_to: String,
}

#[derive(Tabled, Serialize)]
pub struct PossibleOwnerRow {
    #[tabled(rename = "Kind")]
    #[serde(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
}

// -- Row builders --

pub fn build_match_rows(matches: &[CompanyMatch]) -> Vec<MatchRow> {
    matches
        .iter()
        .map(|m| MatchRow {
            cvr_number: m.cvr_number,
            name: m.name.clone(),
        })
        .collect()
}

/// One row per top-level field of a record. Lists of people or owners are
/// collapsed to their names.
pub fn build_field_rows<T: Serialize>(record: &T) -> Vec<FieldRow> {
    let Ok(Value::Object(fields)) = serde_json::to_value(record) else {
        return Vec::new();
    };
    fields
        .into_iter()
        .map(|(field, value)| FieldRow {
            field,
            value: render_field(&value),
        })
        .collect()
}

fn render_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item.get("name") {
                Some(name) => render_field(name),
                None => render_field(item),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

pub fn build_person_rows(people: &KeyIndividuals) -> Vec<PersonRow> {
    let roles = &people.roles;
    [
        ("Management", &roles.management),
        ("Board", &roles.board_of_directors),
        ("Founder", &roles.founders),
        ("Fully liable", &roles.fully_liable_partners),
    ]
    .into_iter()
    .flat_map(|(role, bucket)| {
        bucket.iter().map(move |p| PersonRow {
            role: role.to_string(),
            name: p.name.clone(),
            address: p.address.clone(),
        })
    })
    .collect()
}

pub fn build_owner_rows(ownership: &Ownership) -> Vec<OwnerRow> {
    let owners = &ownership.owners;
    owners
        .legal_owners
        .iter()
        .chain(&owners.beneficial_owners)
        .chain(&owners.terminated_owners)
        .map(owner_row)
        .collect()
}

fn owner_row(owner: &Owner) -> OwnerRow {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    OwnerRow {
        owner_type: owner.owner_type.to_string(),
        name: owner.name.clone(),
        address: owner.address.clone(),
        ownership: owner
            .ownership_percentage
            .as_deref()
            .map(format_share)
            .unwrap_or_else(|| "-".to_string()),
        voting: owner
            .voting_percentage
            .as_deref()
            .map(format_share)
            .unwrap_or_else(|| "-".to_string()),
        valid_from: or_dash(&owner.valid_from),
        valid_to: or_dash(&owner.valid_to),
    }
}

pub fn build_possible_owner_rows(owners: &PossibleOwnership) -> Vec<PossibleOwnerRow> {
    let legal = owners.owners.possible_legal_owners.iter().map(|n| ("Legal", n));
    let beneficial = owners
        .owners
        .possible_beneficial_owners
        .iter()
        .map(|n| ("Beneficial", n));
    legal
        .chain(beneficial)
        .map(|(kind, name)| PossibleOwnerRow {
            kind: kind.to_string(),
            name: name.clone(),
        })
        .collect()
}

pub fn build_export_rows(file: &ExportedFile) -> Vec<FieldRow> {
    vec![
        FieldRow {
            field: "file_name".to_string(),
            value: file.file_name.clone(),
        },
        FieldRow {
            field: "file_path".to_string(),
            value: file.file_path.display().to_string(),
        },
    ]
}

/// Renders a registered share fraction (`"0.6"`) as a percentage (`"60%"`).
/// Values that are not numbers are shown as registered.
fn format_share(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(fraction) if (0.0..=1.0).contains(&fraction) => {
            let pct = fraction * 100.0;
            if (pct - pct.round()).abs() < 1e-9 {
                format!("{:.0}%", pct)
            } else {
                format!("{:.2}%", pct)
            }
        }
        _ => raw.to_string(),
    }
}

// -- Generic printers --

pub fn print_table<R: Tabled>(rows: Vec<R>) {
    println!("{}", Table::new(rows));
}

pub fn print_markdown<R: Tabled>(rows: Vec<R>) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_csv<R: Serialize>(rows: Vec<R>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Prints rows in a non-JSON format.
pub fn print_rows<R: Tabled + Serialize>(rows: Vec<R>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Markdown => print_markdown(rows),
        OutputFormat::Csv => print_csv(rows)?,
        OutputFormat::Table | OutputFormat::Json => print_table(rows),
    }
    Ok(())
}
