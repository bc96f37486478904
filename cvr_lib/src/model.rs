//! Flat output shapes produced from one registry document.
//!
//! Scalar fields use `"N/A"` when the registry has no value, so every shape
//! serializes with the same set of keys regardless of source completeness.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use cvr_api::types::CvrNumber;

/// A company name and CVR number returned by a name search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMatch {
    pub name: String,
    pub cvr_number: CvrNumber,
}

/// Registration, address, industry and contact data of a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    pub cvr_number: String,
    pub name: String,
    pub address: String,
    pub company_type: String,
    pub status: String,
    pub founding_date: String,
    pub industry_code: String,
    pub industry_description: String,
    /// Most recent yearly head count as stored upstream, or `"N/A"`.
    pub employees: Value,
    /// `"Yes"` / `"No"` for advertising protection, `"N/A"` when not registered.
    pub advertising_protected: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

/// A person or company holding a management or founder role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPerson {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleBuckets {
    /// Executive management (`Direktion`).
    pub management: Vec<KeyPerson>,
    /// Board of directors (`Bestyrelse`).
    pub board_of_directors: Vec<KeyPerson>,
    pub founders: Vec<KeyPerson>,
    pub fully_liable_partners: Vec<KeyPerson>,
}

/// How an owner is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerType {
    /// Listed in the legal owners register.
    Legal,
    /// Listed in the beneficial owners register.
    Beneficial,
    /// The ownership share has an end date.
    Terminated,
}

impl std::fmt::Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OwnerType::Legal => "Legal",
                OwnerType::Beneficial => "Beneficial",
                OwnerType::Terminated => "Terminated",
            }
        )
    }
}

/// One owner-register entry with its ownership and voting shares.
///
/// Percentages are kept exactly as registered (CVR stores fractions, e.g. `"0.5"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub address: String,
    pub owner_type: OwnerType,
    pub ownership_percentage: Option<String>,
    pub voting_percentage: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipBuckets {
    pub legal_owners: Vec<Owner>,
    pub beneficial_owners: Vec<Owner>,
    pub terminated_owners: Vec<Owner>,
}

/// Name-only owner guesses. Carries no shares or dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PossibleOwners {
    pub possible_legal_owners: Vec<String>,
    pub possible_beneficial_owners: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleOwnership {
    pub cvr_number: String,
    pub name: String,
    #[serde(flatten)]
    pub owners: PossibleOwners,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyIndividuals {
    pub cvr_number: String,
    pub name: String,
    #[serde(flatten)]
    pub roles: RoleBuckets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    pub cvr_number: String,
    pub name: String,
    #[serde(flatten)]
    pub owners: OwnershipBuckets,
}

/// Everything the registry document offers, flattened into one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullDetail {
    #[serde(flatten)]
    pub general: GeneralInfo,
    /// First registered capital amount.
    pub registered_capital: Value,
    pub capital_currency: String,
    pub purpose: String,
    pub signing_rule: String,
    /// Comma-separated names of everyone related to the company.
    pub personnel_circle: String,
    #[serde(flatten)]
    pub roles: RoleBuckets,
    #[serde(flatten)]
    pub owners: OwnershipBuckets,
}
