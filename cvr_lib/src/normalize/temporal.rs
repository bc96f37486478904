//! Resolution of time-stamped attribute histories.
//!
//! CVR stores most time-varying facts as `attributter`: a list of typed
//! attributes, each holding `vaerdier` with a value and a validity period
//! (`periode.gyldigFra` / `periode.gyldigTil`). An open-ended period
//! (`gyldigTil` missing or null) is the one currently in effect.

use serde::Serialize;
use serde_json::Value;

use super::value::{path, text, OneOrMany};

pub const OWNERSHIP_SHARE: &str = "EJERANDEL_PROCENT";
pub const VOTING_SHARE: &str = "EJERANDEL_STEMMERET_PROCENT";

/// A `(valid_from, valid_to)` pair. `valid_to == None` means still in effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Period {
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
}

impl Period {
    fn from_value(value: &Value) -> Self {
        Self {
            valid_from: text(path(value, &["periode", "gyldigFra"])),
            valid_to: text(path(value, &["periode", "gyldigTil"])),
        }
    }

    pub fn is_current(&self) -> bool {
        self.valid_to.is_none()
    }
}

/// One value of one attribute type over one period.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntry {
    pub attribute_type: String,
    pub value: Option<String>,
    pub period: Period,
}

/// All attribute entries of one participant membership or company, in source order.
#[derive(Debug, Clone, Default)]
pub struct AttributeHistory {
    entries: Vec<AttributeEntry>,
}

impl AttributeHistory {
    pub fn new(entries: Vec<AttributeEntry>) -> Self {
        Self { entries }
    }

    /// Flattens an `attributter` list (object, list, or absent) into entries.
    /// Attributes without a `type` are skipped.
    pub fn from_attributes(attributes: Option<&Value>) -> Self {
        let mut history = Self::default();
        history.extend_from(attributes);
        history
    }

    /// Appends the entries of another `attributter` list.
    pub fn extend_from(&mut self, attributes: Option<&Value>) {
        for attribute in OneOrMany::of(attributes).iter() {
            let Some(attribute_type) = text(attribute.get("type")) else {
                continue;
            };
            for entry in OneOrMany::of(attribute.get("vaerdier")).iter() {
                self.entries.push(AttributeEntry {
                    attribute_type: attribute_type.clone(),
                    value: text(entry.get("vaerdi")),
                    period: Period::from_value(entry),
                });
            }
        }
    }

    pub fn entries(&self) -> &[AttributeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn of_type<'a>(&'a self, attribute_type: &'a str) -> impl Iterator<Item = &'a AttributeEntry> {
        self.entries
            .iter()
            .filter(move |e| e.attribute_type == attribute_type)
    }

    /// Returns `(value, valid_from)` of the first entry of `attribute_type`
    /// that is currently in effect, or `(None, None)`.
    pub fn resolve_current(&self, attribute_type: &str) -> (Option<String>, Option<String>) {
        self.of_type(attribute_type)
            .find(|e| e.period.is_current())
            .map(|e| (e.value.clone(), e.period.valid_from.clone()))
            .unwrap_or((None, None))
    }

    /// Pairs an ownership share with the voting share of the same period.
    ///
    /// When several ownership entries exist the last one in source order is
    /// used. The voting share is the first voting entry whose period matches
    /// it exactly.
    pub fn resolve_ownership_share(&self) -> OwnershipShare {
        let Some(ownership) = self.of_type(OWNERSHIP_SHARE).last() else {
            return OwnershipShare::default();
        };

        let voting = self
            .of_type(VOTING_SHARE)
            .find(|e| e.period == ownership.period)
            .and_then(|e| e.value.clone());

        OwnershipShare {
            ownership_pct: ownership.value.clone(),
            voting_pct: voting,
            valid_from: ownership.period.valid_from.clone(),
            valid_to: ownership.period.valid_to.clone(),
        }
    }
}

/// Ownership and voting percentages taken from the same validity period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OwnershipShare {
    pub ownership_pct: Option<String>,
    pub voting_pct: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
}
