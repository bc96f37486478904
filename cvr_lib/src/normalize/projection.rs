//! Builds the flat output shapes from one raw `Vrvirksomhed` document.

use cvr_api::types::{CvrNumber, Hit};
use serde_json::Value;

use super::address::format_address;
use super::participants::{
    classify_ownership, classify_possible_owners, classify_roles, ParticipantRelation,
};
use super::temporal::AttributeHistory;
use super::value::{path, text, text_or_na, OneOrMany};
use super::NOT_AVAILABLE;
use crate::error::CvrError;
use crate::model::{
    CompanyMatch, FullDetail, GeneralInfo, KeyIndividuals, Ownership, PossibleOwnership,
};

const CAPITAL: &str = "KAPITAL";
const CAPITAL_CURRENCY: &str = "KAPITALVALUTA";
const PURPOSE: &str = "FORMÅL";
const SIGNING_RULE: &str = "TEGNINGSREGEL";

/// Field of a capital history entry holding the amount.
const CAPITAL_VALUE: &str = "vaerdi";

/// A borrowed company document from one search hit.
#[derive(Debug, Clone, Copy)]
pub struct EntityDocument<'a> {
    raw: &'a Value,
}

impl<'a> EntityDocument<'a> {
    /// Wraps an already unwrapped `Vrvirksomhed` object.
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// Unwraps the company envelope of a hit.
    pub fn from_hit(hit: &'a Hit) -> Result<Self, CvrError> {
        hit.entity().map(Self::new).ok_or_else(|| {
            CvrError::MalformedRecord(format!(
                "search hit {} has no company document",
                hit.id.as_deref().unwrap_or("<no id>")
            ))
        })
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    fn metadata(&self, keys: &[&str]) -> Option<&'a Value> {
        let mut full = vec!["virksomhedMetadata"];
        full.extend_from_slice(keys);
        path(self.raw, &full)
    }

    pub fn cvr_number(&self) -> Option<CvrNumber> {
        match self.raw.get("cvrNummer")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn cvr_number_text(&self) -> String {
        text_or_na(self.raw.get("cvrNummer"))
    }

    pub fn name(&self) -> Option<String> {
        text(self.metadata(&["nyesteNavn", "navn"]))
    }

    fn name_or_na(&self) -> String {
        self.name().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    fn relations(&self) -> Vec<ParticipantRelation<'a>> {
        ParticipantRelation::all(self.raw.get("deltagerRelation"))
    }

    fn company_attributes(&self) -> AttributeHistory {
        AttributeHistory::from_attributes(self.raw.get("attributter"))
    }

    /// Value field of the most recent entry of a contact list such as `telefonNummer`.
    fn latest_contact(&self, key: &str) -> String {
        let latest = OneOrMany::of(self.raw.get(key)).last();
        text_or_na(latest.and_then(|c| c.get("kontaktoplysning")))
    }

    fn employees(&self) -> Value {
        OneOrMany::of(self.raw.get("aarsbeskaeftigelse"))
            .last()
            .and_then(|e| path(e, &["antalAnsatte"]))
            .cloned()
            .unwrap_or_else(|| Value::from(NOT_AVAILABLE))
    }

    fn advertising_protected(&self) -> String {
        match self.raw.get("reklamebeskyttet").and_then(Value::as_bool) {
            Some(true) => "Yes".to_string(),
            Some(false) => "No".to_string(),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// First entry of the `KAPITAL` history. Objects contribute their amount
    /// field, scalars pass through unchanged.
    fn registered_capital(&self) -> Value {
        let history = OneOrMany::of(self.raw.get("attributter"))
            .iter()
            .find(|a| text(a.get("type")).as_deref() == Some(CAPITAL))
            .and_then(|a| a.get("vaerdier"));
        let first = OneOrMany::of(history).first();
        match first {
            Some(Value::Object(entry)) => entry
                .get(CAPITAL_VALUE)
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| Value::from(NOT_AVAILABLE)),
            Some(scalar @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => scalar.clone(),
            _ => Value::from(NOT_AVAILABLE),
        }
    }

    fn personnel_circle(&self) -> String {
        let names: Vec<String> = self
            .relations()
            .iter()
            .filter_map(ParticipantRelation::name)
            .collect();
        if names.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            names.join(", ")
        }
    }

    /// Name and CVR number, for search result listings.
    pub fn company_match(&self) -> Option<CompanyMatch> {
        Some(CompanyMatch {
            name: self.name_or_na(),
            cvr_number: self.cvr_number()?,
        })
    }

    pub fn general_info(&self) -> GeneralInfo {
        let industry = OneOrMany::of(self.raw.get("hovedbranche")).first();
        GeneralInfo {
            cvr_number: self.cvr_number_text(),
            name: self.name_or_na(),
            address: format_address(self.raw.get("beliggenhedsadresse")),
            company_type: text_or_na(self.metadata(&["nyesteVirksomhedsform", "langBeskrivelse"])),
            status: text_or_na(self.metadata(&["sammensatStatus"])),
            founding_date: text_or_na(self.metadata(&["stiftelsesDato"])),
            industry_code: text_or_na(industry.and_then(|i| i.get("branchekode"))),
            industry_description: text_or_na(industry.and_then(|i| i.get("branchetekst"))),
            employees: self.employees(),
            advertising_protected: self.advertising_protected(),
            phone: self.latest_contact("telefonNummer"),
            email: self.latest_contact("elektroniskPost"),
            website: self.latest_contact("hjemmeside"),
        }
    }

    pub fn possible_ownership(&self) -> PossibleOwnership {
        PossibleOwnership {
            cvr_number: self.cvr_number_text(),
            name: self.name_or_na(),
            owners: classify_possible_owners(&self.relations()),
        }
    }

    pub fn key_individuals(&self) -> KeyIndividuals {
        KeyIndividuals {
            cvr_number: self.cvr_number_text(),
            name: self.name_or_na(),
            roles: classify_roles(&self.relations()),
        }
    }

    pub fn ownership(&self) -> Ownership {
        Ownership {
            cvr_number: self.cvr_number_text(),
            name: self.name_or_na(),
            owners: classify_ownership(&self.relations()),
        }
    }

    pub fn full_detail(&self) -> FullDetail {
        let relations = self.relations();
        let attributes = self.company_attributes();
        let current = |attribute_type: &str| {
            attributes
                .resolve_current(attribute_type)
                .0
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        FullDetail {
            general: self.general_info(),
            registered_capital: self.registered_capital(),
            capital_currency: current(CAPITAL_CURRENCY),
            purpose: current(PURPOSE),
            signing_rule: current(SIGNING_RULE),
            personnel_circle: self.personnel_circle(),
            roles: classify_roles(&relations),
            owners: classify_ownership(&relations),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::OwnerType;

    fn doc(raw: &Value) -> EntityDocument<'_> {
        EntityDocument::new(raw)
    }

    #[test]
    fn general_info_defaults_everything_to_na() {
        let raw = json!({});
        let info = doc(&raw).general_info();
        assert_eq!(info.cvr_number, "N/A");
        assert_eq!(info.name, "N/A");
        assert_eq!(info.address, "N/A");
        assert_eq!(info.company_type, "N/A");
        assert_eq!(info.status, "N/A");
        assert_eq!(info.founding_date, "N/A");
        assert_eq!(info.industry_code, "N/A");
        assert_eq!(info.industry_description, "N/A");
        assert_eq!(info.employees, json!("N/A"));
        assert_eq!(info.advertising_protected, "N/A");
        assert_eq!(info.phone, "N/A");
        assert_eq!(info.email, "N/A");
        assert_eq!(info.website, "N/A");
    }

    #[test]
    fn general_info_address_from_single_element_list() {
        let raw = json!({
            "cvrNummer": 11223344,
            "beliggenhedsadresse": [{
                "vejnavn": "Main St",
                "husnummerFra": "1",
                "postnummer": "2100",
                "postdistrikt": "Copenhagen"
            }]
        });
        let info = doc(&raw).general_info();
        assert_eq!(info.address, "Main St, 1, 2100, Copenhagen");
        assert_eq!(info.cvr_number, "11223344");
    }

    #[test]
    fn industry_uses_first_and_employees_use_last() {
        let raw = json!({
            "hovedbranche": [
                {"branchekode": "620100", "branchetekst": "Computerprogrammering"},
                {"branchekode": "702200", "branchetekst": "Rådgivning"}
            ],
            "aarsbeskaeftigelse": [
                {"aar": 2021, "antalAnsatte": 8},
                {"aar": 2022, "antalAnsatte": 12}
            ]
        });
        let info = doc(&raw).general_info();
        assert_eq!(info.industry_code, "620100");
        assert_eq!(info.industry_description, "Computerprogrammering");
        assert_eq!(info.employees, json!(12));
    }

    #[test]
    fn employee_count_passes_through_when_zero_or_text() {
        let zero = json!({"aarsbeskaeftigelse": [{"antalAnsatte": 0}]});
        assert_eq!(doc(&zero).general_info().employees, json!(0));

        let interval = json!({"aarsbeskaeftigelse": {"antalAnsatte": "10-19"}});
        assert_eq!(doc(&interval).general_info().employees, json!("10-19"));

        let null = json!({"aarsbeskaeftigelse": [{"antalAnsatte": null}]});
        assert_eq!(doc(&null).general_info().employees, json!("N/A"));
    }

    #[test]
    fn advertising_protection_flag() {
        let yes = json!({"reklamebeskyttet": true});
        let no = json!({"reklamebeskyttet": false});
        assert_eq!(doc(&yes).general_info().advertising_protected, "Yes");
        assert_eq!(doc(&no).general_info().advertising_protected, "No");
    }

    #[test]
    fn contacts_use_most_recent_entry() {
        let raw = json!({
            "telefonNummer": [{"kontaktoplysning": "11111111"}, {"kontaktoplysning": "22222222"}],
            "hjemmeside": {"kontaktoplysning": "www.example.dk"}
        });
        let info = doc(&raw).general_info();
        assert_eq!(info.phone, "22222222");
        assert_eq!(info.website, "www.example.dk");
        assert_eq!(info.email, "N/A");
    }

    #[test]
    fn registered_capital_uses_first_entry() {
        let raw = json!({"attributter": [
            {"type": "KAPITALVALUTA", "vaerdier": [{"vaerdi": "DKK"}]},
            {"type": "KAPITAL", "vaerdier": [
                {"vaerdi": "40000.0", "periode": {"gyldigTil": "2019-12-31"}},
                {"vaerdi": "125000.0", "periode": {"gyldigTil": null}}
            ]}
        ]});
        assert_eq!(doc(&raw).registered_capital(), json!("40000.0"));
    }

    #[test]
    fn registered_capital_shapes() {
        let scalar = json!({"attributter": [{"type": "KAPITAL", "vaerdier": [50000]}]});
        assert_eq!(doc(&scalar).registered_capital(), json!(50000));

        let single = json!({"attributter": {"type": "KAPITAL", "vaerdier": {"vaerdi": 80000}}});
        assert_eq!(doc(&single).registered_capital(), json!(80000));

        let nested_list = json!({"attributter": [{"type": "KAPITAL", "vaerdier": [[1, 2]]}]});
        assert_eq!(doc(&nested_list).registered_capital(), json!("N/A"));

        let missing = json!({});
        assert_eq!(doc(&missing).registered_capital(), json!("N/A"));
    }

    #[test]
    fn personnel_circle_joins_names() {
        let raw = json!({"deltagerRelation": [
            {"deltager": {"navne": [{"navn": "Anne Jensen"}]}},
            {"deltager": {"navne": []}},
            {"deltager": {"navne": [{"navn": "Fjord Holding A/S"}]}}
        ]});
        assert_eq!(doc(&raw).personnel_circle(), "Anne Jensen, Fjord Holding A/S");
        assert_eq!(doc(&json!({})).personnel_circle(), "N/A");
    }

    #[test]
    fn cvr_number_from_number_or_string() {
        assert_eq!(doc(&json!({"cvrNummer": 12345678})).cvr_number(), Some(12345678));
        assert_eq!(doc(&json!({"cvrNummer": " 87654321 "})).cvr_number(), Some(87654321));
        assert_eq!(doc(&json!({"cvrNummer": "abc"})).cvr_number(), None);
        assert_eq!(doc(&json!({})).company_match(), None);
    }

    #[test]
    fn from_hit_requires_envelope() {
        let hit: Hit = serde_json::from_value(json!({"_id": "42", "_source": {}})).unwrap();
        match EntityDocument::from_hit(&hit) {
            Err(CvrError::MalformedRecord(msg)) => assert!(msg.contains("42")),
            other => panic!("expected MalformedRecord, got {:?}", other.map(|d| d.raw().clone())),
        }
    }

    #[test]
    fn ownership_scenarios() {
        let membership = |to: Value| {
            json!({"deltagerRelation": [{
                "deltager": {"enhedstype": "PERSON", "navne": [{"navn": "Anne Jensen"}]},
                "organisationer": [{
                    "hovedtype": "REGISTER",
                    "organisationsNavn": [{"navn": "EJERREGISTER"}],
                    "medlemsData": [{"attributter": [
                        {"type": "EJERANDEL_PROCENT", "vaerdier": [{"vaerdi": "1.0", "periode": {"gyldigFra": "2020-01-01", "gyldigTil": to}}]},
                        {"type": "EJERANDEL_STEMMERET_PROCENT", "vaerdier": [{"vaerdi": "1.0", "periode": {"gyldigFra": "2020-01-01", "gyldigTil": to}}]}
                    ]}]
                }]
            }]})
        };

        let current = membership(Value::Null);
        let owners = doc(&current).ownership().owners;
        assert_eq!(owners.legal_owners.len(), 1);
        assert_eq!(owners.legal_owners[0].owner_type, OwnerType::Legal);
        assert!(owners.terminated_owners.is_empty());

        let ended = membership(json!("2022-01-01"));
        let owners = doc(&ended).ownership().owners;
        assert!(owners.legal_owners.is_empty());
        assert_eq!(owners.terminated_owners[0].owner_type, OwnerType::Terminated);
        assert_eq!(owners.terminated_owners[0].valid_to.as_deref(), Some("2022-01-01"));
    }

    #[test]
    fn full_detail_resolves_current_company_attributes() {
        let raw = json!({"attributter": [
            {"type": "FORMÅL", "vaerdier": [
                {"vaerdi": "Gammelt formål", "periode": {"gyldigFra": "2010-01-01", "gyldigTil": "2015-01-01"}},
                {"vaerdi": "Nyt formål", "periode": {"gyldigFra": "2015-01-02", "gyldigTil": null}}
            ]}
        ]});
        let detail = doc(&raw).full_detail();
        assert_eq!(detail.purpose, "Nyt formål");
        assert_eq!(detail.signing_rule, "N/A");
        assert_eq!(detail.capital_currency, "N/A");
        assert_eq!(detail.registered_capital, json!("N/A"));
    }
}
