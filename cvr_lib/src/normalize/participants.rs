//! Classification of a company's participant relations (`deltagerRelation`)
//! into management roles and ownership buckets.

use std::collections::HashSet;

use serde_json::Value;

use super::address::format_address;
use super::temporal::AttributeHistory;
use super::value::{path, text, OneOrMany};
use crate::model::{KeyPerson, Owner, OwnerType, OwnershipBuckets, PossibleOwners, RoleBuckets};

pub const UNKNOWN_NAME: &str = "Unknown";
pub const SECRET_ADDRESS: &str = "Secret Address";

/// `hovedtype` of management bodies (board and executive management).
pub const MANAGEMENT_BODY: &str = "LEDELSESORGAN";
/// `hovedtype` of founders.
pub const FOUNDERS: &str = "STIFTERE";
/// `hovedtype` of fully liable partners.
pub const FULLY_LIABLE: &str = "FULDT_ANSVARLIG_DELTAGERE";

/// Role name of the board of directors within a management body.
pub const BOARD: &str = "Bestyrelse";
/// Role name of the executive management within a management body.
pub const EXECUTIVE_MANAGEMENT: &str = "Direktion";

/// Role name of the legal owners register.
pub const LEGAL_OWNERS_REGISTER: &str = "EJERREGISTER";
/// Role name of the beneficial owners register.
pub const BENEFICIAL_OWNERS_REGISTER: &str = "Reelle ejere";

/// `enhedstype` of participants that are themselves companies.
pub const ORGANIZATION_TYPE: &str = "VIRKSOMHED";

/// Legal-form suffixes that mark a participant name as a company.
pub const ORGANIZATION_SUFFIXES: &[&str] = &[
    "A/S", "ApS", "IVS", "K/S", "P/S", "I/S", "Inc.", "LLC", "Ltd.", "Limited", "GmbH", "S.A.",
    "B.V.", "A.m.b.a.",
];

/// One company-to-participant edge of a registry document.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantRelation<'a> {
    raw: &'a Value,
}

impl<'a> ParticipantRelation<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// Wraps every entry of a `deltagerRelation` value.
    pub fn all(relations: Option<&'a Value>) -> Vec<Self> {
        OneOrMany::of(relations)
            .iter()
            .filter(|r| r.is_object())
            .map(Self::new)
            .collect()
    }

    fn participant(&self) -> Option<&'a Value> {
        path(self.raw, &["deltager"])
    }

    /// The participant's name, if any `navne` entry carries one.
    pub fn name(&self) -> Option<String> {
        let names = self.participant().and_then(|p| p.get("navne"));
        OneOrMany::of(names).first().and_then(|n| text(n.get("navn")))
    }

    /// The first registered name, or `"Unknown"`.
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    pub fn entity_type(&self) -> Option<String> {
        text(self.participant().and_then(|p| p.get("enhedstype")))
    }

    pub fn is_address_secret(&self) -> bool {
        self.participant()
            .and_then(|p| p.get("adresseHemmelig"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The formatted participant address, masked when it is registered as secret.
    pub fn address(&self) -> String {
        if self.is_address_secret() {
            return SECRET_ADDRESS.to_string();
        }
        format_address(self.participant().and_then(|p| p.get("beliggenhedsadresse")))
    }

    pub fn memberships(&self) -> Vec<OrganizationMembership> {
        OneOrMany::of(self.raw.get("organisationer"))
            .iter()
            .map(OrganizationMembership::from_value)
            .collect()
    }
}

/// One role of a participant in the company, with its attribute history.
#[derive(Debug, Clone, Default)]
pub struct OrganizationMembership {
    /// The `hovedtype` role category, e.g. `LEDELSESORGAN`.
    pub category: Option<String>,
    /// The most recent `organisationsNavn`, e.g. `Direktion` or `EJERREGISTER`.
    pub role_name: Option<String>,
    pub history: AttributeHistory,
}

impl OrganizationMembership {
    fn from_value(raw: &Value) -> Self {
        let mut history = AttributeHistory::default();
        for member in OneOrMany::of(raw.get("medlemsData")).iter() {
            history.extend_from(member.get("attributter"));
        }
        Self {
            category: text(raw.get("hovedtype")),
            role_name: OneOrMany::of(raw.get("organisationsNavn"))
                .last()
                .and_then(|n| text(n.get("navn"))),
            history,
        }
    }

    fn role_is(&self, expected: &str) -> bool {
        self.role_name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(expected))
    }
}

/// Sorts participants into management, board, founder and fully-liable buckets.
///
/// Only memberships whose category is a management body, founders or fully
/// liable partners are considered. Management-body memberships other than the
/// board and the executive management are dropped.
pub fn classify_roles(relations: &[ParticipantRelation<'_>]) -> RoleBuckets {
    let mut buckets = RoleBuckets::default();
    for relation in relations {
        for membership in relation.memberships() {
            let bucket = match membership.category.as_deref() {
                Some(MANAGEMENT_BODY) if membership.role_is(BOARD) => {
                    &mut buckets.board_of_directors
                }
                Some(MANAGEMENT_BODY) if membership.role_is(EXECUTIVE_MANAGEMENT) => {
                    &mut buckets.management
                }
                Some(FOUNDERS) => &mut buckets.founders,
                Some(FULLY_LIABLE) => &mut buckets.fully_liable_partners,
                _ => continue,
            };
            bucket.push(KeyPerson {
                name: relation.display_name(),
                address: relation.address(),
            });
        }
    }
    buckets
}

/// Sorts owner-register memberships into legal, beneficial and terminated owners.
///
/// Any membership whose ownership share has an end date is terminated,
/// whichever register it came from.
pub fn classify_ownership(relations: &[ParticipantRelation<'_>]) -> OwnershipBuckets {
    let mut buckets = OwnershipBuckets::default();
    for relation in relations {
        for membership in relation.memberships() {
            let kind = match membership.role_name.as_deref() {
                Some(LEGAL_OWNERS_REGISTER) => OwnerType::Legal,
                Some(BENEFICIAL_OWNERS_REGISTER) => OwnerType::Beneficial,
                _ => continue,
            };
            let share = membership.history.resolve_ownership_share();
            let owner_type = if share.valid_to.is_some() {
                OwnerType::Terminated
            } else {
                kind
            };
            let owner = Owner {
                name: relation.display_name(),
                address: relation.address(),
                owner_type,
                ownership_percentage: share.ownership_pct,
                voting_percentage: share.voting_pct,
                valid_from: share.valid_from,
                valid_to: share.valid_to,
            };
            match owner_type {
                OwnerType::Legal => buckets.legal_owners.push(owner),
                OwnerType::Beneficial => buckets.beneficial_owners.push(owner),
                OwnerType::Terminated => buckets.terminated_owners.push(owner),
            }
        }
    }
    buckets
}

/// Guesses owners from participant names alone.
///
/// Companies (by entity type or legal-form suffix) are possible legal owners,
/// everyone else a possible beneficial owner. Participants without a name are
/// skipped. Each list keeps first-seen order without duplicates.
pub fn classify_possible_owners(relations: &[ParticipantRelation<'_>]) -> PossibleOwners {
    let mut owners = PossibleOwners::default();
    let mut seen_legal = HashSet::new();
    let mut seen_beneficial = HashSet::new();

    for relation in relations {
        let Some(name) = relation.name() else {
            continue;
        };
        if looks_like_organization(relation.entity_type().as_deref(), &name) {
            if seen_legal.insert(name.clone()) {
                owners.possible_legal_owners.push(name);
            }
        } else if seen_beneficial.insert(name.clone()) {
            owners.possible_beneficial_owners.push(name);
        }
    }
    owners
}

fn looks_like_organization(entity_type: Option<&str>, name: &str) -> bool {
    entity_type == Some(ORGANIZATION_TYPE)
        || ORGANIZATION_SUFFIXES
            .iter()
            .any(|suffix| name.contains(suffix))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn relation(name: &str, entity_type: &str, organisations: Value) -> Value {
        json!({
            "deltager": {
                "enhedstype": entity_type,
                "navne": [{"navn": name}],
                "beliggenhedsadresse": [{"vejnavn": "Bredgade", "husnummerFra": 30}]
            },
            "organisationer": organisations
        })
    }

    fn org(category: &str, role_name: &str) -> Value {
        json!({"hovedtype": category, "organisationsNavn": [{"navn": role_name}], "medlemsData": []})
    }

    fn owner_org(register: &str, from: &str, to: Option<&str>) -> Value {
        let periode = json!({"gyldigFra": from, "gyldigTil": to});
        json!({
            "hovedtype": "REGISTER",
            "organisationsNavn": [{"navn": register}],
            "medlemsData": [{"attributter": [
                {"type": "EJERANDEL_PROCENT", "vaerdier": [{"vaerdi": "0.5", "periode": periode}]},
                {"type": "EJERANDEL_STEMMERET_PROCENT", "vaerdier": [{"vaerdi": "0.25", "periode": periode}]}
            ]}]
        })
    }

    fn classify<T>(raw: &Value, f: impl Fn(&[ParticipantRelation<'_>]) -> T) -> T {
        f(&ParticipantRelation::all(Some(raw)))
    }

    // -- Relation accessors --

    #[test]
    fn first_name_and_unknown_fallback() {
        let raw = json!({"deltager": {"navne": [{"navn": "Peter Hansen"}, {"navn": "Peter Juul Hansen"}]}});
        assert_eq!(ParticipantRelation::new(&raw).display_name(), "Peter Hansen");

        let nameless = json!({"deltager": {"navne": []}});
        assert_eq!(ParticipantRelation::new(&nameless).display_name(), "Unknown");
        assert_eq!(ParticipantRelation::new(&json!({})).display_name(), "Unknown");
    }

    #[test]
    fn secret_address_overrides_data() {
        let raw = json!({"deltager": {
            "adresseHemmelig": true,
            "beliggenhedsadresse": {"vejnavn": "Hemmeligvej", "husnummerFra": 1}
        }});
        assert_eq!(ParticipantRelation::new(&raw).address(), "Secret Address");
    }

    #[test]
    fn missing_address_is_na() {
        let raw = json!({"deltager": {"navne": [{"navn": "X"}]}});
        assert_eq!(ParticipantRelation::new(&raw).address(), "N/A");
    }

    #[test]
    fn membership_role_name_is_most_recent() {
        let raw = json!({"organisationer": {
            "hovedtype": "LEDELSESORGAN",
            "organisationsNavn": [{"navn": "Direktion"}, {"navn": "Bestyrelse"}]
        }});
        let memberships = ParticipantRelation::new(&raw).memberships();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role_name.as_deref(), Some("Bestyrelse"));
    }

    // -- Roles --

    #[test]
    fn roles_are_bucketed() {
        let raw = json!([
            relation("Anne Jensen", "PERSON", json!([org("LEDELSESORGAN", "Direktion"), org("STIFTERE", "Stiftere")])),
            relation("Peter Hansen", "PERSON", json!([org("LEDELSESORGAN", "BESTYRELSE")])),
            relation("Ole Olsen", "PERSON", json!([org("FULDT_ANSVARLIG_DELTAGERE", "Interessenter")])),
            relation("Mette Holm", "PERSON", json!([org("LEDELSESORGAN", "Repræsentantskab")])),
            relation("Revisor A/S", "VIRKSOMHED", json!([org("REVISION", "Revision")]))
        ]);
        let buckets = classify(&raw, classify_roles);

        let names = |people: &[KeyPerson]| people.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&buckets.management), ["Anne Jensen"]);
        assert_eq!(names(&buckets.board_of_directors), ["Peter Hansen"]);
        assert_eq!(names(&buckets.founders), ["Anne Jensen"]);
        assert_eq!(names(&buckets.fully_liable_partners), ["Ole Olsen"]);
        assert_eq!(buckets.management[0].address, "Bredgade, 30");
    }

    #[test]
    fn roles_of_empty_relations() {
        let buckets = classify(&Value::Null, classify_roles);
        assert!(buckets.management.is_empty());
        assert!(buckets.founders.is_empty());
    }

    // -- Ownership --

    #[test]
    fn current_owner_keeps_register_kind() {
        let raw = json!([
            relation("Anne Jensen", "PERSON", json!([
                owner_org("EJERREGISTER", "2020-01-01", None),
                owner_org("Reelle ejere", "2020-01-01", None)
            ]))
        ]);
        let buckets = classify(&raw, classify_ownership);
        assert_eq!(buckets.legal_owners.len(), 1);
        assert_eq!(buckets.beneficial_owners.len(), 1);
        assert!(buckets.terminated_owners.is_empty());

        let legal = &buckets.legal_owners[0];
        assert_eq!(legal.owner_type, OwnerType::Legal);
        assert_eq!(legal.ownership_percentage.as_deref(), Some("0.5"));
        assert_eq!(legal.voting_percentage.as_deref(), Some("0.25"));
        assert_eq!(legal.valid_from.as_deref(), Some("2020-01-01"));
        assert_eq!(legal.valid_to, None);
        assert_eq!(buckets.beneficial_owners[0].owner_type, OwnerType::Beneficial);
    }

    #[test]
    fn ended_share_is_terminated_regardless_of_register() {
        let raw = json!([
            relation("Fjord Holding A/S", "VIRKSOMHED", json!([owner_org("EJERREGISTER", "2020-01-01", Some("2022-01-01"))])),
            relation("Anne Jensen", "PERSON", json!([owner_org("Reelle ejere", "2020-01-01", Some("2022-01-01"))]))
        ]);
        let buckets = classify(&raw, classify_ownership);
        assert!(buckets.legal_owners.is_empty());
        assert!(buckets.beneficial_owners.is_empty());
        assert_eq!(buckets.terminated_owners.len(), 2);
        for owner in &buckets.terminated_owners {
            assert_eq!(owner.owner_type, OwnerType::Terminated);
            assert_eq!(owner.valid_to.as_deref(), Some("2022-01-01"));
        }
    }

    #[test]
    fn non_register_memberships_are_not_owners() {
        let raw = json!([relation("Anne Jensen", "PERSON", json!([org("LEDELSESORGAN", "Direktion")]))]);
        let buckets = classify(&raw, classify_ownership);
        assert!(buckets.legal_owners.is_empty());
        assert!(buckets.beneficial_owners.is_empty());
        assert!(buckets.terminated_owners.is_empty());
    }

    #[test]
    fn register_without_shares_is_current_with_empty_fields() {
        let raw = json!([relation("Anne Jensen", "PERSON", json!([org("REGISTER", "EJERREGISTER")]))]);
        let buckets = classify(&raw, classify_ownership);
        let owner = &buckets.legal_owners[0];
        assert_eq!(owner.ownership_percentage, None);
        assert_eq!(owner.voting_percentage, None);
    }

    // -- Possible owners --

    #[test]
    fn possible_owners_by_type_and_suffix() {
        let raw = json!([
            relation("Fjord Holding", "VIRKSOMHED", json!([])),
            relation("Nordic Widgets ApS", "PERSON", json!([])),
            relation("Anne Jensen", "PERSON", json!([])),
            {"deltager": {"navne": [{"navn": "Acme Ltd."}]}},
            {"deltager": {"navne": [{"navn": "Ole Olsen"}]}}
        ]);
        let owners = classify(&raw, classify_possible_owners);
        assert_eq!(
            owners.possible_legal_owners,
            ["Fjord Holding", "Nordic Widgets ApS", "Acme Ltd."]
        );
        assert_eq!(owners.possible_beneficial_owners, ["Anne Jensen", "Ole Olsen"]);
    }

    #[test]
    fn possible_owners_dedup_preserves_first_seen_order() {
        let raw = json!([
            relation("Bo Berg", "PERSON", json!([])),
            relation("Anne Jensen", "PERSON", json!([])),
            relation("Bo Berg", "PERSON", json!([])),
            relation("X ApS", "VIRKSOMHED", json!([])),
            relation("X ApS", "VIRKSOMHED", json!([])),
            {"deltager": {"navne": []}}
        ]);
        let owners = classify(&raw, classify_possible_owners);
        assert_eq!(owners.possible_beneficial_owners, ["Bo Berg", "Anne Jensen"]);
        assert_eq!(owners.possible_legal_owners, ["X ApS"]);
    }
}
