use cvr_api::types::{SearchResponse, TotalHits};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_company_full() {
    let json = load_fixture("company.json");
    let resp: SearchResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.total(), 1);
    assert_eq!(resp.hits.total, Some(TotalHits::Count(1)));
    assert_eq!(resp.took, Some(7));

    let hit = resp.first().unwrap();
    assert_eq!(hit.id.as_deref(), Some("4001234567"));
    let entity = hit.entity().unwrap();
    assert_eq!(entity["cvrNummer"], 12345678);
    assert_eq!(
        entity["virksomhedMetadata"]["nyesteNavn"]["navn"],
        "Nordlys Teknik ApS"
    );
}

#[test]
fn deserialize_total_as_object() {
    let json = load_fixture("search_prefix.json");
    let resp: SearchResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.hits.total, Some(TotalHits::Object { value: 3 }));
    assert_eq!(resp.total(), 3);
    assert_eq!(resp.hits.hits.len(), 3);
}

#[test]
fn deserialize_empty_result() {
    let json = load_fixture("empty.json");
    let resp: SearchResponse = serde_json::from_str(&json).unwrap();
    assert!(resp.is_empty());
    assert!(resp.first().is_none());
    assert_eq!(resp.total(), 0);
}

#[test]
fn total_falls_back_to_hit_count() {
    let json = r#"{"hits": {"hits": [{"_source": {}}, {"_source": {}}]}}"#;
    let resp: SearchResponse = serde_json::from_str(json).unwrap();
    assert!(resp.hits.total.is_none());
    assert_eq!(resp.total(), 2);
}

#[test]
fn entity_missing_from_source() {
    let json = load_fixture("missing_envelope.json");
    let resp: SearchResponse = serde_json::from_str(&json).unwrap();
    assert!(resp.first().unwrap().entity().is_none());
}

#[test]
fn entity_must_be_an_object() {
    let json = r#"{"hits": {"total": 1, "hits": [{"_source": {"Vrvirksomhed": "nope"}}]}}"#;
    let resp: SearchResponse = serde_json::from_str(json).unwrap();
    assert!(resp.first().unwrap().entity().is_none());
}

#[test]
fn deserialize_malformed_json_returns_error() {
    let bad_json = r#"{"hits": not valid json}"#;
    let result = serde_json::from_str::<SearchResponse>(bad_json);
    assert!(result.is_err());
}

#[test]
fn deserialize_missing_hits_returns_error() {
    let json = r#"{"took": 1, "timed_out": false}"#;
    let result = serde_json::from_str::<SearchResponse>(json);
    assert!(result.is_err());
}
