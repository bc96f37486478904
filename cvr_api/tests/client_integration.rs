use cvr_api::{Client, CompanyQuery, Credentials, Error, Query};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/cvr-permanent/virksomhed/_search";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client_for(server: &MockServer) -> Client {
    Client::with_search_url(&format!("{}{}", server.uri(), SEARCH_PATH))
}

#[tokio::test]
async fn search_by_cvr_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("company.json");

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(body_partial_json(
            json!({ "query": { "term": { "Vrvirksomhed.cvrNummer": 12345678 } } }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = CompanyQuery::default().with_cvr_number(12345678).with_size(1);
    let result = client.search(&query).await;
    assert!(result.is_ok());

    let resp = result.unwrap();
    assert_eq!(resp.total(), 1);
    assert_eq!(resp.first().unwrap().entity().unwrap()["cvrNummer"], 12345678);
}

#[tokio::test]
async fn search_sends_basic_auth_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("empty.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).with_credentials(Credentials {
        username: "user".to_string(),
        password: "secret".to_string(),
    });
    let resp = client
        .search(&CompanyQuery::default().with_name("Nordlys"))
        .await
        .unwrap();
    assert!(resp.is_empty());
}

#[tokio::test]
async fn search_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.search(&CompanyQuery::default()).await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("expected HttpStatus, got {:?}", other.map(|r| r.total())),
    }
}

#[tokio::test]
async fn search_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.search(&CompanyQuery::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn search_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.search(&CompanyQuery::default()).await;
    assert!(matches!(result, Err(Error::ParseFailed(_))));
}

#[tokio::test]
async fn search_invalid_url() {
    let client = Client::with_search_url("not a url");
    let result = client.search(&CompanyQuery::default()).await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}
