// Integration tests for `PrinterClient` using wiremock, covering both
// auth schemes: API-key header and digest challenge/response.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hivebridge_api::printer::PrinterState;
use hivebridge_api::{Credential, Error, PrinterClient};

// ── Helpers ─────────────────────────────────────────────────────────

fn api_key_client(server: &MockServer) -> PrinterClient {
    PrinterClient::with_client(
        reqwest::Client::new(),
        server.uri().parse().unwrap(),
        Credential::ApiKey(SecretString::from("printer-key".to_owned())),
    )
}

fn digest_client(server: &MockServer) -> PrinterClient {
    PrinterClient::with_client(
        reqwest::Client::new(),
        server.uri().parse().unwrap(),
        Credential::Digest {
            username: "maker".into(),
            password: SecretString::from("hunter2".to_owned()),
        },
    )
}

const CHALLENGE: &str = "Digest realm=\"printer\", nonce=\"abc123\", qop=\"auth\"";

// ── API-key auth ────────────────────────────────────────────────────

#[tokio::test]
async fn test_info_sends_api_key_header() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let body = json!({
        "serial": "PRN-001",
        "name": "Workshop MK4",
        "hostname": "prusa.local",
        "nozzle_diameter": 0.4
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .and(header("X-Api-Key", "printer-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let info = client.info().await.unwrap();

    assert_eq!(info.serial.as_deref(), Some("PRN-001"));
    assert_eq!(info.display_name(), Some("Workshop MK4"));
}

#[tokio::test]
async fn test_status_parses_telemetry() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let body = json!({
        "printer": {
            "state": "PRINTING",
            "temp_nozzle": 214.8,
            "target_nozzle": 215.0,
            "temp_bed": 60.1,
            "target_bed": 60.0,
            "fan_hotend": 5000,
            "fan_print": 3000
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();

    assert_eq!(status.printer.state, PrinterState::Printing);
    assert_eq!(status.printer.temp_nozzle, Some(214.8));
    assert_eq!(status.printer.target_bed, Some(60.0));
}

// ── Digest auth ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_digest_challenge_is_answered_once() {
    let server = MockServer::start().await;
    let client = digest_client(&server);

    // First, unauthenticated request gets the challenge...
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .respond_with(ResponseTemplate::new(401).insert_header("www-authenticate", CHALLENGE))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // ...and the follow-up carrying an Authorization header succeeds.
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .and(header_exists("authorization"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "serial": "PRN-001" })),
        )
        .mount(&server)
        .await;

    let info = client.info().await.unwrap();
    assert_eq!(info.serial.as_deref(), Some("PRN-001"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let auth = requests[1]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(auth.starts_with("Digest username=\"maker\""));
    assert!(auth.contains("uri=\"/api/v1/info\""));
    assert!(auth.contains("qop=auth"));
}

#[tokio::test]
async fn test_digest_second_401_is_auth_failure() {
    let server = MockServer::start().await;
    let client = digest_client(&server);

    // Wrong credentials: the printer keeps challenging.
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .respond_with(ResponseTemplate::new(401).insert_header("www-authenticate", CHALLENGE))
        .mount(&server)
        .await;

    let err = client.info().await.unwrap_err();

    assert!(matches!(err, Error::Unauthorized));
    assert!(err.is_auth_failure());

    // Exactly one challenge answered -- no retry loop.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_digest_401_without_challenge_is_comm_failure() {
    let server = MockServer::start().await;
    let client = digest_client(&server);

    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.info().await.unwrap_err();

    assert!(matches!(err, Error::DigestChallenge { .. }));
    assert!(err.is_comm_failure());
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_error_503_is_comm_failure() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.status().await.unwrap_err();

    assert!(matches!(err, Error::Status { status: 503 }));
    assert!(err.is_comm_failure());
}

#[tokio::test]
async fn test_error_401_with_api_key_is_auth_failure() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.status().await.unwrap_err();
    assert!(err.is_auth_failure());
}
