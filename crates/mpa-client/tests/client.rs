//! Integration tests for `ApiClient` using wiremock HTTP mocks.

use mpa_client::{
    ApiClient, EnrichmentRequest, ManualSearchRequest, PartResolveRequest, SupplierSearchRequest,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, "mpa-test/0.1").expect("client construction should not fail")
}

#[tokio::test]
async fn every_request_disables_caching() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/manuals/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recordings/available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"recordings": []})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .search_manuals(&ManualSearchRequest {
            make: "Carrier",
            model: "58STA",
        })
        .await;
    client.available_recordings().await;

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    for req in &requests {
        let header = |name: &str| {
            req.headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        assert_eq!(
            header("cache-control").as_deref(),
            Some("no-cache, no-store, must-revalidate")
        );
        assert_eq!(header("pragma").as_deref(), Some("no-cache"));
        assert_eq!(header("expires").as_deref(), Some("0"));
    }
}

#[tokio::test]
async fn get_requests_carry_cache_bust_param_and_posts_do_not() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"profiles": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/suppliers/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"suppliers": []})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.list_profiles(true).await;
    client
        .search_suppliers(&SupplierSearchRequest {
            part_number: "HH18HA499",
            make: "Carrier",
            model: "58STA",
        })
        .await;

    let requests = server.received_requests().await.expect("recording enabled");
    let get = requests
        .iter()
        .find(|r| r.method.as_str() == "GET")
        .expect("GET was sent");
    let pairs: Vec<(String, String)> = get.url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("include_sensitive".to_string(), "true".to_string())));
    let ts = pairs
        .iter()
        .find(|(k, _)| k == "_t")
        .map(|(_, v)| v.clone())
        .expect("GET should carry _t");
    assert!(ts.parse::<i64>().is_ok(), "timestamp should be numeric: {ts}");

    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("POST was sent");
    assert!(post.url.query_pairs().all(|(k, _)| k != "_t"));
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/parts/resolve"))
        .and(body_partial_json(json!({
            "description": "hi limit switch",
            "make": "Carrier",
            "model": "58STA",
            "use_web_search": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommended_result": {"oem_part_number": "HH18HA499"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .resolve_part(&PartResolveRequest::full("hi limit switch", "Carrier", "58STA"))
        .await;

    assert!(response.success);
    assert_eq!(response.status, 200);
    assert_eq!(
        response.get("recommended_result").unwrap()["oem_part_number"],
        "HH18HA499"
    );
}

#[tokio::test]
async fn enrichment_omits_absent_part_number() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/enrichment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .enrich(&EnrichmentRequest {
            make: "Carrier",
            model: "58STA",
            part_number: None,
        })
        .await;

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"make": "Carrier", "model": "58STA"}));
}

#[tokio::test]
async fn error_field_on_200_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/manuals/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "search backend offline"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .search_manuals(&ManualSearchRequest {
            make: "Carrier",
            model: "58STA",
        })
        .await;

    assert!(!response.success);
    assert_eq!(response.status, 200);
    assert_eq!(response.error.as_deref(), Some("search backend offline"));
}

#[tokio::test]
async fn http_error_status_keeps_payload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/profiles/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such profile"})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client.delete_profile(9).await;

    assert!(!response.success);
    assert_eq!(response.status, 404);
    assert_eq!(response.status_text, "Not Found");
    assert_eq!(response.get("message").unwrap(), "no such profile");
}

#[tokio::test]
async fn network_failure_is_normalized_not_thrown() {
    // Port 1 is reserved and closed on test hosts; the connect is refused.
    let client = test_client("http://127.0.0.1:1");
    let response = client.available_recordings().await;

    assert!(!response.success);
    assert_eq!(response.status, 0);
    assert_eq!(response.status_text, "Network Error");
    assert!(response.error.is_some());
}

#[tokio::test]
async fn slow_lookup_is_awaited_rather_than_cut_off() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/parts/resolve"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_millis(1500))
                .set_body_json(json!({"recommended_result": {"oem_part_number": "HH18HA499"}})),
        )
        .mount(&server)
        .await;

    let response = test_client(&server.uri())
        .resolve_part(&PartResolveRequest::full("hi limit switch", "Carrier", "58STA"))
        .await;

    assert!(response.success);
    assert_eq!(response.status, 200);
    assert!(response.error.is_none());
}
