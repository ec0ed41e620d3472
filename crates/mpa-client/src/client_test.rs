use super::*;

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, "mpa-test/0.1").expect("client construction should not fail")
}

#[test]
fn build_url_joins_api_path() {
    let client = test_client("http://localhost:7777");
    let url = client.build_url("/api/parts/resolve", None).unwrap();
    assert_eq!(url.as_str(), "http://localhost:7777/api/parts/resolve");
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("https://agent.example.com/mpa/");
    let url = client.build_url("/api/profiles", None).unwrap();
    assert_eq!(url.as_str(), "https://agent.example.com/mpa/api/profiles");
}

#[test]
fn build_url_appends_cache_bust_after_existing_query() {
    let client = test_client("http://localhost:7777");
    let url = client
        .build_url("/api/profiles?include_sensitive=true", Some(1_700_000_000_000))
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:7777/api/profiles?include_sensitive=true&_t=1700000000000"
    );
}

#[test]
fn new_rejects_unparseable_base_url() {
    let result = ApiClient::new("not a url", "mpa-test/0.1");
    assert!(
        matches!(result, Err(ClientError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl, got: {result:?}"
    );
}

#[test]
fn no_cache_headers_are_complete() {
    let headers = no_cache_headers();
    assert_eq!(
        headers.get(CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(headers.get(PRAGMA).unwrap(), "no-cache");
    assert_eq!(headers.get(EXPIRES).unwrap(), "0");
}
