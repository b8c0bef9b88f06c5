//! HttpClient against a live mock server

use reqwest::header::{HeaderMap, HeaderValue};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mwquery::client::{CookieOp, HttpClient};
use mwquery::cookies::CookieJar;
use mwquery::errors::MwqueryError;
use mwquery::mime::MediaType;

// ============================================================================
// Status handling
// ============================================================================

#[tokio::test]
async fn test_get_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 2})))
        .mount(&server)
        .await;

    let client = HttpClient::new(None).unwrap();
    let result = client.get(&format!("{}/items", server.uri()), HeaderMap::new()).await.unwrap();

    assert_eq!(result.status(), 200);
    assert!(result.is_success());
    assert_eq!(result.content_type().unwrap().essence_str(), "application/json");
    assert_eq!(result.json().unwrap()["count"], 2);
}

#[tokio::test]
async fn test_not_found_is_a_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such thing\n"))
        .mount(&server)
        .await;

    let client = HttpClient::new(None).unwrap();
    let result = client.get(&format!("{}/missing", server.uri()), HeaderMap::new()).await.unwrap();

    assert_eq!(result.status(), 404);
    assert!(!result.is_success());
    assert_eq!(result.body(), "no such thing");
}

#[tokio::test]
async fn test_server_error_is_a_result() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpClient::new(None).unwrap();
    let result = client
        .put(MediaType::Json, &server.uri(), HeaderMap::new(), "{}")
        .await
        .unwrap();
    assert_eq!(result.status(), 503);
    assert!(!result.is_success());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a listener to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();
    let cookie_path = dir.path().join("cookies.json");

    let client = HttpClient::new(Some(cookie_path.clone())).unwrap();
    let err = client
        .get(&format!("http://127.0.0.1:{}/", port), HeaderMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MwqueryError::Transport(_)));
    assert!(!cookie_path.exists());
}

// ============================================================================
// Verbs
// ============================================================================

#[tokio::test]
async fn test_head_returns_header_dump() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-request-id", "r-42"))
        .mount(&server)
        .await;

    let client = HttpClient::new(None).unwrap();
    let result = client.head(&server.uri(), HeaderMap::new()).await.unwrap();

    assert!(result.is_success());
    assert!(result.body().lines().any(|line| line == "x-request-id=\"r-42\""));
}

#[tokio::test]
async fn test_post_form_body_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded; charset=utf-8"))
        .and(body_string("user=ann&pass=a%20b"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(None).unwrap();
    let result = client
        .post(
            MediaType::UrlEncoded,
            &format!("{}/login", server.uri()),
            HeaderMap::new(),
            "user=ann&pass=a%20b",
        )
        .await
        .unwrap();
    assert_eq!(result.status(), 201);
}

#[tokio::test]
async fn test_caller_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("accept-api-version", "resource=2.0"))
        .and(header("user-agent", mwquery::client::USER_AGENT_STRING))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("Accept-API-Version", HeaderValue::from_static("resource=2.0"));
    let client = HttpClient::new(None).unwrap();
    assert!(client.get(&server.uri(), headers).await.unwrap().is_success());
}

// ============================================================================
// Cookies
// ============================================================================

#[tokio::test]
async fn test_cookies_persist_across_clients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc123; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cookie_path = dir.path().join("cookies.json");

    let first = HttpClient::new(Some(cookie_path.clone())).unwrap();
    first
        .post(MediaType::Json, &format!("{}/login", server.uri()), HeaderMap::new(), "{}")
        .await
        .unwrap();
    assert!(cookie_path.exists());

    // A separate client only knows the cookie through the file
    let second = HttpClient::new(Some(cookie_path.clone())).unwrap();
    let result = second.get(&format!("{}/me", server.uri()), HeaderMap::new()).await.unwrap();
    assert_eq!(result.status(), 200);
    assert_eq!(result.body(), "welcome");

    let jar = CookieJar::new();
    jar.deserialize(&cookie_path).unwrap();
    let stored = jar.load_for_request("127.0.0.1");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].value, "abc123");
    assert!(stored[0].host_only);
}

#[tokio::test]
async fn test_new_cookies_replace_host_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "first=1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "second=2"))
        .mount(&server)
        .await;

    let client = HttpClient::new(None).unwrap();
    client.get(&format!("{}/a", server.uri()), HeaderMap::new()).await.unwrap();
    client.get(&format!("{}/b", server.uri()), HeaderMap::new()).await.unwrap();

    let stored = client.cookies_for("127.0.0.1").await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "second");
}

#[tokio::test]
async fn test_corrupt_cookie_file_does_not_abort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cookie_path = dir.path().join("cookies.json");
    std::fs::write(&cookie_path, "{ not json").unwrap();

    let client = HttpClient::new(Some(cookie_path.clone())).unwrap();
    let result = client.get(&server.uri(), HeaderMap::new()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.warnings().len(), 1);
    assert_eq!(result.warnings()[0].op, CookieOp::Load);
    assert_eq!(result.warnings()[0].path, cookie_path);
}
