//! Integration tests for the reqwest transport using mockito

use std::sync::Arc;

use mockito::Matcher;
use rest_service::{
    ClientConfig, HeaderEntry, Headers, HttpError, Method, ReqwestTransport, RequestError,
    RequestOptions, RestConfig, RestRegistry, Transport, DEFAULT_TIMEOUT_MS,
};
use serde_json::json;

fn options(url: String, method: Method) -> RequestOptions {
    RequestOptions::build(&url, "", method, None, None, DEFAULT_TIMEOUT_MS)
}

#[tokio::test]
async fn test_json_body_and_headers() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/submit")
        .match_header("content-type", "application/json")
        .match_header("x-forwarded-for", "10.0.0.1")
        .match_body(Matcher::Json(json!({"name": "test", "value": 42})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let mut request = options(format!("{}/api/submit", server.url()), Method::Post);
    request.body = Some(json!({"name": "test", "value": 42}));
    request.headers = Some(Headers::from([(
        "x-forwarded-for".to_string(),
        "10.0.0.1".to_string(),
    )]));

    let response = ReqwestTransport::new()
        .request(&request)
        .await
        .expect("request should succeed");

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, json!({"success": true}));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_multipart_form_data() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/upload")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="title""#.to_string()),
            Matcher::Regex("report".to_string()),
            Matcher::Regex(r#"name="pages""#.to_string()),
        ]))
        .with_status(201)
        .create_async()
        .await;

    let request = RequestOptions::build(
        &server.url(),
        "/upload",
        Method::Post,
        Some(json!({"formData": {"title": "report", "pages": 3}})),
        None,
        DEFAULT_TIMEOUT_MS,
    );

    let response = ReqwestTransport::new()
        .request(&request)
        .await
        .expect("request should succeed");

    assert_eq!(response.status_code, 201);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let response = ReqwestTransport::new()
        .request(&options(format!("{}/missing", server.url()), Method::Get))
        .await
        .expect("transport call should succeed");

    assert_eq!(response.status_code, 404);
    assert_eq!(response.body, json!("Not Found"));
    assert!(response.is_error());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused() {
    let result = ReqwestTransport::new()
        .request(&options("http://127.0.0.1:1/".to_string(), Method::Get))
        .await;

    assert!(matches!(
        result,
        Err(HttpError::Connection(_)) | Err(HttpError::Other(_))
    ));
}

#[tokio::test]
async fn test_registry_client_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let ok = server
        .mock("GET", "/reviews")
        .match_header("x-forwarded-for", "HeaderValue")
        .match_header("blacklist", Matcher::Missing)
        .match_header("x-client", "reviews")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1}]"#)
        .create_async()
        .await;

    let bad = server
        .mock("POST", "/reviews")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "rating required"}"#)
        .create_async()
        .await;

    let registry = RestRegistry::from_config(
        Arc::new(ReqwestTransport::new()),
        RestConfig {
            default_headers: vec!["x-forwarded-for".to_string()],
            clients: vec![ClientConfig::new("reviews", server.url()).with_header(
                HeaderEntry::Values(
                    [(
                        "x-client".to_string(),
                        rest_service::HeaderValue::String("reviews".to_string()),
                    )]
                    .into(),
                ),
            )],
        },
    )
    .expect("valid config");

    let caller = Headers::from([
        ("x-forwarded-for".to_string(), "HeaderValue".to_string()),
        ("blacklist".to_string(), "xxxxxxx".to_string()),
    ]);
    let client = registry.client("reviews", Some(&caller)).expect("registered");

    let response = client.get("/reviews").await.expect("success");
    assert_eq!(response.body, json!([{"id": 1}]));

    let error = client
        .post("/reviews", Some(json!({})))
        .await
        .expect_err("422 should fail");
    match error {
        RequestError::Operational(err) => {
            assert!(err.is_operational());
            assert_eq!(err.status_code, 422);
            assert_eq!(err.body, json!({"error": "rating required"}));
        }
        RequestError::Transport(err) => panic!("Expected operational error, got {}", err),
    }

    ok.assert_async().await;
    bad.assert_async().await;
}

#[tokio::test]
async fn test_timeout_from_options() {
    // accepted by the kernel backlog, never answered
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let addr = listener.local_addr().expect("local addr");

    let request = RequestOptions::build(
        &format!("http://{}", addr),
        "/slow",
        Method::Get,
        None,
        None,
        200,
    );

    let result = ReqwestTransport::new().request(&request).await;

    assert!(matches!(result, Err(HttpError::Timeout)));
    drop(listener);
}

#[tokio::test]
async fn test_non_json_body_sent_as_text() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("PUT", "/notes/1")
        .match_header("content-type", Matcher::Missing)
        .match_body(Matcher::Exact("plain note".to_string()))
        .with_status(204)
        .create_async()
        .await;

    let mut request = options(format!("{}/notes/1", server.url()), Method::Put);
    request.json = None;
    request.body = Some(json!("plain note"));

    let response = ReqwestTransport::new()
        .request(&request)
        .await
        .expect("request should succeed");

    assert_eq!(response.status_code, 204);
    assert_eq!(response.body, serde_json::Value::Null);

    mock.assert_async().await;
}
