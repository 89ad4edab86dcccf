use std::collections::BTreeMap;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Account, EchoedHeaders, INVALID_KEY_MESSAGE};
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed_get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("API-key", KEY)
        .body(String::new())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_key_is_forbidden_with_text_body() {
    let resp = app(KEY)
        .oneshot(Request::builder().uri("/v1/account/info").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_bytes(resp).await, INVALID_KEY_MESSAGE.as_bytes());
}

#[tokio::test]
async fn wrong_key_is_forbidden() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .uri("/v1/account/info")
                .header("API-key", "nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn header_name_is_case_insensitive() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .uri("/v1/account/info")
                .header("api-key", KEY)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- account ---

#[tokio::test]
async fn account_info_returns_sample() {
    let resp = app(KEY).oneshot(authed_get("/v1/account/info")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let account: Account = body_json(resp).await;
    assert_eq!(account, Account::sample());
}

// --- sentinel ---

#[tokio::test]
async fn empty_returns_bare_array() {
    let resp = app(KEY).oneshot(authed_get("/v1/empty")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "[]".as_bytes());
}

// --- echo ---

#[tokio::test]
async fn echo_returns_form_fields() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/echo")
                .header("API-key", KEY)
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("DCID=1&label=web+1".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fields: BTreeMap<String, String> = body_json(resp).await;
    assert_eq!(fields["DCID"], "1");
    assert_eq!(fields["label"], "web 1");
}

#[tokio::test]
async fn echo_requires_form_content_type() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/echo")
                .header("API-key", KEY)
                .body("DCID=1".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn echo_headers_reports_request_headers() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .uri("/v1/echo-headers")
                .header("API-key", KEY)
                .header(http::header::USER_AGENT, "govultr/0.1.0")
                .header(http::header::ACCEPT, "application/json")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let echoed: EchoedHeaders = body_json(resp).await;
    assert_eq!(echoed.user_agent.as_deref(), Some("govultr/0.1.0"));
    assert_eq!(echoed.accept.as_deref(), Some("application/json"));
    assert!(echoed.content_type.is_none());
}

// --- failures ---

#[tokio::test]
async fn broken_returns_500_text() {
    let resp = app(KEY).oneshot(authed_get("/v1/broken")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_bytes(resp).await, "internal failure".as_bytes());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app(KEY).oneshot(authed_get("/v1/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
