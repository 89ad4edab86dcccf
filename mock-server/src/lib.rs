use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const API_KEY_HEADER: &str = "API-key";
pub const INVALID_KEY_MESSAGE: &str = "Invalid API key";
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub balance: String,
    pub pending_charges: String,
    pub last_payment_date: String,
    pub last_payment_amount: String,
}

impl Account {
    pub fn sample() -> Self {
        Self {
            balance: "-5519.11".to_string(),
            pending_charges: "57.03".to_string(),
            last_payment_date: "2014-07-18 15:31:01".to_string(),
            last_payment_amount: "-1.00".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoedHeaders {
    pub user_agent: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
    };
    Router::new()
        .route("/v1/account/info", get(account_info))
        .route("/v1/empty", get(empty))
        .route("/v1/echo", post(echo_form))
        .route("/v1/echo-headers", get(echo_headers))
        .route("/v1/slow", get(slow))
        .route("/v1/broken", get(broken))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if provided != Some(&*state.api_key) {
        tracing::debug!(path = %request.uri().path(), "rejected request with bad API key");
        return (StatusCode::FORBIDDEN, INVALID_KEY_MESSAGE).into_response();
    }
    next.run(request).await
}

async fn account_info() -> Json<Account> {
    Json(Account::sample())
}

async fn empty() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "[]")
}

async fn echo_form(Form(fields): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(fields)
}

async fn echo_headers(headers: HeaderMap) -> Json<EchoedHeaders> {
    let value_of = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(EchoedHeaders {
        user_agent: value_of(header::USER_AGENT),
        accept: value_of(header::ACCEPT),
        content_type: value_of(header::CONTENT_TYPE),
    })
}

async fn slow() -> Json<Account> {
    tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
    Json(Account::sample())
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal failure")
}
