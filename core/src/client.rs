//! Request construction, dispatch, and response decoding.
//!
//! # Design
//! `Client` holds only configuration (transport, base URL, user agent, API
//! key) and carries no mutable state between calls. Each call is split into
//! `build`, which produces an authenticated `HttpRequest` without touching the
//! network, and `execute`, which performs exactly one round trip on the
//! injected transport. The status/body decision lives in `decode_response` so
//! it stays deterministic and testable without I/O.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument, Span};
use url::Url;

use crate::account::AccountService;
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{ApiError, ConfigError, Error};
use crate::http::{Form, HttpMethod, HttpRequest, ResponseBody};
use crate::transport::{ReqwestTransport, Transport};

pub const DEFAULT_BASE_URL: &str = "https://api.vultr.com";
pub const DEFAULT_USER_AGENT: &str = concat!("govultr/", env!("CARGO_PKG_VERSION"));
pub const API_KEY_HEADER: &str = "API-key";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body the API sends instead of an object when there is nothing to return.
const EMPTY_RESULT: &[u8] = b"[]";

/// A Vultr API key. Never printed.
#[derive(Clone)]
pub struct ApiKey(Arc<SecretString>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::new(SecretString::from(key.into())))
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ApiKey::new)
    }
}

/// Builder for configuring a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder<T> {
    transport: T,
    base_url: Option<Url>,
    user_agent: String,
    api_key: Option<ApiKey>,
}

impl<T: Transport> ClientBuilder<T> {
    fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_key: None,
        }
    }

    /// Override the endpoint every request path is resolved against.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Parse` if `base_url` is not an absolute URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, Error> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// ## Errors
    ///
    /// Returns `ConfigError::MissingApiKey` when no key, or an empty one, was supplied.
    pub fn build(self) -> Result<Client<T>, Error> {
        let api_key = self
            .api_key
            .filter(|key| !key.expose().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        Ok(Client {
            transport: self.transport,
            base_url,
            user_agent: self.user_agent,
            api_key,
        })
    }
}

/// Client for the Vultr API.
///
/// Configuration is fixed at construction. Cloning is cheap when the
/// transport is, and a client can be shared across tasks when its transport
/// can.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestTransport> {
    transport: T,
    base_url: Url,
    user_agent: String,
    api_key: ApiKey,
}

impl Client<ReqwestTransport> {
    /// Build a client with a `reqwest` transport from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let transport = ReqwestTransport::with_timeout(config.timeout())?;
        Client::builder(transport)
            .base_url(&config.base_url)?
            .user_agent(config.user_agent.clone())
            .api_key(config.api_key.clone())
            .build()
    }
}

impl<T: Transport> Client<T> {
    /// Client against the default endpoint with the default user agent.
    pub fn new(transport: T, api_key: impl Into<ApiKey>) -> Result<Self, Error> {
        Self::builder(transport).api_key(api_key).build()
    }

    pub fn builder(transport: T) -> ClientBuilder<T> {
        ClientBuilder::new(transport)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn account(&self) -> AccountService<'_, T> {
        AccountService::new(self)
    }

    /// Build an authenticated request for `path` resolved against the base URL.
    ///
    /// `params`, when given, is form-encoded into the request body. POST
    /// requests additionally declare the form content type.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Parse` if `path` is not a valid URL reference.
    pub fn build(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&Form>,
    ) -> Result<HttpRequest, Error> {
        let url = self.base_url.join(path)?;
        let body = params.map(Form::encode);

        let mut headers = vec![
            (API_KEY_HEADER.to_string(), self.api_key.expose().to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if method == HttpMethod::Post {
            headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
        }

        Ok(HttpRequest::new(method, url, headers, body))
    }

    /// Send `request` and decode a successful answer into `destination`.
    ///
    /// The round trip and the body read are both abandoned as soon as `ctx`
    /// ends. The response body is released before this returns, whatever the
    /// outcome.
    ///
    /// ## Errors
    ///
    /// - `Error::Transport` if the round trip fails or `ctx` ends first
    /// - `Error::Io` if the body cannot be read
    /// - `Error::Decode` if a 200 body does not fit `D`
    /// - `Error::Api` carrying the raw body for any other status
    #[instrument(
        name = "vultr_request",
        skip_all,
        fields(
            http.method = %request.method(),
            http.url = %request.url(),
            http.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute<D>(
        &self,
        ctx: &Context,
        request: HttpRequest,
        destination: Option<&mut D>,
    ) -> Result<(), Error>
    where
        D: DeserializeOwned,
    {
        let response = ctx.run(self.transport.send(request)).await??;

        let status = response.status;
        Span::current().record("http.status_code", status);

        let body = ctx.run(response.body.read_all()).await??;
        decode_response(status, &body, destination)
    }

    /// Send `request` when only success or failure matters.
    pub async fn send(&self, ctx: &Context, request: HttpRequest) -> Result<(), Error> {
        self.execute::<IgnoredAny>(ctx, request, None).await
    }
}

/// Apply the response policy to a fully read body.
///
/// - 200 with a destination: `[]` leaves the destination untouched, anything
///   else is decoded as JSON into it.
/// - 200 without a destination: success.
/// - any other status: `ApiError` whose message is the body text.
pub fn decode_response<D>(status: u16, body: &[u8], destination: Option<&mut D>) -> Result<(), Error>
where
    D: DeserializeOwned,
{
    if status != 200 {
        return Err(ApiError {
            status,
            message: String::from_utf8_lossy(body).into_owned(),
        }
        .into());
    }

    let Some(destination) = destination else {
        return Ok(());
    };

    if body == EMPTY_RESULT {
        debug!("empty result, destination left unchanged");
        return Ok(());
    }

    debug!(bytes = body.len(), "decoding response body");
    *destination = serde_json::from_slice(body)?;
    Ok(())
}
