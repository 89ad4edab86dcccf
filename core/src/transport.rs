//! The seam between the client and the network.
//!
//! # Design
//! `Client` never performs I/O itself; it hands each `HttpRequest` to a
//! `Transport` and drains whatever body comes back. `ReqwestTransport` is the
//! default. Tests and embedders plug in their own implementation to script
//! responses or reuse an HTTP stack they already have.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseBody};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Executes one HTTP round trip.
///
/// Implementations must be safe to share between tasks; the client calls
/// `send` concurrently when it is shared.
pub trait Transport: Send + Sync {
    type Body: ResponseBody;

    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse<Self::Body>, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    type Body = T::Body;

    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse<Self::Body>, TransportError>> + Send {
        (**self).send(request)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// `Transport` backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest::Client`.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    type Body = ReqwestBody;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse<ReqwestBody>, TransportError> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = self.client.request(method.into(), url);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Ok(HttpResponse {
            status,
            headers,
            body: ReqwestBody(response),
        })
    }
}

/// Unread body of a `reqwest` response.
#[derive(Debug)]
pub struct ReqwestBody(reqwest::Response);

impl ResponseBody for ReqwestBody {
    async fn read_all(self) -> io::Result<Bytes> {
        self.0.bytes().await.map_err(io::Error::other)
    }
}
