//! HTTP transport types exchanged between the client and its transport.
//!
//! # Design
//! Requests and responses are described as plain data. The client builds
//! `HttpRequest` values and decodes `HttpResponse` values; the injected
//! `Transport` is the only piece that touches the network. A response body is
//! anything implementing `ResponseBody`, so a transport can hand back a live
//! network stream or an in-memory buffer.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::io;

use bytes::Bytes;
use strum::{Display, EnumIter, EnumString};
use url::form_urlencoded;
use url::Url;

use crate::client::API_KEY_HEADER;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

/// A fully built, authenticated request.
///
/// Produced by `Client::build` and consumed exactly once by
/// `Client::execute`. Fields are read-only after construction.
pub struct HttpRequest {
    method: HttpMethod,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl HttpRequest {
    pub(crate) fn new(
        method: HttpMethod,
        url: Url,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive lookup of the first header named `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Split the request into owned parts for handing to an HTTP library.
    pub fn into_parts(self) -> (HttpMethod, Url, Vec<(String, String)>, Option<String>) {
        (self.method, self.url, self.headers, self.body)
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case(API_KEY_HEADER) {
                    (key.as_str(), "[REDACTED]")
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

/// A response body that can be drained into memory once.
///
/// Consuming `self` means the body is released as soon as reading finishes,
/// fails, or the read future is dropped.
pub trait ResponseBody: Send {
    fn read_all(self) -> impl Future<Output = io::Result<Bytes>> + Send;
}

impl ResponseBody for Bytes {
    async fn read_all(self) -> io::Result<Bytes> {
        Ok(self)
    }
}

impl ResponseBody for Vec<u8> {
    async fn read_all(self) -> io::Result<Bytes> {
        Ok(Bytes::from(self))
    }
}

impl ResponseBody for String {
    async fn read_all(self) -> io::Result<Bytes> {
        Ok(Bytes::from(self))
    }
}

impl ResponseBody for &'static str {
    async fn read_all(self) -> io::Result<Bytes> {
        Ok(Bytes::from_static(self.as_bytes()))
    }
}

/// An HTTP response as returned by a `Transport`.
#[derive(Debug)]
pub struct HttpResponse<B> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: B,
}

impl<B> HttpResponse<B> {
    pub fn new(status: u16, body: B) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }
}

/// Form fields sent as an `application/x-www-form-urlencoded` body.
///
/// Keys are kept sorted and each key may carry several values, so encoding is
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: BTreeMap<String, Vec<String>>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(key.into(), vec![value.into()]);
        self
    }

    /// Append `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.entry(key.into()).or_default().push(value.into());
        self
    }

    /// First value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.fields {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Form
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Form::new();
        for (key, value) in iter {
            form.add(key, value);
        }
        form
    }
}
