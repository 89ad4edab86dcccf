//! Error types for the Vultr API client.
//!
//! # Design
//! One top-level `Error` with a variant per failure stage of a call: building
//! the URL, the network round trip, reading the body, decoding JSON, and a
//! non-success answer from the API. Every variant carries the underlying
//! error's text unchanged; nothing is retried or enriched on the way out.

use std::num::ParseIntError;

/// Errors returned by `Client` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request path or base URL is not a valid URL reference.
    #[error(transparent)]
    Parse(#[from] url::ParseError),

    /// The round trip did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A success response did not match the destination's shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The client was configured without a usable API key or settings.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A non-success answer from the API.
///
/// The API reports failures as free-form text in the body, so the message is
/// that body verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

/// Failures of the network round trip itself.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure reported by a caller-supplied transport.
    #[error("{0}")]
    Request(String),
}

impl TransportError {
    /// True when the call was abandoned because its context ended.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Problems assembling client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no API key configured (set VULTR_API_KEY)")]
    MissingApiKey,

    #[error("invalid VULTR_TIMEOUT_SECS {value:?}: {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: ParseIntError,
    },
}
