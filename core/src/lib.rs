//! Client library for the Vultr REST API.
//!
//! # Overview
//! A call is two steps: `Client::build` resolves a path against the base URL
//! and produces an authenticated `HttpRequest`; `Client::execute` sends it
//! through the injected `Transport` under a cancellation `Context` and decodes
//! the answer into a caller-supplied destination.
//!
//! # Design
//! - `Client` holds only configuration fixed at construction, so several
//!   clients with different endpoints or keys can coexist.
//! - The network sits behind the `Transport` trait; `ReqwestTransport` is the
//!   default and tests script their own.
//! - Exactly one round trip per call. No retries, throttling, or pagination.
//! - A 200 answer of `[]` means "nothing here" and leaves the destination as
//!   it was.
//!
//! ```rust,ignore
//! use govultr::{Client, Context, ReqwestTransport};
//!
//! let client = Client::new(ReqwestTransport::new()?, "my-api-key")?;
//! let account = client.account().info(&Context::background()).await?;
//! println!("balance: {}", account.balance);
//! ```

pub mod account;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use account::AccountService;
pub use client::{decode_response, ApiKey, Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use config::ClientConfig;
pub use context::Context;
pub use error::{ApiError, ConfigError, Error, TransportError};
pub use http::{Form, HttpMethod, HttpRequest, HttpResponse, ResponseBody};
pub use transport::{ReqwestBody, ReqwestTransport, Transport};
pub use types::Account;
