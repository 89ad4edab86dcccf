//! Domain DTOs for the Vultr API.
//!
//! # Design
//! The API reports monetary amounts and dates as strings; they are kept as
//! strings here rather than reinterpreted. These types mirror the
//! mock-server's schema but are defined independently so integration tests
//! catch drift between the two crates.

use serde::{Deserialize, Serialize};

/// Billing summary returned by `/v1/account/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: String,
    pub pending_charges: String,
    pub last_payment_date: String,
    pub last_payment_amount: String,
}
