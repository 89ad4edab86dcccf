//! Account endpoints.

use crate::client::Client;
use crate::context::Context;
use crate::error::Error;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::Account;

const ACCOUNT_INFO_PATH: &str = "/v1/account/info";

/// Access to `/v1/account/*`, obtained from `Client::account`.
#[derive(Debug)]
pub struct AccountService<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> AccountService<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Fetch the account's balance and payment summary.
    ///
    /// An empty answer from the API yields `Account::default()`.
    pub async fn info(&self, ctx: &Context) -> Result<Account, Error> {
        let request = self.client.build(HttpMethod::Get, ACCOUNT_INFO_PATH, None)?;
        let mut account = Account::default();
        self.client.execute(ctx, request, Some(&mut account)).await?;
        Ok(account)
    }
}
