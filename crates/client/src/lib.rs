//! A client for the zenflows token ledger.
//!
//! Note the calls block. This is a hint to the caller that if the client
//! is used in an async context, the calls should be treated as blocking
//! operations.

#![deny(missing_docs)]

use url::Url;
use zenwallet_api::*;

/// Default timeout applied to ledger calls.
pub const DEFAULT_TIMEOUT: std::time::Duration =
    std::time::Duration::from_secs(30);

/// A client for one token ledger.
///
/// Decoded responses are handed back as-is. The ledger reports application
/// failures with http status 200 and `success: false`; interpreting that
/// flag is the caller's business, as is retrying. Transport failures,
/// non-2xx statuses and undecodable bodies are [WalletError::Http].
#[derive(Clone)]
pub struct LedgerClient {
    server_url: String,
    agent: ureq::Agent,
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl LedgerClient {
    /// Construct a client with [DEFAULT_TIMEOUT].
    pub fn new(server_url: Url) -> Self {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    /// Construct a client with a caller-supplied timeout, applied to the
    /// whole of each call.
    pub fn with_timeout(
        server_url: Url,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            server_url: server_url
                .as_str()
                .trim_end_matches('/')
                .to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Submit a signed token transaction: `POST {base}/token`.
    ///
    /// The request body is the serialized [AddTokens]; `auth` supplies the
    /// signature and identity headers covering that body.
    pub fn add_tokens(
        &self,
        request: &AddTokens,
        auth: &AuthHeaders,
    ) -> WalletResult<AddTokensResponse> {
        let url = format!("{}/token", self.server_url);
        let body = serde_json::to_string(request).map_err(|e| {
            WalletError::http_src("encoding add_tokens request", e)
        })?;
        let mut req = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json");
        for (name, value) in auth.header_pairs() {
            req = req.set(name, value);
        }
        tracing::debug!(%url, "submitting token transaction");
        let encoded = req
            .send_string(&body)
            .map_err(|e| {
                WalletError::http_src("Failed to post token transaction", e)
            })?
            .into_string()
            .map_err(WalletError::http)?;
        decode_response(&encoded)
    }

    /// Get the balance of one token for one owner:
    /// `GET {base}/token/{token}/{owner}`.
    ///
    /// With `until`, only transactions recorded at or before that instant
    /// count toward the balance.
    pub fn balance(
        &self,
        token: &str,
        owner: &str,
        until: Option<Timestamp>,
    ) -> WalletResult<BalanceResponse> {
        let url = format!("{}/token/{}/{}", self.server_url, token, owner);
        let mut req = self.agent.get(&url);
        if let Some(until) = until {
            req = req.query("until", &until.as_millis().to_string());
        }
        tracing::debug!(%url, "fetching balance");
        let encoded = req
            .call()
            .map_err(WalletError::http)?
            .into_string()
            .map_err(WalletError::http)?;
        decode_response(&encoded)
    }

    /// Get the last `count` transactions of one token for one owner:
    /// `GET {base}/token/{token}/{owner}/last/{count}`.
    pub fn last_transactions(
        &self,
        token: &str,
        owner: &str,
        count: usize,
    ) -> WalletResult<TransactionsResponse> {
        let url = format!(
            "{}/token/{}/{}/last/{}",
            self.server_url, token, owner, count,
        );
        tracing::debug!(%url, "fetching transactions");
        let encoded = self
            .agent
            .get(&url)
            .call()
            .map_err(WalletError::http)?
            .into_string()
            .map_err(WalletError::http)?;
        decode_response(&encoded)
    }
}

fn decode_response<T: serde::de::DeserializeOwned>(
    encoded: &str,
) -> WalletResult<T> {
    serde_json::from_str(encoded)
        .map_err(|e| WalletError::http_src("decoding ledger response", e))
}
