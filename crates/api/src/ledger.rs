//! Wire shapes for the token ledger http api.
//!
//! The ledger exposes three operations:
//!
//! - `POST {base}/token` -- submit a signed [AddTokens] transaction.
//! - `GET {base}/token/{token}/{owner}` -- current balance, optionally
//!   bounded by an `until` epoch-milliseconds query parameter.
//! - `GET {base}/token/{token}/{owner}/last/{n}` -- the last `n`
//!   transactions.
//!
//! Responses arrive with http status 200 even for application failures;
//! the `success` flag and optional `error` string carry the app-level
//! outcome. Interpreting them is the caller's business, these types only
//! give the outcome a shape.

/// `POST /token` request body: credit `amount` of `token` to `owner`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AddTokens {
    /// The token kind, e.g. `"idea"` or `"strength"`.
    pub token: String,

    /// Amount to credit. Negative amounts debit.
    pub amount: i64,

    /// The owner account to credit.
    pub owner: String,
}

/// Receipt for a submitted [AddTokens] transaction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AddTokensResponse {
    /// Whether the ledger accepted the transaction.
    pub success: bool,

    /// Ledger-side failure description, set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Balance query response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BalanceResponse {
    /// Whether the query succeeded.
    pub success: bool,

    /// Ledger-side failure description, set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The balance, summed over transactions in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

/// One ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    /// Ledger-assigned transaction id.
    pub id: u64,

    /// When the ledger recorded the transaction, epoch milliseconds.
    pub timestamp: u64,

    /// The credited (or debited, if negative) amount.
    pub amount: i64,
}

/// Transaction history response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionsResponse {
    /// Whether the query succeeded.
    pub success: bool,

    /// Ledger-side failure description, set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The transactions, most recent first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txs: Option<Vec<Transaction>>,
}
