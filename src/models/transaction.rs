use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque numeral passed through from the API.
///
/// Amounts, cost bases and gains arrive either as JSON numbers or as quoted
/// decimal strings depending on the endpoint and record age. The exporter
/// never does arithmetic on them, so both forms are kept verbatim and
/// re-serialized unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Decimal {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decimal::Number(n) => write!(f, "{}", n),
            Decimal::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Wallet reference embedded in a transaction side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideWallet {
    pub name: String,
}

/// Currency attached to a transaction side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideCurrency {
    pub symbol: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub currency_type: Option<String>,
}

/// One leg of a transaction.
///
/// A transaction may populate any subset of its from/to/fee sides: a
/// deposit has only `to`, a trade has `from` and `to`, a withdrawal may
/// additionally carry `fee`. Every field of a side is itself optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSide {
    pub wallet: Option<SideWallet>,
    pub amount: Option<Decimal>,
    pub currency: Option<SideCurrency>,
    pub cost_basis: Option<Decimal>,
    pub source: Option<String>,
}

/// A single ledger entry as returned by the transactions endpoint.
///
/// Records are immutable once fetched; the serializers only read them.
/// Field order is load-bearing: the structured-text export emits keys in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub label: Option<String>,
    pub ignored: Option<bool>,
    pub ignored_reason: Option<String>,
    pub from: Option<TransactionSide>,
    pub to: Option<TransactionSide>,
    pub fee: Option<TransactionSide>,
    pub fee_value: Option<Decimal>,
    pub net_value: Option<Decimal>,
    pub gain: Option<Decimal>,
    pub cost_basis_method: String,
    pub manual: Option<bool>,
    pub missing_rates: Option<bool>,
    pub missing_cost_basis: Option<bool>,
    pub description: Option<String>,
    pub txhash: Option<String>,
}
