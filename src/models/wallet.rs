use serde::{Deserialize, Serialize};

/// A named account container whose transactions can be queried
/// independently. The wallet list is fetched once per run, in API page
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub name: String,
}

/// Per-run session state, derived from the first authenticated call and
/// immutable for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Reporting currency used to denominate the cost-basis, fee-value,
    /// net-worth and gain columns.
    pub base_currency: String,
}
