//! Delimited-text (CSV) rendition of a transaction history.
//!
//! The column schema is fixed and ordered. Every column is a
//! `(header, extractor)` pair so adding a column can never reorder the
//! existing ones. Extractors return `Option<String>`; an absent value of
//! any kind renders as the empty string, never as literal null text.

use chrono::SecondsFormat;

use crate::models::{Transaction, TransactionSide};

/// One column of the delimited-text schema.
struct Column {
    header: &'static str,
    extract: fn(&Transaction, &str) -> Option<String>,
}

/// The canonical column schema, in output order. Extractors receive the
/// transaction and the portfolio base currency symbol.
const COLUMNS: &[Column] = &[
    Column { header: "Date", extract: |t, _| Some(t.date.to_rfc3339_opts(SecondsFormat::AutoSi, true)) },
    Column { header: "Transaction Type", extract: |t, _| Some(t.transaction_type.clone()) },
    Column { header: "Label", extract: |t, _| t.label.clone() },
    Column { header: "Ignored?", extract: |t, _| flag(t.ignored) },
    Column { header: "Ign. Reason", extract: |t, _| t.ignored_reason.clone() },
    Column { header: "F(From)_Wallet", extract: |t, _| side_wallet(&t.from) },
    Column { header: "F_Source", extract: |t, _| side_source(&t.from) },
    Column { header: "T(To)_Wallet", extract: |t, _| side_wallet(&t.to) },
    Column { header: "T_Source", extract: |t, _| side_source(&t.to) },
    Column { header: "F_Amount", extract: |t, _| side_amount(&t.from) },
    Column { header: "F_Cur", extract: |t, _| side_currency_symbol(&t.from) },
    Column { header: "F_Cur ID", extract: |t, _| side_currency_id(&t.from) },
    Column { header: "F_Cur Type", extract: |t, _| side_currency_type(&t.from) },
    Column { header: "F_Cost Basis", extract: |t, _| side_cost_basis(&t.from) },
    Column { header: "F_Cost Basis Cur", extract: |t, base| denominate(side_has_cost_basis(&t.from), base) },
    Column { header: "T_Amount", extract: |t, _| side_amount(&t.to) },
    Column { header: "T_Cur", extract: |t, _| side_currency_symbol(&t.to) },
    Column { header: "T_Cur ID", extract: |t, _| side_currency_id(&t.to) },
    Column { header: "T_Cur Type", extract: |t, _| side_currency_type(&t.to) },
    Column { header: "T_Cost Basis", extract: |t, _| side_cost_basis(&t.to) },
    Column { header: "T_Cost Basis Cur", extract: |t, base| denominate(side_has_cost_basis(&t.to), base) },
    Column { header: "Fee Amount", extract: |t, _| side_amount(&t.fee) },
    Column { header: "Fee Cur", extract: |t, _| side_currency_symbol(&t.fee) },
    Column { header: "Fee Cur ID", extract: |t, _| side_currency_id(&t.fee) },
    Column { header: "Fee Cur Type", extract: |t, _| side_currency_type(&t.fee) },
    Column { header: "Fee Value", extract: |t, _| fee_value(t) },
    Column { header: "Fee Value Cur", extract: |t, base| denominate(t.fee.is_some() && t.fee_value.is_some(), base) },
    Column { header: "Net Worth Amount", extract: |t, _| t.net_value.as_ref().map(ToString::to_string) },
    Column { header: "Net Worth Cur", extract: |t, base| denominate(t.net_value.is_some(), base) },
    Column { header: "Gain", extract: |t, _| t.gain.as_ref().map(ToString::to_string) },
    Column { header: "Gain Cur", extract: |t, base| denominate(t.gain.is_some(), base) },
    Column { header: "Cost Basis Method", extract: |t, _| Some(t.cost_basis_method.clone()) },
    Column { header: "Manual?", extract: |t, _| flag(t.manual) },
    Column { header: "Missing Rates?", extract: |t, _| flag(t.missing_rates) },
    Column { header: "Missing Cost Basis?", extract: |t, _| flag(t.missing_cost_basis) },
    Column { header: "Description", extract: |t, _| t.description.clone() },
    Column { header: "TxHash", extract: |t, _| t.txhash.clone() },
];

/// Renders a boolean flag the way the source data reads: only an explicit
/// `true` produces output.
fn flag(value: Option<bool>) -> Option<String> {
    match value {
        Some(true) => Some("true".to_string()),
        _ => None,
    }
}

fn side_wallet(side: &Option<TransactionSide>) -> Option<String> {
    side.as_ref()?.wallet.as_ref().map(|w| w.name.clone())
}

fn side_source(side: &Option<TransactionSide>) -> Option<String> {
    side.as_ref()?.source.clone()
}

fn side_amount(side: &Option<TransactionSide>) -> Option<String> {
    side.as_ref()?.amount.as_ref().map(ToString::to_string)
}

fn side_currency_symbol(side: &Option<TransactionSide>) -> Option<String> {
    side.as_ref()?.currency.as_ref().map(|c| c.symbol.clone())
}

fn side_currency_id(side: &Option<TransactionSide>) -> Option<String> {
    side.as_ref()?.currency.as_ref().map(|c| c.id.to_string())
}

fn side_currency_type(side: &Option<TransactionSide>) -> Option<String> {
    side.as_ref()?.currency.as_ref().and_then(|c| c.currency_type.clone())
}

fn side_cost_basis(side: &Option<TransactionSide>) -> Option<String> {
    side.as_ref()?.cost_basis.as_ref().map(ToString::to_string)
}

fn side_has_cost_basis(side: &Option<TransactionSide>) -> bool {
    side.as_ref().is_some_and(|s| s.cost_basis.is_some())
}

/// The fee's fiat value lives on the transaction itself, but is only
/// meaningful when a fee side exists.
fn fee_value(t: &Transaction) -> Option<String> {
    if t.fee.is_some() {
        t.fee_value.as_ref().map(ToString::to_string)
    } else {
        None
    }
}

/// A denomination column prints the base currency only when its paired
/// amount field is present. Presence means the field is not null; a zero
/// amount still gets its denomination.
fn denominate(amount_present: bool, base_currency: &str) -> Option<String> {
    amount_present.then(|| base_currency.to_string())
}

/// Escapes one field per RFC 4180: quote when the field contains a comma,
/// a double quote or either newline variant, doubling embedded quotes.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Renders the transaction sequence as an RFC 4180 document with the fixed
/// column schema, `\n` row separators and no trailing separator. The empty
/// sequence yields the header row alone.
pub fn to_delimited_text(base_currency: &str, transactions: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(transactions.len() + 1);

    let header = COLUMNS.iter().map(|c| c.header).collect::<Vec<_>>().join(",");
    lines.push(header);

    for transaction in transactions {
        let row = COLUMNS
            .iter()
            .map(|column| escape_field(&(column.extract)(transaction, base_currency).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    lines.join("\n")
}
