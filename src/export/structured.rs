//! Structured-text (JSON) rendition preserving the full record shape.

use crate::models::Transaction;

/// Serializes the complete transaction sequence as indented JSON.
///
/// No column projection happens here: every field of every record is
/// emitted, in declaration order, with 2-space indentation. Fields the API
/// left absent appear as `null`. The empty sequence yields `[]`.
pub fn to_structured_text(transactions: &[Transaction]) -> String {
    serde_json::to_string_pretty(transactions).expect("transaction records always serialize to JSON")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn trade() -> Transaction {
        serde_json::from_value(json!({
            "date": "2024-03-01T12:00:00Z",
            "type": "exchange",
            "label": "swap",
            "from": {
                "wallet": { "name": "Exchange" },
                "amount": "1.25",
                "currency": { "symbol": "ETH", "id": 3, "type": "crypto" },
            },
            "to": {
                "amount": 2000.5,
                "currency": { "symbol": "USDC", "id": 9, "type": "crypto" },
            },
            "gain": "15.75",
            "cost_basis_method": "FIFO",
        }))
        .unwrap()
    }

    #[test]
    fn empty_sequence_yields_empty_collection() {
        assert_eq!(to_structured_text(&[]), "[]");
    }

    #[test]
    fn records_keep_declared_field_order() {
        let document = to_structured_text(&[trade()]);

        let date_at = document.find("\"date\"").unwrap();
        let type_at = document.find("\"type\"").unwrap();
        let from_at = document.find("\"from\"").unwrap();
        let to_at = document.find("\"to\"").unwrap();
        let txhash_at = document.find("\"txhash\"").unwrap();
        assert!(date_at < type_at && type_at < from_at && from_at < to_at && to_at < txhash_at);
    }

    #[test]
    fn absent_fields_serialize_as_null_not_text() {
        let document = to_structured_text(&[trade()]);
        assert!(document.contains("\"fee\": null"));
        assert!(!document.contains("\"null\""));
    }

    #[test]
    fn numerals_round_trip_in_their_wire_form() {
        // String decimals stay quoted, numeric decimals stay bare.
        let document = to_structured_text(&[trade()]);
        assert!(document.contains("\"amount\": \"1.25\""));
        assert!(document.contains("\"amount\": 2000.5"));
        assert!(document.contains("\"gain\": \"15.75\""));
    }

    #[test]
    fn indentation_is_two_spaces() {
        let document = to_structured_text(&[trade()]);
        let second_line = document.lines().nth(1).unwrap();
        assert!(second_line.starts_with("  {"));
        let third_line = document.lines().nth(2).unwrap();
        assert!(third_line.starts_with("    \"date\""));
    }

    #[test]
    fn serialization_is_idempotent() {
        let transactions = vec![trade(), trade()];
        assert_eq!(
            to_structured_text(&transactions),
            to_structured_text(&transactions)
        );
    }

    #[test]
    fn full_shape_survives_a_round_trip() {
        let original = vec![trade()];
        let document = to_structured_text(&original);
        let reparsed: Vec<Transaction> = serde_json::from_str(&document).unwrap();
        assert_eq!(reparsed, original);
    }
}
