//! Table transfer / order merge payloads

use serde::{Deserialize, Serialize};

use super::order::Order;

/// Move the open order of one table to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableTransfer {
    pub from_table_id: i64,
    pub to_table_id: i64,
    /// `Some(true)` frees the source table; otherwise it needs cleaning
    #[serde(default)]
    pub mark_source_as_clean: Option<bool>,
}

/// Result of a transfer request
///
/// `MergeRequired` is a normal outcome: the destination already has an
/// order in progress and nothing was changed. The client may follow up
/// with a merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferOutcome {
    Transferred {
        order_id: i64,
        from_table_id: i64,
        to_table_id: i64,
        message: String,
    },
    MergeRequired {
        source_order_id: i64,
        target_order_id: i64,
        message: String,
    },
}

/// Fold the source order into the target order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMerge {
    pub source_order_id: i64,
    pub target_order_id: i64,
    pub source_table_id: i64,
}

/// Result of a merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub target_order: Order,
    pub merged_lines: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_required_is_tagged() {
        let outcome = TransferOutcome::MergeRequired {
            source_order_id: 3,
            target_order_id: 9,
            message: "merge".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "MERGE_REQUIRED");
        assert_eq!(json["target_order_id"], 9);
    }

    #[test]
    fn test_transfer_defaults_clean_flag() {
        let t: TableTransfer =
            serde_json::from_str(r#"{"from_table_id":1,"to_table_id":2}"#).unwrap();
        assert_eq!(t.mark_source_as_clean, None);
    }
}
