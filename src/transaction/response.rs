use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::entity_id::AccountId;
use crate::error::Result;
use crate::query::{TransactionReceipt, TransactionReceiptQuery};
use crate::transaction_id::TransactionId;

/// What the engine reports once a transaction is accepted for consensus.
///
/// Acceptance says nothing about the outcome; fetch the receipt for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// The node the transaction was submitted to.
    pub node_account_id: AccountId,

    /// The ID the transaction was submitted under.
    pub transaction_id: TransactionId,

    /// Hex-encoded hash of the signed transaction.
    pub transaction_hash: String,
}

impl TransactionResponse {
    /// A receipt query for this transaction, aimed at the submitting node.
    pub fn get_receipt_query(&self) -> TransactionReceiptQuery {
        let mut query = TransactionReceiptQuery::new();
        query
            .transaction_id(self.transaction_id)
            .node_account_ids([self.node_account_id])
            .validate_status(true);
        query
    }

    /// Fetch the receipt, failing if the transaction did not succeed.
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        self.get_receipt_query().execute(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::request::encode;

    fn response() -> TransactionResponse {
        JsonCodec::decode(concat!(
            r#"{"nodeAccountId":"0.0.3","#,
            r#""transactionId":"0.0.5006@1640000000.000000000","#,
            r#""transactionHash":"ab12"}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_decode() {
        let response = response();
        assert_eq!(response.node_account_id, AccountId::from(3));
        assert_eq!(response.transaction_hash, "ab12");
    }

    #[test]
    fn test_receipt_query_targets_submitting_node() {
        let query = response().get_receipt_query();

        assert_eq!(
            encode(&query).unwrap(),
            concat!(
                r#"{"$type":"transactionReceipt","#,
                r#""transactionId":"0.0.5006@1640000000.000000000","#,
                r#""validateStatus":true,"nodeAccountIds":["0.0.3"]}"#
            )
        );
    }

    #[test]
    fn test_missing_transaction_id_is_decode_error() {
        let result: crate::Result<TransactionResponse> =
            JsonCodec::decode(r#"{"nodeAccountId":"0.0.3","transactionHash":"ab12"}"#);
        assert!(matches!(result, Err(crate::Error::Decode(_))));
    }
}
