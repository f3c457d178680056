//! Transactions: requests that change ledger state.
//!
//! A transaction is `Transaction<D>`: the shared [`TransactionBody`] fields
//! plus variant data `D`. Each variant is a type alias
//! (`TokenWipeTransaction = Transaction<TokenWipeTransactionData>`) with its
//! own fluent setters; the shared setters live here.
//!
//! Variants form a closed set, [`AnyTransactionData`], tagged on the wire with
//! `"$type"`.

mod contract;
mod response;
mod token;
mod topic;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::Client;
use crate::codec::JsonCodec;
use crate::entity_id::AccountId;
use crate::error::Result;
use crate::request::Request;
use crate::transaction_id::TransactionId;

pub use contract::{ContractDeleteTransaction, ContractDeleteTransactionData};
pub use response::TransactionResponse;
pub use token::{
    TokenPauseTransaction, TokenPauseTransactionData, TokenRevokeKycTransaction,
    TokenRevokeKycTransactionData, TokenUnfreezeTransaction, TokenUnfreezeTransactionData,
    TokenWipeTransaction, TokenWipeTransactionData,
};
pub use topic::{TopicDeleteTransaction, TopicDeleteTransactionData};

/// Variant data of one transaction kind.
pub trait TransactionData: Clone + Into<AnyTransactionData> {
    /// Wire tag of this kind.
    const KIND: &'static str;
}

/// Every transaction kind this crate can submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type", rename_all = "camelCase")]
pub enum AnyTransactionData {
    /// See [`TokenWipeTransaction`].
    TokenWipe(TokenWipeTransactionData),
    /// See [`TokenPauseTransaction`].
    TokenPause(TokenPauseTransactionData),
    /// See [`TokenRevokeKycTransaction`].
    TokenRevokeKyc(TokenRevokeKycTransactionData),
    /// See [`TokenUnfreezeTransaction`].
    TokenUnfreeze(TokenUnfreezeTransactionData),
    /// See [`TopicDeleteTransaction`].
    TopicDelete(TopicDeleteTransactionData),
    /// See [`ContractDeleteTransaction`].
    ContractDelete(ContractDeleteTransactionData),
}

/// Fields shared by every transaction.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody<D> {
    #[serde(skip)]
    pub(crate) data: D,

    #[serde(skip_serializing_if = "Option::is_none")]
    node_account_ids: Option<Vec<AccountId>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<TransactionId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_transaction_fee: Option<u64>,

    /// Whole seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_valid_duration: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_memo: Option<String>,
}

/// A transaction of kind `D`.
#[derive(Debug, Clone, Default)]
pub struct Transaction<D> {
    pub(crate) body: TransactionBody<D>,
}

impl<D: TransactionData + Default> Transaction<D> {
    /// Create a transaction with every field unset.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: TransactionData> Transaction<D> {
    /// The variant data.
    pub fn data(&self) -> &D {
        &self.body.data
    }

    /// Nodes the engine may submit to.
    pub fn get_node_account_ids(&self) -> Option<&[AccountId]> {
        self.body.node_account_ids.as_deref()
    }

    /// Restrict submission to these nodes, in order of preference.
    pub fn node_account_ids(&mut self, ids: impl IntoIterator<Item = AccountId>) -> &mut Self {
        self.body.node_account_ids = Some(ids.into_iter().collect());
        self
    }

    /// The explicit transaction ID, if any.
    pub fn get_transaction_id(&self) -> Option<TransactionId> {
        self.body.transaction_id
    }

    /// Use this transaction ID instead of one generated by the engine.
    pub fn transaction_id(&mut self, id: TransactionId) -> &mut Self {
        self.body.transaction_id = Some(id);
        self
    }

    /// The fee ceiling, if set.
    pub fn get_max_transaction_fee(&self) -> Option<u64> {
        self.body.max_transaction_fee
    }

    /// Most this transaction may cost, in the ledger's smallest unit.
    pub fn max_transaction_fee(&mut self, fee: u64) -> &mut Self {
        self.body.max_transaction_fee = Some(fee);
        self
    }

    /// How long the transaction stays valid after its valid start.
    pub fn get_transaction_valid_duration(&self) -> Option<Duration> {
        self.body
            .transaction_valid_duration
            .map(Duration::from_secs)
    }

    /// Set the validity window; sub-second precision is dropped.
    pub fn transaction_valid_duration(&mut self, duration: Duration) -> &mut Self {
        self.body.transaction_valid_duration = Some(duration.as_secs());
        self
    }

    /// The memo, if set.
    pub fn get_transaction_memo(&self) -> Option<&str> {
        self.body.transaction_memo.as_deref()
    }

    /// Attach a memo to the transaction.
    pub fn transaction_memo(&mut self, memo: impl Into<String>) -> &mut Self {
        self.body.transaction_memo = Some(memo.into());
        self
    }

    /// Submit the transaction.
    ///
    /// Succeeds once the ledger accepted it for consensus; use
    /// [`TransactionResponse::get_receipt`] for the outcome.
    pub async fn execute(&self, client: &Client) -> Result<TransactionResponse> {
        client.execute(self).await
    }
}

impl<D: TransactionData> Request for Transaction<D> {
    type Response = TransactionResponse;

    fn kind(&self) -> &'static str {
        D::KIND
    }

    fn variant_contribution(&self) -> Result<Map<String, Value>> {
        let data: AnyTransactionData = self.body.data.clone().into();
        JsonCodec::encode_object(&data)
    }

    fn base_contribution(&self) -> Result<Map<String, Value>> {
        JsonCodec::encode_object(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::encode;
    use crate::transaction_id::Timestamp;
    use crate::TokenId;

    #[test]
    fn test_unset_base_fields_are_omitted() {
        let mut transaction = TokenPauseTransaction::new();
        transaction.token_id(TokenId::from(1001));

        assert_eq!(
            encode(&transaction).unwrap(),
            r#"{"$type":"tokenPause","tokenId":"0.0.1001"}"#
        );
    }

    #[test]
    fn test_base_fields_follow_variant_fields() {
        let mut transaction = TokenPauseTransaction::new();
        transaction
            .transaction_memo("pause it")
            .token_id(TokenId::from(1001))
            .max_transaction_fee(200_000_000)
            .transaction_valid_duration(Duration::from_secs(120))
            .node_account_ids([AccountId::from(3), AccountId::from(4)])
            .transaction_id(TransactionId::new(
                AccountId::from(5006),
                Timestamp::new(1_640_000_000, 5),
            ));

        assert_eq!(
            encode(&transaction).unwrap(),
            concat!(
                r#"{"$type":"tokenPause","tokenId":"0.0.1001","#,
                r#""nodeAccountIds":["0.0.3","0.0.4"],"#,
                r#""transactionId":"0.0.5006@1640000000.000000005","#,
                r#""maxTransactionFee":200000000,"#,
                r#""transactionValidDuration":120,"#,
                r#""transactionMemo":"pause it"}"#
            )
        );
    }

    #[test]
    fn test_getters_reflect_setters() {
        let mut transaction = TokenPauseTransaction::new();
        assert_eq!(transaction.get_transaction_memo(), None);

        transaction
            .transaction_memo("m")
            .transaction_valid_duration(Duration::from_millis(90_500));

        assert_eq!(transaction.get_transaction_memo(), Some("m"));
        assert_eq!(
            transaction.get_transaction_valid_duration(),
            Some(Duration::from_secs(90))
        );
        assert_eq!(transaction.kind(), "tokenPause");
    }

    #[test]
    fn test_any_transaction_data_reads_tagged_payload() {
        let data: AnyTransactionData =
            JsonCodec::decode(r#"{"$type":"topicDelete","topicId":"0.0.7","transactionMemo":"x"}"#)
                .unwrap();

        let AnyTransactionData::TopicDelete(data) = data else {
            panic!("expected topic delete, got {data:?}");
        };
        assert_eq!(data.topic_id, Some(crate::TopicId::from(7)));
    }

    #[test]
    fn test_unknown_tag_is_decode_error() {
        let result: Result<AnyTransactionData> =
            JsonCodec::decode(r#"{"$type":"cryptoTransfer"}"#);
        assert!(matches!(result, Err(crate::Error::Decode(_))));
    }
}
