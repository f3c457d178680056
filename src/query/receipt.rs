use serde::{Deserialize, Serialize};

use super::{AnyQueryData, Query, QueryData};
use crate::entity_id::{AccountId, ContractId, ScheduleId, TokenId, TopicId};
use crate::transaction_id::TransactionId;

/// Get the receipt of a transaction, given its transaction ID.
///
/// Receipts are free to query and are kept by the network for a short time
/// after consensus.
pub type TransactionReceiptQuery = Query<TransactionReceiptQueryData>;

/// Variant data of [`TransactionReceiptQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionReceiptQueryData {
    /// The transaction whose receipt is wanted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,

    /// Also return receipts of child transactions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_children: bool,

    /// Also return receipts of duplicate submissions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_duplicates: bool,

    /// Turn a non-success receipt status into an engine error.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub validate_status: bool,
}

impl QueryData for TransactionReceiptQueryData {
    const KIND: &'static str = "transactionReceipt";

    type Response = TransactionReceipt;
}

impl From<TransactionReceiptQueryData> for AnyQueryData {
    fn from(data: TransactionReceiptQueryData) -> Self {
        Self::TransactionReceipt(data)
    }
}

impl TransactionReceiptQuery {
    /// Returns the transaction whose receipt is wanted.
    pub fn get_transaction_id(&self) -> Option<TransactionId> {
        self.data.transaction_id
    }

    /// Sets the transaction whose receipt is wanted.
    pub fn transaction_id(&mut self, id: TransactionId) -> &mut Self {
        self.data.transaction_id = Some(id);
        self
    }

    /// Returns whether child receipts are requested.
    pub fn get_include_children(&self) -> bool {
        self.data.include_children
    }

    /// Whether the response should include child receipts.
    pub fn include_children(&mut self, value: bool) -> &mut Self {
        self.data.include_children = value;
        self
    }

    /// Returns whether duplicate receipts are requested.
    pub fn get_include_duplicates(&self) -> bool {
        self.data.include_duplicates
    }

    /// Whether the response should include duplicate receipts.
    pub fn include_duplicates(&mut self, value: bool) -> &mut Self {
        self.data.include_duplicates = value;
        self
    }

    /// Returns whether the receipt status is validated.
    pub fn get_validate_status(&self) -> bool {
        self.data.validate_status
    }

    /// Whether a failed status should come back as an error.
    pub fn validate_status(&mut self, value: bool) -> &mut Self {
        self.data.validate_status = value;
        self
    }
}

/// The outcome of a transaction once it reached consensus.
///
/// Only the entity the transaction created, if any, is set. `status` is
/// required; a payload without it fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Consensus status, e.g. `"SUCCESS"`.
    pub status: String,

    /// Account created by the transaction.
    #[serde(default)]
    pub account_id: Option<AccountId>,

    /// Contract created by the transaction.
    #[serde(default)]
    pub contract_id: Option<ContractId>,

    /// Topic created by the transaction.
    #[serde(default)]
    pub topic_id: Option<TopicId>,

    /// Token created by the transaction.
    #[serde(default)]
    pub token_id: Option<TokenId>,

    /// Schedule created by the transaction.
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,

    /// Token supply after a mint, burn or wipe.
    #[serde(default)]
    pub total_supply: u64,

    /// Serial numbers of newly minted non-fungible tokens.
    #[serde(default)]
    pub serial_numbers: Vec<u64>,

    /// Sequence number of a topic message.
    #[serde(default)]
    pub topic_sequence_number: u64,

    /// The scheduled transaction, for a schedule create or sign.
    #[serde(default)]
    pub scheduled_transaction_id: Option<TransactionId>,
}
