//! Queries: requests that read ledger state.
//!
//! A query is `Query<D>`: variant data `D` plus the fields shared by every
//! query, the target nodes and the payment attached to it. The payment is
//! merged into the payload as one `"payment"` object and is omitted entirely
//! when nothing about it is set.

mod contract_info;
mod network_version_info;
mod receipt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::Client;
use crate::codec::JsonCodec;
use crate::entity_id::AccountId;
use crate::error::Result;
use crate::request::Request;
use crate::transaction_id::TransactionId;

pub use contract_info::{ContractInfo, ContractInfoQuery, ContractInfoQueryData};
pub use network_version_info::{
    NetworkVersionInfo, NetworkVersionInfoQuery, NetworkVersionInfoQueryData,
};
pub use receipt::{TransactionReceipt, TransactionReceiptQuery, TransactionReceiptQueryData};

/// Variant data of one query kind.
pub trait QueryData: Clone + Into<AnyQueryData> {
    /// Wire tag of this kind.
    const KIND: &'static str;

    /// What a successful response decodes into.
    type Response: DeserializeOwned;
}

/// Every query kind this crate can submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type", rename_all = "camelCase")]
pub enum AnyQueryData {
    /// See [`TransactionReceiptQuery`].
    TransactionReceipt(TransactionReceiptQueryData),
    /// See [`ContractInfoQuery`].
    ContractInfo(ContractInfoQueryData),
    /// See [`NetworkVersionInfoQuery`].
    NetworkVersionInfo(NetworkVersionInfoQueryData),
}

/// Payment attached to a query.
///
/// The engine builds and signs the payment transaction; these are the inputs
/// it uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayment {
    /// Exact amount to pay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,

    /// Most the caller accepts to pay when the amount is not fixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<u64>,

    /// ID of the payment transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

impl QueryPayment {
    /// Whether no payment input is set.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.max_amount.is_none() && self.transaction_id.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBase {
    #[serde(skip_serializing_if = "Option::is_none")]
    node_account_ids: Option<Vec<AccountId>>,

    #[serde(skip_serializing_if = "QueryPayment::is_empty")]
    payment: QueryPayment,
}

/// A query of kind `D`.
#[derive(Debug, Clone, Default)]
pub struct Query<D> {
    pub(crate) data: D,
    base: QueryBase,
}

impl<D: QueryData + Default> Query<D> {
    /// Create a query with every field unset.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: QueryData> Query<D> {
    /// The variant data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Nodes the engine may send the query to.
    pub fn get_node_account_ids(&self) -> Option<&[AccountId]> {
        self.base.node_account_ids.as_deref()
    }

    /// Restrict the query to these nodes, in order of preference.
    pub fn node_account_ids(&mut self, ids: impl IntoIterator<Item = AccountId>) -> &mut Self {
        self.base.node_account_ids = Some(ids.into_iter().collect());
        self
    }

    /// The payment inputs attached so far.
    pub fn get_payment(&self) -> &QueryPayment {
        &self.base.payment
    }

    /// Pay exactly this amount for the query.
    pub fn payment_amount(&mut self, amount: u64) -> &mut Self {
        self.base.payment.amount = Some(amount);
        self
    }

    /// Pay at most this amount for the query.
    pub fn max_payment_amount(&mut self, amount: u64) -> &mut Self {
        self.base.payment.max_amount = Some(amount);
        self
    }

    /// Use this ID for the payment transaction.
    pub fn payment_transaction_id(&mut self, id: TransactionId) -> &mut Self {
        self.base.payment.transaction_id = Some(id);
        self
    }

    /// Execute the query.
    pub async fn execute(&self, client: &Client) -> Result<D::Response> {
        client.execute(self).await
    }
}

impl<D: QueryData> Request for Query<D> {
    type Response = D::Response;

    fn kind(&self) -> &'static str {
        D::KIND
    }

    fn variant_contribution(&self) -> Result<Map<String, Value>> {
        let data: AnyQueryData = self.data.clone().into();
        JsonCodec::encode_object(&data)
    }

    fn base_contribution(&self) -> Result<Map<String, Value>> {
        JsonCodec::encode_object(&self.base)
    }
}
