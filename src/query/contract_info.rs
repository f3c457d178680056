use serde::{Deserialize, Serialize};

use super::{AnyQueryData, Query, QueryData};
use crate::entity_id::{AccountId, ContractId};

/// Get information about a smart contract instance.
pub type ContractInfoQuery = Query<ContractInfoQueryData>;

/// Variant data of [`ContractInfoQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractInfoQueryData {
    /// The contract to look up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<ContractId>,
}

impl QueryData for ContractInfoQueryData {
    const KIND: &'static str = "contractInfo";

    type Response = ContractInfo;
}

impl From<ContractInfoQueryData> for AnyQueryData {
    fn from(data: ContractInfoQueryData) -> Self {
        Self::ContractInfo(data)
    }
}

impl ContractInfoQuery {
    /// Returns the contract to look up.
    pub fn get_contract_id(&self) -> Option<ContractId> {
        self.data.contract_id
    }

    /// Sets the contract to look up.
    pub fn contract_id(&mut self, id: impl Into<ContractId>) -> &mut Self {
        self.data.contract_id = Some(id.into());
        self
    }
}

/// Current state of a smart contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    /// The contract described.
    pub contract_id: ContractId,

    /// The account that holds the contract's balance.
    pub account_id: AccountId,

    /// Solidity address of the contract.
    pub contract_account_id: String,

    /// Bytes of storage used.
    pub storage: u64,

    /// Memo attached to the contract; empty when none.
    #[serde(default)]
    pub contract_memo: String,

    /// Balance in the ledger's smallest unit.
    pub balance: u64,

    /// Whether the contract has been deleted.
    pub is_deleted: bool,

    /// Account charged for auto-renewal, if any.
    #[serde(default)]
    pub auto_renew_account_id: Option<AccountId>,

    /// Token associations the contract accepts without signing.
    #[serde(default)]
    pub max_automatic_token_associations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;

    #[test]
    fn test_decode_info() {
        let info: ContractInfo = JsonCodec::decode(concat!(
            r#"{"contractId":"0.0.1001","accountId":"0.0.1001","#,
            r#""contractAccountId":"00000000000000000000000000000000000003e9","#,
            r#""storage":1024,"balance":0,"isDeleted":false,"#,
            r#""maxAutomaticTokenAssociations":10}"#
        ))
        .unwrap();

        assert_eq!(info.contract_id, ContractId::from(1001));
        assert_eq!(info.storage, 1024);
        assert_eq!(info.auto_renew_account_id, None);
        assert_eq!(info.contract_memo, "");
        assert_eq!(info.max_automatic_token_associations, 10);
    }

    #[test]
    fn test_missing_required_field_is_decode_error() {
        let without_account = concat!(
            r#"{"contractId":"0.0.1001","#,
            r#""contractAccountId":"00000000000000000000000000000000000003e9","#,
            r#""storage":1024,"balance":0,"isDeleted":false}"#
        );
        let result: crate::Result<ContractInfo> = JsonCodec::decode(without_account);
        assert!(matches!(result, Err(crate::Error::Decode(_))));

        let result: crate::Result<ContractInfo> = JsonCodec::decode("{}");
        assert!(matches!(result, Err(crate::Error::Decode(_))));
    }
}
