use serde::{Deserialize, Serialize};

use super::{AnyTransactionData, Transaction, TransactionData};
use crate::entity_id::{AccountId, ContractId};

/// Marks a contract as deleted and transfers its remaining balance, if any,
/// to a designated receiver.
///
/// Exactly one receiver should be set: an account or another contract.
pub type ContractDeleteTransaction = Transaction<ContractDeleteTransactionData>;

/// Variant data of [`ContractDeleteTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractDeleteTransactionData {
    /// The contract to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_contract_id: Option<ContractId>,

    /// Account receiving the remaining balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_account_id: Option<AccountId>,

    /// Contract receiving the remaining balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_contract_id: Option<ContractId>,
}

impl TransactionData for ContractDeleteTransactionData {
    const KIND: &'static str = "contractDelete";
}

impl From<ContractDeleteTransactionData> for AnyTransactionData {
    fn from(data: ContractDeleteTransactionData) -> Self {
        Self::ContractDelete(data)
    }
}

impl ContractDeleteTransaction {
    /// Returns the contract to delete.
    pub fn get_contract_id(&self) -> Option<ContractId> {
        self.body.data.delete_contract_id
    }

    /// Sets the contract to delete.
    pub fn contract_id(&mut self, id: impl Into<ContractId>) -> &mut Self {
        self.body.data.delete_contract_id = Some(id.into());
        self
    }

    /// Returns the account receiving the remaining balance.
    pub fn get_transfer_account_id(&self) -> Option<AccountId> {
        self.body.data.transfer_account_id
    }

    /// Sends the remaining balance to an account.
    ///
    /// Clears any receiving contract.
    pub fn transfer_account_id(&mut self, id: impl Into<AccountId>) -> &mut Self {
        self.body.data.transfer_account_id = Some(id.into());
        self.body.data.transfer_contract_id = None;
        self
    }

    /// Returns the contract receiving the remaining balance.
    pub fn get_transfer_contract_id(&self) -> Option<ContractId> {
        self.body.data.transfer_contract_id
    }

    /// Sends the remaining balance to another contract.
    ///
    /// Clears any receiving account.
    pub fn transfer_contract_id(&mut self, id: impl Into<ContractId>) -> &mut Self {
        self.body.data.transfer_contract_id = Some(id.into());
        self.body.data.transfer_account_id = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::encode;

    #[test]
    fn test_serialize() {
        let mut transaction = ContractDeleteTransaction::new();
        transaction
            .contract_id(ContractId::from(1001))
            .transfer_account_id(AccountId::from(2));

        assert_eq!(
            encode(&transaction).unwrap(),
            r#"{"$type":"contractDelete","deleteContractId":"0.0.1001","transferAccountId":"0.0.2"}"#
        );
    }

    #[test]
    fn test_receivers_are_exclusive() {
        let mut transaction = ContractDeleteTransaction::new();
        transaction
            .transfer_account_id(AccountId::from(2))
            .transfer_contract_id(ContractId::from(3));

        assert_eq!(transaction.get_transfer_account_id(), None);
        assert_eq!(
            transaction.get_transfer_contract_id(),
            Some(ContractId::from(3))
        );
    }
}
