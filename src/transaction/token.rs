use serde::{Deserialize, Serialize};

use super::{AnyTransactionData, Transaction, TransactionData};
use crate::entity_id::{AccountId, TokenId};

/// Wipes the provided amount of tokens from the specified account.
///
/// Fungible tokens are wiped by `amount`, non-fungible ones by
/// `serial_numbers`. Must be signed with the token's wipe key.
pub type TokenWipeTransaction = Transaction<TokenWipeTransactionData>;

/// Variant data of [`TokenWipeTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenWipeTransactionData {
    /// The token for which to wipe tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<TokenId>,

    /// The account to be wiped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    /// The amount of a fungible token to wipe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,

    /// Serial numbers of a non-fungible token to wipe, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub serial_numbers: Vec<u64>,
}

impl TransactionData for TokenWipeTransactionData {
    const KIND: &'static str = "tokenWipe";
}

impl From<TokenWipeTransactionData> for AnyTransactionData {
    fn from(data: TokenWipeTransactionData) -> Self {
        Self::TokenWipe(data)
    }
}

impl TokenWipeTransaction {
    /// Returns the token for which to wipe tokens.
    pub fn get_token_id(&self) -> Option<TokenId> {
        self.body.data.token_id
    }

    /// Sets the token for which to wipe tokens.
    pub fn token_id(&mut self, token_id: impl Into<TokenId>) -> &mut Self {
        self.body.data.token_id = Some(token_id.into());
        self
    }

    /// Returns the account to be wiped.
    pub fn get_account_id(&self) -> Option<AccountId> {
        self.body.data.account_id
    }

    /// Sets the account to be wiped.
    pub fn account_id(&mut self, account_id: impl Into<AccountId>) -> &mut Self {
        self.body.data.account_id = Some(account_id.into());
        self
    }

    /// Returns the amount of a fungible token to wipe.
    pub fn get_amount(&self) -> Option<u64> {
        self.body.data.amount
    }

    /// Sets the amount of a fungible token to wipe.
    pub fn amount(&mut self, amount: u64) -> &mut Self {
        self.body.data.amount = Some(amount);
        self
    }

    /// Returns the serial numbers to wipe.
    pub fn get_serial_numbers(&self) -> &[u64] {
        &self.body.data.serial_numbers
    }

    /// Sets the serial numbers of a non-fungible token to wipe.
    pub fn serial_numbers(&mut self, serial_numbers: impl IntoIterator<Item = u64>) -> &mut Self {
        self.body.data.serial_numbers = serial_numbers.into_iter().collect();
        self
    }
}

/// Pauses the token from being involved in any kind of transaction until it
/// is unpaused.
///
/// Must be signed with the token's pause key. Pausing an already paused token
/// is a no-op.
pub type TokenPauseTransaction = Transaction<TokenPauseTransactionData>;

/// Variant data of [`TokenPauseTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenPauseTransactionData {
    /// The token to be paused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<TokenId>,
}

impl TransactionData for TokenPauseTransactionData {
    const KIND: &'static str = "tokenPause";
}

impl From<TokenPauseTransactionData> for AnyTransactionData {
    fn from(data: TokenPauseTransactionData) -> Self {
        Self::TokenPause(data)
    }
}

impl TokenPauseTransaction {
    /// Returns the token to be paused.
    pub fn get_token_id(&self) -> Option<TokenId> {
        self.body.data.token_id
    }

    /// Sets the token to be paused.
    pub fn token_id(&mut self, token_id: impl Into<TokenId>) -> &mut Self {
        self.body.data.token_id = Some(token_id.into());
        self
    }
}

/// Revokes KYC from the account for the given token.
///
/// Must be signed with the token's KYC key.
pub type TokenRevokeKycTransaction = Transaction<TokenRevokeKycTransactionData>;

/// Variant data of [`TokenRevokeKycTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenRevokeKycTransactionData {
    /// The account to have their KYC revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    /// The token for which this account will have their KYC revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<TokenId>,
}

impl TransactionData for TokenRevokeKycTransactionData {
    const KIND: &'static str = "tokenRevokeKyc";
}

impl From<TokenRevokeKycTransactionData> for AnyTransactionData {
    fn from(data: TokenRevokeKycTransactionData) -> Self {
        Self::TokenRevokeKyc(data)
    }
}

impl TokenRevokeKycTransaction {
    /// Returns the account to have their KYC revoked.
    pub fn get_account_id(&self) -> Option<AccountId> {
        self.body.data.account_id
    }

    /// Sets the account to have their KYC revoked.
    pub fn account_id(&mut self, account_id: impl Into<AccountId>) -> &mut Self {
        self.body.data.account_id = Some(account_id.into());
        self
    }

    /// Returns the token for which KYC is revoked.
    pub fn get_token_id(&self) -> Option<TokenId> {
        self.body.data.token_id
    }

    /// Sets the token for which KYC is revoked.
    pub fn token_id(&mut self, token_id: impl Into<TokenId>) -> &mut Self {
        self.body.data.token_id = Some(token_id.into());
        self
    }
}

/// Unfreezes transfers of the specified token for the account.
///
/// Must be signed with the token's freeze key.
pub type TokenUnfreezeTransaction = Transaction<TokenUnfreezeTransactionData>;

/// Variant data of [`TokenUnfreezeTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenUnfreezeTransactionData {
    /// The account to be unfrozen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    /// The token for which this account will be unfrozen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<TokenId>,
}

impl TransactionData for TokenUnfreezeTransactionData {
    const KIND: &'static str = "tokenUnfreeze";
}

impl From<TokenUnfreezeTransactionData> for AnyTransactionData {
    fn from(data: TokenUnfreezeTransactionData) -> Self {
        Self::TokenUnfreeze(data)
    }
}

impl TokenUnfreezeTransaction {
    /// Returns the account to be unfrozen.
    pub fn get_account_id(&self) -> Option<AccountId> {
        self.body.data.account_id
    }

    /// Sets the account to be unfrozen.
    pub fn account_id(&mut self, account_id: impl Into<AccountId>) -> &mut Self {
        self.body.data.account_id = Some(account_id.into());
        self
    }

    /// Returns the token to be unfrozen.
    pub fn get_token_id(&self) -> Option<TokenId> {
        self.body.data.token_id
    }

    /// Sets the token to be unfrozen.
    pub fn token_id(&mut self, token_id: impl Into<TokenId>) -> &mut Self {
        self.body.data.token_id = Some(token_id.into());
        self
    }
}
