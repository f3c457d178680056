//! Client-generated transaction identifier.
//!
//! Canonical form is `"{account}@{seconds}.{nanos}"` with nanos zero-padded to
//! nine digits, e.g. `"0.0.5@1640995200.000000123"`.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::entity_id::AccountId;
use crate::error::{Error, Result};

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    /// Whole seconds.
    pub seconds: u64,
    /// Nanoseconds within the second (0..1_000_000_000).
    pub nanos: u32,
}

impl Timestamp {
    /// Create a timestamp.
    pub const fn new(seconds: u64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let since = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::new(since.as_secs(), since.subsec_nanos())
    }
}

/// The ID of a transaction: the paying account plus the time the transaction
/// becomes valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId {
    /// The account that pays for the transaction.
    pub account_id: AccountId,
    /// When the transaction becomes valid.
    pub valid_start: Timestamp,
}

impl TransactionId {
    /// Create a transaction ID from its parts.
    pub const fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
        }
    }

    /// Generate a transaction ID for `account_id`, valid from now.
    pub fn generate(account_id: AccountId) -> Self {
        Self::new(account_id, Timestamp::now())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id, self.valid_start.seconds, self.valid_start.nanos
        )
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::BasicParse(format!(
                "invalid transaction id `{s}`: expected `account@seconds.nanos`"
            ))
        };

        let (account, start) = s.split_once('@').ok_or_else(invalid)?;
        let (seconds, nanos) = start.split_once('.').ok_or_else(invalid)?;

        let account_id = account.parse()?;
        let seconds = seconds.parse().map_err(|_| invalid())?;
        let nanos: u32 = nanos.parse().map_err(|_| invalid())?;
        if nanos >= 1_000_000_000 {
            return Err(invalid());
        }

        Ok(Self::new(account_id, Timestamp::new(seconds, nanos)))
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_nanos() {
        let id = TransactionId::new(AccountId::from(5), Timestamp::new(1640995200, 123));
        assert_eq!(id.to_string(), "0.0.5@1640995200.000000123");
    }

    #[test]
    fn test_parse() {
        let id: TransactionId = "0.0.5@1640995200.000000123".parse().unwrap();
        assert_eq!(id.account_id, AccountId::from(5));
        assert_eq!(id.valid_start, Timestamp::new(1640995200, 123));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("0.0.5".parse::<TransactionId>().is_err());
        assert!("0.0.5@123".parse::<TransactionId>().is_err());
        assert!("0.0.5@1.1000000000".parse::<TransactionId>().is_err());
        assert!("x@1.2".parse::<TransactionId>().is_err());
    }

    #[test]
    fn test_generate_uses_account() {
        let id = TransactionId::generate(AccountId::from(42));
        assert_eq!(id.account_id, AccountId::from(42));
        assert!(id.valid_start.seconds > 0);
    }
}
