//! Entity identifiers.
//!
//! Every ledger entity is addressed by three non-negative integers
//! (`shard`, `realm`, `num`) with the canonical string form
//! `"{shard}.{realm}.{num}"`. That string is also the wire form.
//!
//! # Example
//!
//! ```
//! use ledger_sdk::{EntityId, TokenId};
//!
//! assert_eq!(EntityId::from(5).to_string(), "0.0.5");
//! assert_eq!(EntityId::new(2, 3, 1).to_string(), "2.3.1");
//!
//! let token: TokenId = "0.0.1001".parse().unwrap();
//! assert_eq!(token.num, 1001);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Untyped identifier shared by every entity kind.
///
/// Field order matters: the derived ordering compares shard, then realm,
/// then num.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId {
    /// The shard number (non-negative).
    pub shard: u64,
    /// The realm number (non-negative).
    pub realm: u64,
    /// The entity number (non-negative).
    pub num: u64,
}

impl EntityId {
    /// Create an identifier from all three components.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Parse `"shard.realm.num"` or a bare `"num"`.
    fn parse(s: &str, kind: &str) -> Result<Self> {
        let invalid = || {
            Error::BasicParse(format!(
                "invalid {kind} `{s}`: expected `shard.realm.num`"
            ))
        };

        let parts: Vec<&str> = s.split('.').collect();
        let parse_part = |p: &str| p.parse::<u64>().map_err(|_| invalid());

        match parts.as_slice() {
            [num] => Ok(Self::from(parse_part(*num)?)),
            [shard, realm, num] => Ok(Self::new(
                parse_part(*shard)?,
                parse_part(*realm)?,
                parse_part(*num)?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl From<u64> for EntityId {
    fn from(num: u64) -> Self {
        Self::new(0, 0, num)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, "entity id")
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Declares a typed identifier that shares the [`EntityId`] shape.
macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name {
            /// The shard number (non-negative).
            pub shard: u64,
            /// The realm number (non-negative).
            pub realm: u64,
            /// The entity number (non-negative).
            pub num: u64,
        }

        impl $name {
            /// Create an identifier from all three components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }
        }

        impl From<u64> for $name {
            fn from(num: u64) -> Self {
                Self::new(0, 0, num)
            }
        }

        impl From<EntityId> for $name {
            fn from(id: EntityId) -> Self {
                Self::new(id.shard, id.realm, id.num)
            }
        }

        impl From<$name> for EntityId {
            fn from(id: $name) -> Self {
                EntityId::new(id.shard, id.realm, id.num)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&EntityId::from(*self), f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                EntityId::parse(s, $kind).map(Self::from)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

entity_id!(
    /// The unique identifier for a cryptocurrency account.
    AccountId,
    "account id"
);

entity_id!(
    /// The unique identifier for a token.
    TokenId,
    "token id"
);

entity_id!(
    /// The unique identifier for a consensus topic.
    TopicId,
    "topic id"
);

entity_id!(
    /// The unique identifier for a smart contract.
    ContractId,
    "contract id"
);

entity_id!(
    /// The unique identifier for a scheduled transaction.
    ScheduleId,
    "schedule id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form_num_only() {
        assert_eq!(EntityId::from(5).to_string(), "0.0.5");
        assert_eq!(ScheduleId::from(5).to_string(), "0.0.5");
    }

    #[test]
    fn test_canonical_form_all_parts() {
        // new(shard, realm, num)
        assert_eq!(EntityId::new(2, 3, 1).to_string(), "2.3.1");
        assert_eq!(AccountId::new(2, 3, 1).to_string(), "2.3.1");
    }

    #[test]
    fn test_parse() {
        let id: TokenId = "1.2.3".parse().unwrap();
        assert_eq!(id, TokenId::new(1, 2, 3));

        let id: AccountId = "1001".parse().unwrap();
        assert_eq!(id, AccountId::from(1001));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<TokenId>().is_err());
        assert!("1.2".parse::<TokenId>().is_err());
        assert!("1.2.3.4".parse::<TokenId>().is_err());
        assert!("a.b.c".parse::<TokenId>().is_err());
        assert!("-1.0.0".parse::<EntityId>().is_err());

        let err = "x".parse::<TopicId>().unwrap_err();
        assert!(err.to_string().contains("topic id"));
    }

    #[test]
    fn test_structural_ordering() {
        let mut ids = vec![
            EntityId::new(0, 1, 0),
            EntityId::new(1, 0, 0),
            EntityId::new(0, 0, 9),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                EntityId::new(0, 0, 9),
                EntityId::new(0, 1, 0),
                EntityId::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ContractId::new(0, 0, 1001)).unwrap();
        assert_eq!(json, "\"0.0.1001\"");

        let id: ContractId = serde_json::from_str("\"0.0.1001\"").unwrap();
        assert_eq!(id, ContractId::from(1001));

        assert!(serde_json::from_str::<ContractId>("1001").is_err());
    }

    #[test]
    fn test_typed_conversions() {
        let raw = EntityId::new(4, 5, 6);
        let token = TokenId::from(raw);
        assert_eq!(EntityId::from(token), raw);
    }
}
