//! Canonical entity identifiers.
//!
//! An [`EntityId`] is the `shard.realm.num` triple every ledger entity is
//! addressed by. It packs into a single `i64` so that it can be used as a
//! primary key: 10 bits of shard, 16 bits of realm and 38 bits of number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const SHARD_BITS: u32 = 10;
const REALM_BITS: u32 = 16;
const NUM_BITS: u32 = 38;

const SHARD_MASK: i64 = (1 << SHARD_BITS) - 1;
const REALM_MASK: i64 = (1 << REALM_BITS) - 1;
const NUM_MASK: i64 = (1 << NUM_BITS) - 1;

/// Length of an EVM address in bytes.
pub const EVM_ADDRESS_LENGTH: usize = 20;

/// Errors raised when building an [`EntityId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEntityId {
    #[error("Entity id {shard}.{realm}.{num} is out of range")]
    OutOfRange { shard: i64, realm: i64, num: i64 },

    #[error("Invalid entity id '{0}', expected shard.realm.num")]
    Unparseable(String),
}

/// Canonical `shard.realm.num` identifier of a ledger entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    shard: i64,
    realm: i64,
    num: i64,
}

impl EntityId {
    /// The `0.0.0` id. Used both as "unresolved" and as the explicit clear sentinel.
    pub const EMPTY: Self = Self {
        shard: 0,
        realm: 0,
        num: 0,
    };

    /// Builds an id, rejecting components that do not fit the encoding.
    pub fn of(shard: i64, realm: i64, num: i64) -> Result<Self, InvalidEntityId> {
        if !(0..=SHARD_MASK).contains(&shard)
            || !(0..=REALM_MASK).contains(&realm)
            || !(0..=NUM_MASK).contains(&num)
        {
            return Err(InvalidEntityId::OutOfRange { shard, realm, num });
        }

        Ok(Self { shard, realm, num })
    }

    /// Decodes an id from its packed numeric form.
    pub fn from_encoded(id: i64) -> Self {
        Self {
            shard: (id >> (REALM_BITS + NUM_BITS)) & SHARD_MASK,
            realm: (id >> NUM_BITS) & REALM_MASK,
            num: id & NUM_MASK,
        }
    }

    /// Decodes a "long-zero" EVM address (`shard:4 | realm:8 | num:8`, big endian).
    ///
    /// Returns `None` for addresses that are not of that shape, which must be
    /// looked up as aliases instead.
    pub fn from_evm_address(address: &[u8]) -> Option<Self> {
        if address.len() != EVM_ADDRESS_LENGTH {
            return None;
        }

        let shard = i64::from(u32::from_be_bytes(address[0..4].try_into().ok()?));
        let realm = i64::from_be_bytes(address[4..12].try_into().ok()?);
        let num = i64::from_be_bytes(address[12..20].try_into().ok()?);

        // A mirror-generated address never carries a realm or num beyond the encoding.
        Self::of(shard, realm, num).ok()
    }

    /// The packed numeric form.
    pub fn encoded(&self) -> i64 {
        (self.shard << (REALM_BITS + NUM_BITS)) | (self.realm << NUM_BITS) | self.num
    }

    pub fn shard(&self) -> i64 {
        self.shard
    }

    pub fn realm(&self) -> i64 {
        self.realm
    }

    pub fn num(&self) -> i64 {
        self.num
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Returns `None` for [`EntityId::EMPTY`].
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    /// The "long-zero" EVM address of this id.
    pub fn to_evm_address(&self) -> [u8; EVM_ADDRESS_LENGTH] {
        let mut address = [0u8; EVM_ADDRESS_LENGTH];
        address[0..4].copy_from_slice(&(self.shard as u32).to_be_bytes());
        address[4..12].copy_from_slice(&self.realm.to_be_bytes());
        address[12..20].copy_from_slice(&self.num.to_be_bytes());
        address
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = InvalidEntityId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let [shard, realm, num] = parts.as_slice() else {
            return Err(InvalidEntityId::Unparseable(s.to_string()));
        };

        let parse = |part: &str| {
            part.parse::<i64>()
                .map_err(|_| InvalidEntityId::Unparseable(s.to_string()))
        };

        Self::of(parse(shard)?, parse(realm)?, parse(num)?)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Discriminator shared by every row of the entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Account,
    Contract,
    File,
    Schedule,
    Token,
    Topic,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Account => "ACCOUNT",
            Self::Contract => "CONTRACT",
            Self::File => "FILE",
            Self::Schedule => "SCHEDULE",
            Self::Token => "TOKEN",
            Self::Topic => "TOPIC",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_layout() {
        let id = EntityId::of(1, 2, 3).unwrap();
        assert_eq!(id.encoded(), (1 << 54) | (2 << 38) | 3);
        assert_eq!(EntityId::from_encoded(id.encoded()), id);
        assert_eq!(EntityId::EMPTY.encoded(), 0);
    }

    #[test]
    fn test_out_of_range_components_are_rejected() {
        assert!(EntityId::of(1024, 0, 0).is_err());
        assert!(EntityId::of(0, 65536, 0).is_err());
        assert!(EntityId::of(0, 0, 1 << 38).is_err());
        assert!(EntityId::of(0, 0, -1).is_err());
        assert!(EntityId::of(1023, 65535, (1 << 38) - 1).is_ok());
    }

    #[test]
    fn test_parse_and_display() {
        let id: EntityId = "0.0.98".parse().unwrap();
        assert_eq!(id.num(), 98);
        assert_eq!(id.to_string(), "0.0.98");
        assert!("0.0".parse::<EntityId>().is_err());
        assert!("a.b.c".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_long_zero_evm_address() {
        let id = EntityId::of(0, 0, 1001).unwrap();
        let address = id.to_evm_address();
        assert_eq!(EntityId::from_evm_address(&address), Some(id));

        let mut alias = [0xABu8; 20];
        alias[0] = 0xFF;
        assert_eq!(EntityId::from_evm_address(&alias), None);
        assert_eq!(EntityId::from_evm_address(&[0u8; 33]), None);
    }

    #[test]
    fn test_serde_as_string() {
        let id = EntityId::of(0, 0, 800).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0.0.800\"");
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
