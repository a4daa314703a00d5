//! Wire identifiers and time values.

use std::fmt;

use mirror_types::{EntityId, InvalidEntityId};
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Nanoseconds since the epoch, saturating on overflow.
    pub fn to_nanos(&self) -> i64 {
        self.seconds
            .saturating_mul(NANOS_PER_SECOND)
            .saturating_add(i64::from(self.nanos))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self {
            seconds: nanos.div_euclid(NANOS_PER_SECOND),
            nanos: nanos.rem_euclid(NANOS_PER_SECOND) as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration {
    pub seconds: i64,
}

/// Account reference: either a number or an alias (public key or EVM address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRef {
    Num(i64),
    Alias(#[serde(with = "hex")] Vec<u8>),
}

impl Default for AccountRef {
    fn default() -> Self {
        Self::Num(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId {
    #[serde(default)]
    pub shard_num: i64,
    #[serde(default)]
    pub realm_num: i64,
    pub account: AccountRef,
}

impl AccountId {
    pub fn from_num(shard_num: i64, realm_num: i64, num: i64) -> Self {
        Self {
            shard_num,
            realm_num,
            account: AccountRef::Num(num),
        }
    }

    pub fn from_alias(shard_num: i64, realm_num: i64, alias: Vec<u8>) -> Self {
        Self {
            shard_num,
            realm_num,
            account: AccountRef::Alias(alias),
        }
    }

    /// True for the default instance `0.0.0`, which the ledger uses as a "clear" sentinel.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// The entity id when the account is referenced by number.
    pub fn numeric_id(&self) -> Option<Result<EntityId, InvalidEntityId>> {
        match self.account {
            AccountRef::Num(num) => Some(EntityId::of(self.shard_num, self.realm_num, num)),
            AccountRef::Alias(_) => None,
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.account {
            AccountRef::Num(num) => write!(f, "{}.{}.{}", self.shard_num, self.realm_num, num),
            AccountRef::Alias(alias) => {
                write!(f, "{}.{}.{}", self.shard_num, self.realm_num, hex::encode(alias))
            }
        }
    }
}

/// Contract reference: either a number or a 20-byte EVM address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractRef {
    Num(i64),
    EvmAddress(#[serde(with = "hex")] Vec<u8>),
}

impl Default for ContractRef {
    fn default() -> Self {
        Self::Num(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId {
    #[serde(default)]
    pub shard_num: i64,
    #[serde(default)]
    pub realm_num: i64,
    pub contract: ContractRef,
}

impl ContractId {
    pub fn from_num(shard_num: i64, realm_num: i64, num: i64) -> Self {
        Self {
            shard_num,
            realm_num,
            contract: ContractRef::Num(num),
        }
    }

    pub fn from_evm_address(shard_num: i64, realm_num: i64, address: Vec<u8>) -> Self {
        Self {
            shard_num,
            realm_num,
            contract: ContractRef::EvmAddress(address),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn numeric_id(&self) -> Option<Result<EntityId, InvalidEntityId>> {
        match self.contract {
            ContractRef::Num(num) => Some(EntityId::of(self.shard_num, self.realm_num, num)),
            ContractRef::EvmAddress(_) => None,
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.contract {
            ContractRef::Num(num) => write!(f, "{}.{}.{}", self.shard_num, self.realm_num, num),
            ContractRef::EvmAddress(address) => {
                write!(f, "{}.{}.{}", self.shard_num, self.realm_num, hex::encode(address))
            }
        }
    }
}

/// Declares a plain numeric `shard.realm.num` wire id.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $num:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default)]
            pub shard_num: i64,
            #[serde(default)]
            pub realm_num: i64,
            pub $num: i64,
        }

        impl $name {
            pub fn new(shard_num: i64, realm_num: i64, $num: i64) -> Self {
                Self { shard_num, realm_num, $num }
            }

            pub fn to_entity_id(&self) -> Result<EntityId, InvalidEntityId> {
                EntityId::of(self.shard_num, self.realm_num, self.$num)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard_num, self.realm_num, self.$num)
            }
        }
    };
}

numeric_id!(FileId, file_num);
numeric_id!(ScheduleId, schedule_num);
numeric_id!(TokenId, token_num);
numeric_id!(TopicId, topic_num);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NftId {
    pub token_id: TokenId,
    pub serial_number: i64,
}

/// Either a fungible token or a single NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenReference {
    FungibleToken(TokenId),
    Nft(NftId),
}

impl TokenReference {
    pub fn token_id(&self) -> TokenId {
        match self {
            Self::FungibleToken(token_id) => *token_id,
            Self::Nft(nft) => nft.token_id,
        }
    }

    /// `0` for fungible tokens.
    pub fn serial_number(&self) -> i64 {
        match self {
            Self::FungibleToken(_) => 0,
            Self::Nft(nft) => nft.serial_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingAirdropId {
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub token_reference: TokenReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub transaction_valid_start: Timestamp,
    #[serde(default)]
    pub scheduled: bool,
    #[serde(default)]
    pub nonce: i32,
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:09}",
            self.account_id, self.transaction_valid_start.seconds, self.transaction_valid_start.nanos
        )
    }
}
