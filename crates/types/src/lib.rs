//! Normalized entity model emitted by the mirror importer.
//!
//! Every mutable column of a history-tracked row is a [`FieldUpdate`], so a
//! row produced by a single transaction describes exactly what that
//! transaction changed.

mod allowance;
mod contract;
mod entity;
mod field;
mod hook;
mod id;
mod records;
mod token;
mod transaction;

pub use allowance::{CryptoAllowance, NftAllowance, TokenAllowance};
pub use contract::{Contract, EthereumTransaction};
pub use entity::Entity;
pub use field::{FieldUpdate, TimestampRange};
pub use hook::{Hook, HookExtensionPoint, HookStorageChange, HookType};
pub use id::{EntityId, EntityType, InvalidEntityId, EVM_ADDRESS_LENGTH};
pub use records::{
    FileData, Ledger, LedgerNodeContribution, LiveHash, NetworkFreeze, Node, Prng, Schedule,
    TopicMessage,
};
pub use token::{
    CustomFee, FallbackFee, FixedFee, FractionalFee, Nft, RoyaltyFee, Token, TokenAccount,
    TokenAirdrop, TokenAirdropState, TokenFreezeStatus, TokenKycStatus, TokenPauseStatus,
    TokenSupplyType, TokenType,
};
pub use transaction::{EntityTransaction, Transaction};
