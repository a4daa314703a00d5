//! Token-service rows.

use serde::{Deserialize, Serialize};

use crate::field::{FieldUpdate, TimestampRange};
use crate::id::EntityId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    #[default]
    FungibleCommon,
    NonFungibleUnique,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenSupplyType {
    #[default]
    Infinite,
    Finite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenPauseStatus {
    NotApplicable,
    Paused,
    Unpaused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenFreezeStatus {
    NotApplicable,
    Frozen,
    Unfrozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKycStatus {
    NotApplicable,
    Granted,
    Revoked,
}

/// Token row. Create transactions fill it in; later ones only set what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token_id: EntityId,
    pub timestamp_range: TimestampRange,

    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub created_timestamp: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub decimals: FieldUpdate<u32>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub fee_schedule_key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub freeze_default: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub freeze_key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub initial_supply: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub kyc_key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub max_supply: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub metadata: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub metadata_key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub name: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub pause_key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub pause_status: FieldUpdate<TokenPauseStatus>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub supply_key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub supply_type: FieldUpdate<TokenSupplyType>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub symbol: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub token_type: FieldUpdate<TokenType>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub total_supply: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub treasury_account_id: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub wipe_key: FieldUpdate<Vec<u8>>,
}

impl Token {
    pub fn new(token_id: EntityId, timestamp: i64) -> Self {
        Self {
            token_id,
            timestamp_range: TimestampRange::since(timestamp),
            ..Self::default()
        }
    }
}

/// Non-fungible token instance, keyed by token and serial number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nft {
    pub token_id: EntityId,
    pub serial_number: i64,
    pub timestamp_range: TimestampRange,

    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub account_id: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub created_timestamp: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub delegating_spender: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub deleted: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub metadata: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub spender: FieldUpdate<EntityId>,
}

impl Nft {
    pub fn new(token_id: EntityId, serial_number: i64, timestamp: i64) -> Self {
        Self {
            token_id,
            serial_number,
            timestamp_range: TimestampRange::since(timestamp),
            ..Self::default()
        }
    }
}

/// Account to token relationship, keyed by account and token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub account_id: EntityId,
    pub token_id: EntityId,
    pub timestamp_range: TimestampRange,

    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub associated: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub automatic_association: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub created_timestamp: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub freeze_status: FieldUpdate<TokenFreezeStatus>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub kyc_status: FieldUpdate<TokenKycStatus>,
}

impl TokenAccount {
    pub fn new(account_id: EntityId, token_id: EntityId, timestamp: i64) -> Self {
        Self {
            account_id,
            token_id,
            timestamp_range: TimestampRange::since(timestamp),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenAirdropState {
    Pending,
    Claimed,
    Cancelled,
}

/// A pending airdrop and its resolution.
///
/// Fungible airdrops use serial number `0` and carry an amount; NFT airdrops
/// carry the serial and no amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAirdrop {
    pub sender_account_id: EntityId,
    pub receiver_account_id: EntityId,
    pub token_id: EntityId,
    pub serial_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    pub state: TokenAirdropState,
    pub timestamp_range: TimestampRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFee {
    pub amount: i64,
    pub collector_account_id: Option<EntityId>,
    pub denominating_token_id: Option<EntityId>,
    pub all_collectors_are_exempt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionalFee {
    pub numerator: i64,
    pub denominator: i64,
    pub minimum_amount: i64,
    pub maximum_amount: Option<i64>,
    pub net_of_transfers: bool,
    pub collector_account_id: Option<EntityId>,
    pub all_collectors_are_exempt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackFee {
    pub amount: i64,
    pub denominating_token_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyFee {
    pub numerator: i64,
    pub denominator: i64,
    pub fallback_fee: Option<FallbackFee>,
    pub collector_account_id: Option<EntityId>,
    pub all_collectors_are_exempt: bool,
}

/// The full custom fee schedule of a token at one point in time.
///
/// A list is `None` unless it holds at least one fee; a schedule with every
/// list `None` means the token has no custom fees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFee {
    pub entity_id: EntityId,
    pub timestamp_range: TimestampRange,
    pub fixed_fees: Option<Vec<FixedFee>>,
    pub fractional_fees: Option<Vec<FractionalFee>>,
    pub royalty_fees: Option<Vec<RoyaltyFee>>,
}

impl CustomFee {
    pub fn new(entity_id: EntityId, timestamp: i64) -> Self {
        Self {
            entity_id,
            timestamp_range: TimestampRange::since(timestamp),
            ..Self::default()
        }
    }

    pub fn add_fixed_fee(&mut self, fee: FixedFee) {
        self.fixed_fees.get_or_insert_with(Vec::new).push(fee);
    }

    pub fn add_fractional_fee(&mut self, fee: FractionalFee) {
        self.fractional_fees.get_or_insert_with(Vec::new).push(fee);
    }

    pub fn add_royalty_fee(&mut self, fee: RoyaltyFee) {
        self.royalty_fees.get_or_insert_with(Vec::new).push(fee);
    }

    pub fn is_empty(&self) -> bool {
        self.fixed_fees.is_none() && self.fractional_fees.is_none() && self.royalty_fees.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_fee_lists_stay_unset_until_used() {
        let token = EntityId::of(0, 0, 5000).unwrap();
        let mut fees = CustomFee::new(token, 1);
        assert!(fees.is_empty());

        fees.add_fixed_fee(FixedFee {
            amount: 10,
            collector_account_id: None,
            denominating_token_id: Some(token),
            all_collectors_are_exempt: false,
        });

        assert_eq!(fees.fixed_fees.as_ref().map(Vec::len), Some(1));
        assert!(fees.fractional_fees.is_none());
        assert!(fees.royalty_fees.is_none());
    }
}
