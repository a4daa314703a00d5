//! Spending allowances granted by an owner to a spender.

use serde::{Deserialize, Serialize};

use crate::field::TimestampRange;
use crate::id::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoAllowance {
    pub owner: EntityId,
    pub spender: EntityId,
    pub amount: i64,
    pub amount_granted: i64,
    pub payer_account_id: EntityId,
    pub timestamp_range: TimestampRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAllowance {
    pub owner: EntityId,
    pub spender: EntityId,
    pub token_id: EntityId,
    pub amount: i64,
    pub amount_granted: i64,
    pub payer_account_id: EntityId,
    pub timestamp_range: TimestampRange,
}

/// Approval over every serial of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftAllowance {
    pub owner: EntityId,
    pub spender: EntityId,
    pub token_id: EntityId,
    pub approved_for_all: bool,
    pub payer_account_id: EntityId,
    pub timestamp_range: TimestampRange,
}
