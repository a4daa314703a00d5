//! EVM hooks attached to accounts and contracts.

use serde::{Deserialize, Serialize};

use crate::field::TimestampRange;
use crate::id::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookExtensionPoint {
    AccountAllowanceHook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookType {
    Lambda,
}

/// Hook row, keyed by owner and hook id.
///
/// A deletion is written as a tombstone: `deleted = Some(true)` with every
/// descriptive field `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub hook_id: i64,
    pub owner_id: EntityId,
    pub timestamp_range: TimestampRange,
    pub admin_key: Option<Vec<u8>>,
    pub contract_id: Option<EntityId>,
    pub created_timestamp: Option<i64>,
    pub deleted: Option<bool>,
    pub extension_point: Option<HookExtensionPoint>,
    pub hook_type: Option<HookType>,
}

impl Hook {
    pub fn tombstone(hook_id: i64, owner_id: EntityId, timestamp: i64) -> Self {
        Self {
            hook_id,
            owner_id,
            timestamp_range: TimestampRange::since(timestamp),
            admin_key: None,
            contract_id: None,
            created_timestamp: None,
            deleted: Some(true),
            extension_point: None,
            hook_type: None,
        }
    }
}

/// One storage slot write. `value_written = None` deletes the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookStorageChange {
    pub consensus_timestamp: i64,
    pub hook_id: i64,
    pub owner_id: EntityId,
    pub key: Vec<u8>,
    pub value_written: Option<Vec<u8>>,
}
