//! Point-in-time side-effect rows.

use serde::{Deserialize, Serialize};

use crate::field::{FieldUpdate, TimestampRange};
use crate::id::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: EntityId,
    pub consensus_timestamp: i64,
    pub creator_account_id: EntityId,
    pub payer_account_id: EntityId,
    pub transaction_body: Vec<u8>,
    pub expiration_time: Option<i64>,
    pub wait_for_expiry: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMessage {
    pub consensus_timestamp: i64,
    pub topic_id: EntityId,
    pub message: Vec<u8>,
    pub payer_account_id: EntityId,
    pub running_hash: Option<Vec<u8>>,
    pub running_hash_version: Option<i64>,
    pub sequence_number: i64,
    pub chunk_num: Option<i32>,
    pub chunk_total: Option<i32>,
    pub initial_transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveHash {
    pub consensus_timestamp: i64,
    pub account_id: EntityId,
    pub hash: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFreeze {
    pub consensus_timestamp: i64,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub file_hash: Vec<u8>,
    pub file_id: Option<EntityId>,
    pub freeze_type: i32,
    pub payer_account_id: EntityId,
}

/// Output of a pseudo-random number request. Exactly one of the outputs is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prng {
    pub consensus_timestamp: i64,
    pub payer_account_id: EntityId,
    pub range: i32,
    pub prng_bytes: Option<Vec<u8>>,
    pub prng_number: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerNodeContribution {
    pub node_id: i64,
    pub weight: i64,
    pub history_proof_key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub ledger_id: Vec<u8>,
    pub consensus_timestamp: i64,
    pub history_proof_verification_key: Vec<u8>,
    pub node_contributions: Vec<LedgerNodeContribution>,
}

/// Raw file contents written by a file create, append or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    pub consensus_timestamp: i64,
    pub entity_id: EntityId,
    pub file_data: Vec<u8>,
    pub transaction_type: i32,
}

/// Consensus node row, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: i64,
    pub timestamp_range: TimestampRange,

    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub account_id: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub admin_key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub created_timestamp: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub decline_reward: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub deleted: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub description: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub grpc_proxy_endpoint: FieldUpdate<String>,
}

impl Node {
    pub fn new(node_id: i64, timestamp: i64) -> Self {
        Self {
            node_id,
            timestamp_range: TimestampRange::since(timestamp),
            ..Self::default()
        }
    }
}
