use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Ledger-level envelope row written for every transaction, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub consensus_timestamp: i64,
    /// Primary entity, set by the handler once it classified the transaction.
    pub entity_id: Option<EntityId>,
    pub payer_account_id: EntityId,
    pub node_account_id: Option<EntityId>,
    pub transaction_type: i32,
    pub result: i32,
    pub charged_tx_fee: i64,
    pub max_fee: i64,
    pub memo: Vec<u8>,
    pub nonce: i32,
    pub scheduled: bool,
    pub valid_start_ns: i64,
    pub parent_consensus_timestamp: Option<i64>,
    pub transaction_hash: Vec<u8>,
}

/// An entity referenced by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityTransaction {
    pub entity_id: EntityId,
    pub consensus_timestamp: i64,
    pub payer_account_id: EntityId,
    pub result: i32,
    pub transaction_type: i32,
}
