use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Contract-specific columns kept beside the shared entity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initcode: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumTransaction {
    pub consensus_timestamp: i64,
    pub hash: Vec<u8>,
    pub payer_account_id: EntityId,
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_data_id: Option<EntityId>,
    pub chain_id: Vec<u8>,
    pub gas_limit: i64,
    pub max_gas_allowance: i64,
    pub nonce: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<Vec<u8>>,
    pub value: Vec<u8>,
}
