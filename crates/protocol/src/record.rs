//! Execution results: receipts and records.

use serde::{Deserialize, Serialize};

use crate::body::AccountAmount;
use crate::ids::{
    AccountId, ContractId, FileId, PendingAirdropId, ScheduleId, Timestamp, TokenId, TopicId,
    TransactionId,
};
use crate::response::ResponseCode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub status: ResponseCode,
    #[serde(default)]
    pub account_id: Option<AccountId>,
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    #[serde(default)]
    pub file_id: Option<FileId>,
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    #[serde(default)]
    pub token_id: Option<TokenId>,
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
    #[serde(default)]
    pub node_id: i64,
    #[serde(default)]
    pub topic_sequence_number: i64,
    /// `None` when the record came from a source that no longer carries the running hash.
    #[serde(default)]
    pub topic_running_hash: Option<Vec<u8>>,
    #[serde(default)]
    pub topic_running_hash_version: i64,
    #[serde(default)]
    pub new_total_supply: i64,
    #[serde(default)]
    pub serial_numbers: Vec<i64>,
    #[serde(default)]
    pub scheduled_transaction_id: Option<TransactionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFunctionResult {
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    #[serde(default)]
    pub sender_id: Option<AccountId>,
    #[serde(default)]
    pub signer_nonce: Option<i64>,
    #[serde(default, with = "hex")]
    pub evm_address: Vec<u8>,
    #[serde(default)]
    pub gas_used: i64,
}

/// Output of a pseudo-random number request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entropy {
    PrngBytes(Vec<u8>),
    PrngNumber(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssociation {
    pub token_id: TokenId,
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAirdropRecord {
    pub pending_airdrop_id: PendingAirdropId,
    #[serde(default)]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub receipt: TransactionReceipt,
    pub consensus_timestamp: Timestamp,
    #[serde(default)]
    pub transaction_hash: Vec<u8>,
    #[serde(default)]
    pub transaction_fee: i64,
    #[serde(default, with = "hex")]
    pub alias: Vec<u8>,
    #[serde(default, with = "hex")]
    pub evm_address: Vec<u8>,
    #[serde(default)]
    pub ethereum_hash: Vec<u8>,
    #[serde(default)]
    pub parent_consensus_timestamp: Option<Timestamp>,
    #[serde(default)]
    pub schedule_ref: Option<ScheduleId>,
    #[serde(default)]
    pub entropy: Option<Entropy>,
    #[serde(default)]
    pub contract_result: Option<ContractFunctionResult>,
    #[serde(default)]
    pub transfer_list: Vec<AccountAmount>,
    #[serde(default)]
    pub automatic_token_associations: Vec<TokenAssociation>,
    #[serde(default)]
    pub new_pending_airdrops: Vec<PendingAirdropRecord>,
}
