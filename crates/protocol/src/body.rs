//! Transaction bodies, one struct per transaction kind.
//!
//! Fields mirror the wire messages: scalars that the wire always carries are
//! plain values (a missing string decodes to `""`), while wrapper and message
//! fields that may be absent are `Option`s.

use mirror_types::{HookExtensionPoint, TokenSupplyType, TokenType};
use serde::{Deserialize, Serialize};

use crate::ids::{
    AccountId, ContractId, Duration, FileId, PendingAirdropId, ScheduleId, Timestamp,
    TokenId, TokenReference, TopicId, TransactionId,
};
use crate::kind::TransactionType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    #[serde(default)]
    pub node_account_id: Option<AccountId>,
    #[serde(default)]
    pub transaction_fee: i64,
    #[serde(default)]
    pub memo: String,
    pub data: TransactionData,
}

/// Staking target of an account or contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakedId {
    AccountId(AccountId),
    NodeId(i64),
}

// =============================================================================
// Hooks
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSlot {
    #[serde(with = "hex")]
    pub key: Vec<u8>,
    #[serde(with = "hex")]
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKey {
    Key(#[serde(with = "hex")] Vec<u8>),
    Preimage(#[serde(with = "hex")] Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub key: MappingKey,
    #[serde(with = "hex")]
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntries {
    #[serde(with = "hex")]
    pub mapping_slot: Vec<u8>,
    pub entries: Vec<MappingEntry>,
}

/// A storage write carried by a hook. Well-formed updates set exactly one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookStorageUpdate {
    #[serde(default)]
    pub storage_slot: Option<StorageSlot>,
    #[serde(default)]
    pub mapping_entries: Option<MappingEntries>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaEvmHook {
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    #[serde(default)]
    pub storage_updates: Vec<HookStorageUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCreationDetails {
    pub extension_point: HookExtensionPoint,
    pub hook_id: i64,
    #[serde(default)]
    pub lambda_evm_hook: Option<LambdaEvmHook>,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
}

/// Owner of a hook: an account or a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookEntityId {
    AccountId(AccountId),
    ContractId(ContractId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookIdRef {
    pub entity_id: HookEntityId,
    pub hook_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookStoreBody {
    pub hook_id: HookIdRef,
    #[serde(default)]
    pub storage_updates: Vec<HookStorageUpdate>,
}

/// When an allowance hook runs relative to the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookCallType {
    /// Runs once before the transfer.
    PreTx,
    /// Runs before and again after the transfer.
    PrePostTx,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceHookCall {
    pub hook_id: i64,
    pub call_type: HookCallType,
    #[serde(default)]
    pub gas_limit: i64,
    #[serde(default)]
    pub data: Vec<u8>,
}

// =============================================================================
// Crypto service
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account_id: AccountId,
    pub amount: i64,
    #[serde(default)]
    pub is_approval: bool,
    #[serde(default)]
    pub allowance_hook: Option<AllowanceHookCall>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    pub sender_account_id: AccountId,
    pub receiver_account_id: AccountId,
    pub serial_number: i64,
    #[serde(default)]
    pub is_approval: bool,
    #[serde(default)]
    pub sender_allowance_hook: Option<AllowanceHookCall>,
    #[serde(default)]
    pub receiver_allowance_hook: Option<AllowanceHookCall>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferList {
    pub token: TokenId,
    #[serde(default)]
    pub transfers: Vec<AccountAmount>,
    #[serde(default)]
    pub nft_transfers: Vec<NftTransfer>,
    #[serde(default)]
    pub expected_decimals: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTransferBody {
    #[serde(default)]
    pub transfers: Vec<AccountAmount>,
    #[serde(default)]
    pub token_transfers: Vec<TokenTransferList>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoCreateAccountBody {
    #[serde(default)]
    pub key: Option<Vec<u8>>,
    #[serde(default)]
    pub initial_balance: i64,
    #[serde(default)]
    pub receiver_sig_required: bool,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub max_automatic_token_associations: i32,
    #[serde(default)]
    pub staked_id: Option<StakedId>,
    #[serde(default)]
    pub decline_reward: bool,
    #[serde(default, with = "hex")]
    pub alias: Vec<u8>,
    #[serde(default)]
    pub hook_creation_details: Vec<HookCreationDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoUpdateAccountBody {
    #[serde(default)]
    pub account_id_to_update: Option<AccountId>,
    #[serde(default)]
    pub key: Option<Vec<u8>>,
    #[serde(default)]
    pub expiration_time: Option<Timestamp>,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub receiver_sig_required_wrapper: Option<bool>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub max_automatic_token_associations: Option<i32>,
    #[serde(default)]
    pub staked_id: Option<StakedId>,
    #[serde(default)]
    pub decline_reward: Option<bool>,
    #[serde(default)]
    pub proxy_account_id: Option<AccountId>,
    #[serde(default)]
    pub hook_creation_details: Vec<HookCreationDetails>,
    #[serde(default)]
    pub hook_ids_to_delete: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoDeleteBody {
    #[serde(default)]
    pub delete_account_id: Option<AccountId>,
    #[serde(default)]
    pub transfer_account_id: Option<AccountId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoAddLiveHashBody {
    #[serde(default)]
    pub account_id: Option<AccountId>,
    pub hash: Vec<u8>,
    #[serde(default)]
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoDeleteLiveHashBody {
    #[serde(default)]
    pub account_of_live_hash: Option<AccountId>,
    #[serde(default)]
    pub hash_to_delete: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoAllowanceEntry {
    #[serde(default)]
    pub owner: Option<AccountId>,
    #[serde(default)]
    pub spender: Option<AccountId>,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAllowanceEntry {
    pub token_id: TokenId,
    #[serde(default)]
    pub owner: Option<AccountId>,
    #[serde(default)]
    pub spender: Option<AccountId>,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftAllowanceEntry {
    pub token_id: TokenId,
    #[serde(default)]
    pub owner: Option<AccountId>,
    #[serde(default)]
    pub spender: Option<AccountId>,
    #[serde(default)]
    pub serial_numbers: Vec<i64>,
    #[serde(default)]
    pub approved_for_all: Option<bool>,
    #[serde(default)]
    pub delegating_spender: Option<AccountId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoApproveAllowanceBody {
    #[serde(default)]
    pub crypto_allowances: Vec<CryptoAllowanceEntry>,
    #[serde(default)]
    pub nft_allowances: Vec<NftAllowanceEntry>,
    #[serde(default)]
    pub token_allowances: Vec<TokenAllowanceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftRemoveAllowanceEntry {
    pub token_id: TokenId,
    #[serde(default)]
    pub owner: Option<AccountId>,
    #[serde(default)]
    pub serial_numbers: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoDeleteAllowanceBody {
    #[serde(default)]
    pub nft_allowances: Vec<NftRemoveAllowanceEntry>,
}

// =============================================================================
// Smart contract service
// =============================================================================

/// Where a contract's initcode comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitcodeSource {
    FileId(FileId),
    Initcode(#[serde(with = "hex")] Vec<u8>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCallBody {
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    #[serde(default)]
    pub gas: i64,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub function_parameters: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCreateBody {
    #[serde(default)]
    pub initcode_source: Option<InitcodeSource>,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub gas: i64,
    #[serde(default)]
    pub initial_balance: i64,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub auto_renew_account_id: Option<AccountId>,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub max_automatic_token_associations: i32,
    #[serde(default)]
    pub staked_id: Option<StakedId>,
    #[serde(default)]
    pub decline_reward: bool,
    #[serde(default)]
    pub constructor_parameters: Vec<u8>,
    #[serde(default)]
    pub hook_creation_details: Vec<HookCreationDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractUpdateBody {
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub expiration_time: Option<Timestamp>,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub auto_renew_account_id: Option<AccountId>,
    /// Deprecated plain memo; only honored when non-empty and no wrapper is present.
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub memo_wrapper: Option<String>,
    #[serde(default)]
    pub max_automatic_token_associations: Option<i32>,
    #[serde(default)]
    pub staked_id: Option<StakedId>,
    #[serde(default)]
    pub decline_reward: Option<bool>,
    #[serde(default)]
    pub proxy_account_id: Option<AccountId>,
    #[serde(default)]
    pub hook_creation_details: Vec<HookCreationDetails>,
    #[serde(default)]
    pub hook_ids_to_delete: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeleteBody {
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    #[serde(default)]
    pub transfer_account_id: Option<AccountId>,
    #[serde(default)]
    pub transfer_contract_id: Option<ContractId>,
    #[serde(default)]
    pub permanent_removal: bool,
}

/// An ethereum transaction with the fields the decoder extracted from its RLP payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumTransactionBody {
    #[serde(with = "hex")]
    pub ethereum_data: Vec<u8>,
    #[serde(default)]
    pub call_data_file: Option<FileId>,
    #[serde(default)]
    pub max_gas_allowance: i64,
    #[serde(default, with = "hex")]
    pub call_data: Vec<u8>,
    #[serde(default, with = "hex")]
    pub chain_id: Vec<u8>,
    #[serde(default)]
    pub gas_limit: i64,
    #[serde(default)]
    pub nonce: i64,
    #[serde(default)]
    pub to_address: Option<Vec<u8>>,
    #[serde(default)]
    pub value: Vec<u8>,
}

// =============================================================================
// File service
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreateBody {
    #[serde(default)]
    pub expiration_time: Option<Timestamp>,
    #[serde(default)]
    pub keys: Option<Vec<u8>>,
    #[serde(default)]
    pub contents: Vec<u8>,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAppendBody {
    #[serde(default)]
    pub file_id: Option<FileId>,
    #[serde(default)]
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpdateBody {
    #[serde(default)]
    pub file_id: Option<FileId>,
    #[serde(default)]
    pub expiration_time: Option<Timestamp>,
    #[serde(default)]
    pub keys: Option<Vec<u8>>,
    #[serde(default)]
    pub contents: Vec<u8>,
    #[serde(default)]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDeleteBody {
    #[serde(default)]
    pub file_id: Option<FileId>,
}

// =============================================================================
// Network administration
// =============================================================================

/// Target of a privileged delete or undelete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemTarget {
    FileId(FileId),
    ContractId(ContractId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDeleteBody {
    #[serde(default)]
    pub target: Option<SystemTarget>,
    #[serde(default)]
    pub expiration_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUndeleteBody {
    #[serde(default)]
    pub target: Option<SystemTarget>,
}

/// Network freeze. Older networks send hour/minute of day, newer ones an absolute start time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeBody {
    #[serde(default)]
    pub start_hour: i32,
    #[serde(default)]
    pub start_min: i32,
    #[serde(default)]
    pub end_hour: i32,
    #[serde(default)]
    pub end_min: i32,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub update_file: Option<FileId>,
    #[serde(default)]
    pub file_hash: Vec<u8>,
    #[serde(default)]
    pub freeze_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncheckedSubmitBody {
    #[serde(default)]
    pub transaction_bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStakeUpdateBody {
    #[serde(default)]
    pub end_of_staking_period: Option<Timestamp>,
    #[serde(default)]
    pub staking_period: i64,
    #[serde(default)]
    pub reward_rate: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilPrngBody {
    #[serde(default)]
    pub range: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCreateBody {
    #[serde(default)]
    pub account_id: Option<AccountId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub decline_reward: bool,
    #[serde(default)]
    pub grpc_proxy_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUpdateBody {
    pub node_id: i64,
    #[serde(default)]
    pub account_id: Option<AccountId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub decline_reward: Option<bool>,
    #[serde(default)]
    pub grpc_proxy_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDeleteBody {
    pub node_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContribution {
    pub node_id: i64,
    pub weight: i64,
    #[serde(default)]
    pub history_proof_key: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerIdPublicationBody {
    #[serde(with = "hex")]
    pub ledger_id: Vec<u8>,
    #[serde(default)]
    pub history_proof_verification_key: Vec<u8>,
    #[serde(default)]
    pub node_contributions: Vec<NodeContribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicBatchBody {
    #[serde(default)]
    pub transactions: Vec<Vec<u8>>,
}

// =============================================================================
// Consensus service
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusCreateTopicBody {
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub submit_key: Option<Vec<u8>>,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub auto_renew_account: Option<AccountId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusUpdateTopicBody {
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub expiration_time: Option<Timestamp>,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub submit_key: Option<Vec<u8>>,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub auto_renew_account: Option<AccountId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusDeleteTopicBody {
    #[serde(default)]
    pub topic_id: Option<TopicId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    #[serde(default)]
    pub initial_transaction_id: Option<TransactionId>,
    pub total: i32,
    pub number: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusSubmitMessageBody {
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    #[serde(default)]
    pub message: Vec<u8>,
    #[serde(default)]
    pub chunk_info: Option<ChunkInfo>,
}

// =============================================================================
// Token service
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFeeSpec {
    pub amount: i64,
    #[serde(default)]
    pub denominating_token_id: Option<TokenId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionalFeeSpec {
    pub numerator: i64,
    pub denominator: i64,
    #[serde(default)]
    pub minimum_amount: i64,
    #[serde(default)]
    pub maximum_amount: i64,
    #[serde(default)]
    pub net_of_transfers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyFeeSpec {
    pub numerator: i64,
    pub denominator: i64,
    #[serde(default)]
    pub fallback_fee: Option<FixedFeeSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFeeKind {
    Fixed(FixedFeeSpec),
    Fractional(FractionalFeeSpec),
    Royalty(RoyaltyFeeSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFeeEntry {
    #[serde(default)]
    pub fee_collector_account_id: Option<AccountId>,
    #[serde(default)]
    pub all_collectors_are_exempt: bool,
    pub fee: CustomFeeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreateBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub initial_supply: i64,
    #[serde(default)]
    pub treasury: Option<AccountId>,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub kyc_key: Option<Vec<u8>>,
    #[serde(default)]
    pub freeze_key: Option<Vec<u8>>,
    #[serde(default)]
    pub wipe_key: Option<Vec<u8>>,
    #[serde(default)]
    pub supply_key: Option<Vec<u8>>,
    #[serde(default)]
    pub fee_schedule_key: Option<Vec<u8>>,
    #[serde(default)]
    pub pause_key: Option<Vec<u8>>,
    #[serde(default)]
    pub metadata_key: Option<Vec<u8>>,
    #[serde(default)]
    pub freeze_default: bool,
    #[serde(default)]
    pub expiry: Option<Timestamp>,
    #[serde(default)]
    pub auto_renew_account: Option<AccountId>,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub token_type: TokenType,
    #[serde(default)]
    pub supply_type: TokenSupplyType,
    #[serde(default)]
    pub max_supply: i64,
    #[serde(default)]
    pub custom_fees: Vec<CustomFeeEntry>,
    #[serde(default)]
    pub metadata: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUpdateBody {
    #[serde(default)]
    pub token: Option<TokenId>,
    /// Empty means unchanged.
    #[serde(default)]
    pub name: String,
    /// Empty means unchanged.
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub treasury: Option<AccountId>,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub kyc_key: Option<Vec<u8>>,
    #[serde(default)]
    pub freeze_key: Option<Vec<u8>>,
    #[serde(default)]
    pub wipe_key: Option<Vec<u8>>,
    #[serde(default)]
    pub supply_key: Option<Vec<u8>>,
    #[serde(default)]
    pub fee_schedule_key: Option<Vec<u8>>,
    #[serde(default)]
    pub pause_key: Option<Vec<u8>>,
    #[serde(default)]
    pub metadata_key: Option<Vec<u8>>,
    #[serde(default)]
    pub expiry: Option<Timestamp>,
    #[serde(default)]
    pub auto_renew_account: Option<AccountId>,
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub metadata: Option<Vec<u8>>,
}

/// Body shared by the single-token operations (delete, pause, unpause).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBody {
    #[serde(default)]
    pub token: Option<TokenId>,
}

/// Body shared by freeze, unfreeze, grant KYC and revoke KYC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccountBody {
    #[serde(default)]
    pub token: Option<TokenId>,
    #[serde(default)]
    pub account: Option<AccountId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMintBody {
    #[serde(default)]
    pub token: Option<TokenId>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub metadata: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBurnBody {
    #[serde(default)]
    pub token: Option<TokenId>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub serial_numbers: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWipeBody {
    #[serde(default)]
    pub token: Option<TokenId>,
    #[serde(default)]
    pub account: Option<AccountId>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub serial_numbers: Vec<i64>,
}

/// Body shared by associate and dissociate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssociationBody {
    #[serde(default)]
    pub account: Option<AccountId>,
    #[serde(default)]
    pub tokens: Vec<TokenId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFeeScheduleUpdateBody {
    #[serde(default)]
    pub token_id: Option<TokenId>,
    #[serde(default)]
    pub custom_fees: Vec<CustomFeeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUpdateNftsBody {
    #[serde(default)]
    pub token: Option<TokenId>,
    #[serde(default)]
    pub serial_numbers: Vec<i64>,
    #[serde(default)]
    pub metadata: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRejectBody {
    #[serde(default)]
    pub owner: Option<AccountId>,
    #[serde(default)]
    pub rejections: Vec<TokenReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAirdropBody {
    #[serde(default)]
    pub token_transfers: Vec<TokenTransferList>,
}

/// Body shared by cancel and claim airdrop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAirdropsBody {
    #[serde(default)]
    pub pending_airdrops: Vec<PendingAirdropId>,
}

// =============================================================================
// Schedule service
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCreateBody {
    #[serde(default)]
    pub scheduled_transaction_body: Vec<u8>,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub admin_key: Option<Vec<u8>>,
    #[serde(default)]
    pub payer_account_id: Option<AccountId>,
    #[serde(default)]
    pub expiration_time: Option<Timestamp>,
    #[serde(default)]
    pub wait_for_expiry: bool,
}

/// Body shared by schedule sign and schedule delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBody {
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
}

// =============================================================================
// Tagged union
// =============================================================================

/// The operation a transaction performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum TransactionData {
    AtomicBatch(AtomicBatchBody),
    ConsensusCreateTopic(ConsensusCreateTopicBody),
    ConsensusDeleteTopic(ConsensusDeleteTopicBody),
    ConsensusSubmitMessage(ConsensusSubmitMessageBody),
    ConsensusUpdateTopic(ConsensusUpdateTopicBody),
    ContractCall(ContractCallBody),
    ContractCreateInstance(ContractCreateBody),
    ContractDeleteInstance(ContractDeleteBody),
    ContractUpdateInstance(ContractUpdateBody),
    CryptoAddLiveHash(CryptoAddLiveHashBody),
    CryptoApproveAllowance(CryptoApproveAllowanceBody),
    CryptoCreateAccount(CryptoCreateAccountBody),
    CryptoDelete(CryptoDeleteBody),
    CryptoDeleteAllowance(CryptoDeleteAllowanceBody),
    CryptoDeleteLiveHash(CryptoDeleteLiveHashBody),
    CryptoTransfer(CryptoTransferBody),
    CryptoUpdateAccount(CryptoUpdateAccountBody),
    EthereumTransaction(EthereumTransactionBody),
    FileAppend(FileAppendBody),
    FileCreate(FileCreateBody),
    FileDelete(FileDeleteBody),
    FileUpdate(FileUpdateBody),
    Freeze(FreezeBody),
    HookStore(HookStoreBody),
    LedgerIdPublication(LedgerIdPublicationBody),
    NodeCreate(NodeCreateBody),
    NodeDelete(NodeDeleteBody),
    NodeStakeUpdate(NodeStakeUpdateBody),
    NodeUpdate(NodeUpdateBody),
    ScheduleCreate(ScheduleCreateBody),
    ScheduleDelete(ScheduleBody),
    ScheduleSign(ScheduleBody),
    SystemDelete(SystemDeleteBody),
    SystemUndelete(SystemUndeleteBody),
    TokenAirdrop(TokenAirdropBody),
    TokenAssociate(TokenAssociationBody),
    TokenBurn(TokenBurnBody),
    TokenCancelAirdrop(PendingAirdropsBody),
    TokenClaimAirdrop(PendingAirdropsBody),
    TokenCreation(TokenCreateBody),
    TokenDeletion(TokenBody),
    TokenDissociate(TokenAssociationBody),
    TokenFeeScheduleUpdate(TokenFeeScheduleUpdateBody),
    TokenFreeze(TokenAccountBody),
    TokenGrantKyc(TokenAccountBody),
    TokenMint(TokenMintBody),
    TokenPause(TokenBody),
    TokenReject(TokenRejectBody),
    TokenRevokeKyc(TokenAccountBody),
    TokenUnfreeze(TokenAccountBody),
    TokenUnpause(TokenBody),
    TokenUpdate(TokenUpdateBody),
    TokenUpdateNfts(TokenUpdateNftsBody),
    TokenWipe(TokenWipeBody),
    UncheckedSubmit(UncheckedSubmitBody),
    UtilPrng(UtilPrngBody),
    /// A union case this decoder does not know.
    Unknown,
}

impl TransactionData {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::AtomicBatch(_) => TransactionType::AtomicBatch,
            Self::ConsensusCreateTopic(_) => TransactionType::ConsensusCreateTopic,
            Self::ConsensusDeleteTopic(_) => TransactionType::ConsensusDeleteTopic,
            Self::ConsensusSubmitMessage(_) => TransactionType::ConsensusSubmitMessage,
            Self::ConsensusUpdateTopic(_) => TransactionType::ConsensusUpdateTopic,
            Self::ContractCall(_) => TransactionType::ContractCall,
            Self::ContractCreateInstance(_) => TransactionType::ContractCreateInstance,
            Self::ContractDeleteInstance(_) => TransactionType::ContractDeleteInstance,
            Self::ContractUpdateInstance(_) => TransactionType::ContractUpdateInstance,
            Self::CryptoAddLiveHash(_) => TransactionType::CryptoAddLiveHash,
            Self::CryptoApproveAllowance(_) => TransactionType::CryptoApproveAllowance,
            Self::CryptoCreateAccount(_) => TransactionType::CryptoCreateAccount,
            Self::CryptoDelete(_) => TransactionType::CryptoDelete,
            Self::CryptoDeleteAllowance(_) => TransactionType::CryptoDeleteAllowance,
            Self::CryptoDeleteLiveHash(_) => TransactionType::CryptoDeleteLiveHash,
            Self::CryptoTransfer(_) => TransactionType::CryptoTransfer,
            Self::CryptoUpdateAccount(_) => TransactionType::CryptoUpdateAccount,
            Self::EthereumTransaction(_) => TransactionType::EthereumTransaction,
            Self::FileAppend(_) => TransactionType::FileAppend,
            Self::FileCreate(_) => TransactionType::FileCreate,
            Self::FileDelete(_) => TransactionType::FileDelete,
            Self::FileUpdate(_) => TransactionType::FileUpdate,
            Self::Freeze(_) => TransactionType::Freeze,
            Self::HookStore(_) => TransactionType::HookStore,
            Self::LedgerIdPublication(_) => TransactionType::LedgerIdPublication,
            Self::NodeCreate(_) => TransactionType::NodeCreate,
            Self::NodeDelete(_) => TransactionType::NodeDelete,
            Self::NodeStakeUpdate(_) => TransactionType::NodeStakeUpdate,
            Self::NodeUpdate(_) => TransactionType::NodeUpdate,
            Self::ScheduleCreate(_) => TransactionType::ScheduleCreate,
            Self::ScheduleDelete(_) => TransactionType::ScheduleDelete,
            Self::ScheduleSign(_) => TransactionType::ScheduleSign,
            Self::SystemDelete(_) => TransactionType::SystemDelete,
            Self::SystemUndelete(_) => TransactionType::SystemUndelete,
            Self::TokenAirdrop(_) => TransactionType::TokenAirdrop,
            Self::TokenAssociate(_) => TransactionType::TokenAssociate,
            Self::TokenBurn(_) => TransactionType::TokenBurn,
            Self::TokenCancelAirdrop(_) => TransactionType::TokenCancelAirdrop,
            Self::TokenClaimAirdrop(_) => TransactionType::TokenClaimAirdrop,
            Self::TokenCreation(_) => TransactionType::TokenCreation,
            Self::TokenDeletion(_) => TransactionType::TokenDeletion,
            Self::TokenDissociate(_) => TransactionType::TokenDissociate,
            Self::TokenFeeScheduleUpdate(_) => TransactionType::TokenFeeScheduleUpdate,
            Self::TokenFreeze(_) => TransactionType::TokenFreeze,
            Self::TokenGrantKyc(_) => TransactionType::TokenGrantKyc,
            Self::TokenMint(_) => TransactionType::TokenMint,
            Self::TokenPause(_) => TransactionType::TokenPause,
            Self::TokenReject(_) => TransactionType::TokenReject,
            Self::TokenRevokeKyc(_) => TransactionType::TokenRevokeKyc,
            Self::TokenUnfreeze(_) => TransactionType::TokenUnfreeze,
            Self::TokenUnpause(_) => TransactionType::TokenUnpause,
            Self::TokenUpdate(_) => TransactionType::TokenUpdate,
            Self::TokenUpdateNfts(_) => TransactionType::TokenUpdateNfts,
            Self::TokenWipe(_) => TransactionType::TokenWipe,
            Self::UncheckedSubmit(_) => TransactionType::UncheckedSubmit,
            Self::UtilPrng(_) => TransactionType::UtilPrng,
            Self::Unknown => TransactionType::Unknown,
        }
    }
}
