//! In-memory listener that keeps every row it receives.
//!
//! Besides the raw rows, it folds partial entity rows into their merged
//! current state and rebuilds file contents, which makes it usable as the
//! bytecode source when replaying a stream without a database.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use mirror_protocol::TransactionType;
use mirror_types::{
    Contract, CryptoAllowance, CustomFee, Entity, EntityId, EthereumTransaction, FileData, Hook,
    HookStorageChange, Ledger, LiveHash, NetworkFreeze, Nft, NftAllowance, Node, Prng, Schedule,
    Token, TokenAccount, TokenAirdrop, TokenAllowance, TopicMessage,
};
use serde::Serialize;

use super::EntityListener;
use crate::parser::bytecode::ContractBytecodeSource;

/// Everything a [`CollectingEntityListener`] received, in arrival order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Collected {
    pub contracts: Vec<Contract>,
    pub crypto_allowances: Vec<CryptoAllowance>,
    pub custom_fees: Vec<CustomFee>,
    pub entities: Vec<Entity>,
    pub ethereum_transactions: Vec<EthereumTransaction>,
    pub file_data: Vec<FileData>,
    pub hooks: Vec<Hook>,
    pub hook_storage_changes: Vec<HookStorageChange>,
    pub ledgers: Vec<Ledger>,
    pub live_hashes: Vec<LiveHash>,
    pub network_freezes: Vec<NetworkFreeze>,
    pub nfts: Vec<Nft>,
    pub nft_allowances: Vec<NftAllowance>,
    pub nodes: Vec<Node>,
    pub prngs: Vec<Prng>,
    pub schedules: Vec<Schedule>,
    pub tokens: Vec<Token>,
    pub token_accounts: Vec<TokenAccount>,
    pub token_airdrops: Vec<TokenAirdrop>,
    pub token_allowances: Vec<TokenAllowance>,
    pub topic_messages: Vec<TopicMessage>,
}

impl Collected {
    /// Total number of rows.
    pub fn len(&self) -> usize {
        self.summary().values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row count per kind, omitting kinds with no rows.
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        [
            ("contracts", self.contracts.len()),
            ("crypto_allowances", self.crypto_allowances.len()),
            ("custom_fees", self.custom_fees.len()),
            ("entities", self.entities.len()),
            ("ethereum_transactions", self.ethereum_transactions.len()),
            ("file_data", self.file_data.len()),
            ("hooks", self.hooks.len()),
            ("hook_storage_changes", self.hook_storage_changes.len()),
            ("ledgers", self.ledgers.len()),
            ("live_hashes", self.live_hashes.len()),
            ("network_freezes", self.network_freezes.len()),
            ("nfts", self.nfts.len()),
            ("nft_allowances", self.nft_allowances.len()),
            ("nodes", self.nodes.len()),
            ("prngs", self.prngs.len()),
            ("schedules", self.schedules.len()),
            ("tokens", self.tokens.len()),
            ("token_accounts", self.token_accounts.len()),
            ("token_airdrops", self.token_airdrops.len()),
            ("token_allowances", self.token_allowances.len()),
            ("topic_messages", self.topic_messages.len()),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

#[derive(Debug, Default)]
struct State {
    collected: Collected,
    merged_entities: HashMap<EntityId, Entity>,
    file_contents: HashMap<EntityId, Vec<u8>>,
}

#[derive(Debug, Default)]
pub struct CollectingEntityListener {
    state: Mutex<State>,
}

impl CollectingEntityListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row received so far.
    pub fn collected(&self) -> Collected {
        self.lock().collected.clone()
    }

    /// Current state of an entity with every partial row applied in order.
    pub fn merged_entity(&self, id: EntityId) -> Option<Entity> {
        self.lock().merged_entities.get(&id).cloned()
    }

    /// Current contents of a file.
    pub fn file_contents(&self, id: EntityId) -> Option<Vec<u8>> {
        self.lock().file_contents.get(&id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

macro_rules! collect_rows {
    ($($method:ident($ty:ty) => $field:ident),* $(,)?) => {
        $(
            fn $method(&self, row: $ty) {
                self.lock().collected.$field.push(row);
            }
        )*
    };
}

impl EntityListener for CollectingEntityListener {
    fn name(&self) -> &str {
        "collect"
    }

    fn on_entity(&self, entity: Entity) {
        let mut state = self.lock();
        state
            .merged_entities
            .entry(entity.id)
            .and_modify(|current| current.merge(entity.clone()))
            .or_insert_with(|| entity.clone());
        state.collected.entities.push(entity);
    }

    fn on_file_data(&self, file_data: FileData) {
        let mut state = self.lock();
        let append = file_data.transaction_type == TransactionType::FileAppend.proto_id();
        let contents = state.file_contents.entry(file_data.entity_id).or_default();
        if !append {
            contents.clear();
        }
        contents.extend_from_slice(&file_data.file_data);
        state.collected.file_data.push(file_data);
    }

    collect_rows! {
        on_contract(Contract) => contracts,
        on_crypto_allowance(CryptoAllowance) => crypto_allowances,
        on_custom_fee(CustomFee) => custom_fees,
        on_ethereum_transaction(EthereumTransaction) => ethereum_transactions,
        on_hook(Hook) => hooks,
        on_hook_storage_change(HookStorageChange) => hook_storage_changes,
        on_ledger(Ledger) => ledgers,
        on_live_hash(LiveHash) => live_hashes,
        on_network_freeze(NetworkFreeze) => network_freezes,
        on_nft(Nft) => nfts,
        on_nft_allowance(NftAllowance) => nft_allowances,
        on_node(Node) => nodes,
        on_prng(Prng) => prngs,
        on_schedule(Schedule) => schedules,
        on_token(Token) => tokens,
        on_token_account(TokenAccount) => token_accounts,
        on_token_airdrop(TokenAirdrop) => token_airdrops,
        on_token_allowance(TokenAllowance) => token_allowances,
        on_topic_message(TopicMessage) => topic_messages,
    }
}

impl ContractBytecodeSource for CollectingEntityListener {
    fn contract_bytecode(&self, file_id: EntityId) -> Option<Vec<u8>> {
        self.file_contents(file_id)
    }
}

#[cfg(test)]
mod tests {
    use mirror_types::{EntityType, FieldUpdate};

    use super::*;

    fn file_data(num: i64, kind: TransactionType, data: &[u8], timestamp: i64) -> FileData {
        FileData {
            consensus_timestamp: timestamp,
            entity_id: EntityId::from_encoded(num),
            file_data: data.to_vec(),
            transaction_type: kind.proto_id(),
        }
    }

    #[test]
    fn test_file_contents_follow_create_append_update() {
        let listener = CollectingEntityListener::new();
        let id = EntityId::from_encoded(1500);

        listener.on_file_data(file_data(1500, TransactionType::FileCreate, b"60", 1));
        listener.on_file_data(file_data(1500, TransactionType::FileAppend, b"80", 2));
        assert_eq!(listener.contract_bytecode(id), Some(b"6080".to_vec()));

        listener.on_file_data(file_data(1500, TransactionType::FileUpdate, b"fe", 3));
        assert_eq!(listener.contract_bytecode(id), Some(b"fe".to_vec()));
        assert_eq!(listener.contract_bytecode(EntityId::from_encoded(1)), None);
    }

    #[test]
    fn test_entities_are_merged() {
        let listener = CollectingEntityListener::new();
        let id = EntityId::from_encoded(1001);

        let mut created = Entity::new(id, EntityType::Account, 1);
        created.memo = FieldUpdate::Value("first".to_string());
        created.deleted = FieldUpdate::Value(false);
        listener.on_entity(created);

        let mut deleted = Entity::new(id, EntityType::Account, 2);
        deleted.deleted = FieldUpdate::Value(true);
        listener.on_entity(deleted);

        let merged = listener.merged_entity(id).unwrap();
        assert_eq!(merged.memo, FieldUpdate::Value("first".to_string()));
        assert_eq!(merged.deleted, FieldUpdate::Value(true));
        assert_eq!(merged.timestamp_range.lower, 2);

        let collected = listener.collected();
        assert_eq!(collected.entities.len(), 2);
        assert_eq!(collected.summary().get("entities"), Some(&2));
        assert_eq!(collected.len(), 2);
    }
}
