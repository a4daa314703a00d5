//! Sinks for projected rows.
//!
//! Handlers call one `on_*` method per row they produce. Listeners own
//! batching and persistence; the default implementation of every method
//! drops the row, so a listener only implements the rows it cares about.

mod collect;
mod composite;
mod log;

pub use collect::{Collected, CollectingEntityListener};
pub use composite::CompositeEntityListener;
pub use log::LoggingEntityListener;

use mirror_types::{
    Contract, CryptoAllowance, CustomFee, Entity, EthereumTransaction, FileData, Hook,
    HookStorageChange, Ledger, LiveHash, NetworkFreeze, Nft, NftAllowance, Node, Prng, Schedule,
    Token, TokenAccount, TokenAirdrop, TokenAllowance, TopicMessage,
};

pub trait EntityListener: Send + Sync {
    fn name(&self) -> &str;

    fn on_contract(&self, _contract: Contract) {}

    fn on_crypto_allowance(&self, _allowance: CryptoAllowance) {}

    fn on_custom_fee(&self, _custom_fee: CustomFee) {}

    fn on_entity(&self, _entity: Entity) {}

    fn on_ethereum_transaction(&self, _transaction: EthereumTransaction) {}

    fn on_file_data(&self, _file_data: FileData) {}

    fn on_hook(&self, _hook: Hook) {}

    fn on_hook_storage_change(&self, _change: HookStorageChange) {}

    fn on_ledger(&self, _ledger: Ledger) {}

    fn on_live_hash(&self, _live_hash: LiveHash) {}

    fn on_network_freeze(&self, _freeze: NetworkFreeze) {}

    fn on_nft(&self, _nft: Nft) {}

    fn on_nft_allowance(&self, _allowance: NftAllowance) {}

    fn on_node(&self, _node: Node) {}

    fn on_prng(&self, _prng: Prng) {}

    fn on_schedule(&self, _schedule: Schedule) {}

    fn on_token(&self, _token: Token) {}

    fn on_token_account(&self, _token_account: TokenAccount) {}

    fn on_token_airdrop(&self, _airdrop: TokenAirdrop) {}

    fn on_token_allowance(&self, _allowance: TokenAllowance) {}

    fn on_topic_message(&self, _message: TopicMessage) {}
}
