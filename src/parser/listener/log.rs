use mirror_types::{
    Contract, CryptoAllowance, CustomFee, Entity, EthereumTransaction, FileData, Hook,
    HookStorageChange, Ledger, LiveHash, NetworkFreeze, Nft, NftAllowance, Node, Prng, Schedule,
    Token, TokenAccount, TokenAirdrop, TokenAllowance, TopicMessage,
};

use super::EntityListener;

/// Logs every projected row at trace level, and the main entity rows at debug.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEntityListener;

impl LoggingEntityListener {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! log_rows {
    ($($method:ident($ty:ty) => $kind:literal),* $(,)?) => {
        $(
            fn $method(&self, row: $ty) {
                tracing::trace!(
                    target: "mirror_importer::parser::log_listener",
                    kind = $kind,
                    row = ?row,
                    "Projected row"
                );
            }
        )*
    };
}

impl EntityListener for LoggingEntityListener {
    fn name(&self) -> &str {
        "log"
    }

    fn on_entity(&self, entity: Entity) {
        tracing::debug!(
            target: "mirror_importer::parser::log_listener",
            entity_id = %entity.id,
            entity_type = ?entity.entity_type,
            timestamp = entity.timestamp_range.lower,
            deleted = ?entity.deleted.value(),
            "Projected entity"
        );
    }

    fn on_token(&self, token: Token) {
        tracing::debug!(
            target: "mirror_importer::parser::log_listener",
            token_id = %token.token_id,
            timestamp = token.timestamp_range.lower,
            total_supply = ?token.total_supply.value(),
            "Projected token"
        );
    }

    log_rows! {
        on_contract(Contract) => "contract",
        on_crypto_allowance(CryptoAllowance) => "crypto_allowance",
        on_custom_fee(CustomFee) => "custom_fee",
        on_ethereum_transaction(EthereumTransaction) => "ethereum_transaction",
        on_file_data(FileData) => "file_data",
        on_hook(Hook) => "hook",
        on_hook_storage_change(HookStorageChange) => "hook_storage_change",
        on_ledger(Ledger) => "ledger",
        on_live_hash(LiveHash) => "live_hash",
        on_network_freeze(NetworkFreeze) => "network_freeze",
        on_nft(Nft) => "nft",
        on_nft_allowance(NftAllowance) => "nft_allowance",
        on_node(Node) => "node",
        on_prng(Prng) => "prng",
        on_schedule(Schedule) => "schedule",
        on_token_account(TokenAccount) => "token_account",
        on_token_airdrop(TokenAirdrop) => "token_airdrop",
        on_token_allowance(TokenAllowance) => "token_allowance",
        on_topic_message(TopicMessage) => "topic_message",
    }
}
