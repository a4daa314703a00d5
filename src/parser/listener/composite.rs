//! CompositeEntityListener fans every row out to several listeners
//!
//! Listeners are called in registration order and each receives its own copy
//! of the row.

use std::sync::Arc;

use mirror_types::{
    Contract, CryptoAllowance, CustomFee, Entity, EthereumTransaction, FileData, Hook,
    HookStorageChange, Ledger, LiveHash, NetworkFreeze, Nft, NftAllowance, Node, Prng, Schedule,
    Token, TokenAccount, TokenAirdrop, TokenAllowance, TopicMessage,
};

use super::EntityListener;

pub struct CompositeEntityListener {
    listeners: Vec<Arc<dyn EntityListener>>,
}

impl CompositeEntityListener {
    pub fn new(listeners: Vec<Arc<dyn EntityListener>>) -> Self {
        tracing::debug!(
            target: "mirror_importer::parser::composite_listener",
            "Composite listener over [{}]",
            listeners.iter().map(|l| l.name()).collect::<Vec<_>>().join(", ")
        );
        Self { listeners }
    }

    /// Get all listeners (useful for accessing specific listeners after creation)
    pub fn listeners(&self) -> &[Arc<dyn EntityListener>] {
        &self.listeners
    }

    fn fan_out<T: Clone>(&self, row: T, call: impl Fn(&dyn EntityListener, T)) {
        let Some((last, rest)) = self.listeners.split_last() else {
            return;
        };
        for listener in rest {
            call(listener.as_ref(), row.clone());
        }
        call(last.as_ref(), row);
    }
}

macro_rules! fan_out {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(&self, row: $ty) {
                self.fan_out(row, |listener, row| listener.$method(row));
            }
        )*
    };
}

impl EntityListener for CompositeEntityListener {
    fn name(&self) -> &str {
        "composite"
    }

    fan_out! {
        on_contract(Contract),
        on_crypto_allowance(CryptoAllowance),
        on_custom_fee(CustomFee),
        on_entity(Entity),
        on_ethereum_transaction(EthereumTransaction),
        on_file_data(FileData),
        on_hook(Hook),
        on_hook_storage_change(HookStorageChange),
        on_ledger(Ledger),
        on_live_hash(LiveHash),
        on_network_freeze(NetworkFreeze),
        on_nft(Nft),
        on_nft_allowance(NftAllowance),
        on_node(Node),
        on_prng(Prng),
        on_schedule(Schedule),
        on_token(Token),
        on_token_account(TokenAccount),
        on_token_airdrop(TokenAirdrop),
        on_token_allowance(TokenAllowance),
        on_topic_message(TopicMessage),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mirror_types::{EntityId, EntityType};

    use super::*;
    use crate::parser::listener::CollectingEntityListener;

    // Mock listener counting entity rows
    struct CountingListener {
        entities: AtomicUsize,
    }

    impl EntityListener for CountingListener {
        fn name(&self) -> &str {
            "counting"
        }

        fn on_entity(&self, _entity: Entity) {
            self.entities.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_every_listener_receives_the_row() {
        let counting = Arc::new(CountingListener {
            entities: AtomicUsize::new(0),
        });
        let collecting = Arc::new(CollectingEntityListener::new());
        let composite = CompositeEntityListener::new(vec![counting.clone(), collecting.clone()]);

        composite.on_entity(Entity::new(EntityId::from_encoded(5), EntityType::Account, 1));
        composite.on_prng(Prng {
            consensus_timestamp: 1,
            payer_account_id: EntityId::from_encoded(2),
            range: 0,
            prng_bytes: Some(vec![1]),
            prng_number: None,
        });

        assert_eq!(counting.entities.load(Ordering::SeqCst), 1);
        let collected = collecting.collected();
        assert_eq!(collected.entities.len(), 1);
        assert_eq!(collected.prngs.len(), 1);
        assert_eq!(composite.listeners().len(), 2);
    }

    #[test]
    fn test_empty_composite_is_a_no_op() {
        let composite = CompositeEntityListener::new(vec![]);
        composite.on_entity(Entity::default());
    }
}
