//! Accumulates the entities a transaction references.
//!
//! One [`EntityTransaction`] is kept per distinct entity id; the persistence
//! policy decides which ids are recorded at all.

use std::collections::BTreeMap;
use std::sync::Arc;

use mirror_types::{EntityId, EntityTransaction, Transaction};

use crate::properties::ImporterProperties;

#[derive(Debug, Clone)]
pub struct EntityTransactions {
    consensus_timestamp: i64,
    payer_account_id: EntityId,
    result: i32,
    transaction_type: i32,
    properties: Arc<ImporterProperties>,
    entries: BTreeMap<i64, EntityTransaction>,
}

impl EntityTransactions {
    pub fn new(transaction: &Transaction, properties: Arc<ImporterProperties>) -> Self {
        Self {
            consensus_timestamp: transaction.consensus_timestamp,
            payer_account_id: transaction.payer_account_id,
            result: transaction.result,
            transaction_type: transaction.transaction_type,
            properties,
            entries: BTreeMap::new(),
        }
    }

    /// Records `entity_id` unless the policy rejects it. Repeats are ignored.
    pub fn track(&mut self, entity_id: EntityId) {
        if !self
            .properties
            .persist
            .should_persist_entity_transaction(entity_id)
        {
            return;
        }

        let entry = EntityTransaction {
            entity_id,
            consensus_timestamp: self.consensus_timestamp,
            payer_account_id: self.payer_account_id,
            result: self.result,
            transaction_type: self.transaction_type,
        };
        self.entries.entry(entity_id.encoded()).or_insert(entry);
    }

    pub fn track_opt(&mut self, entity_id: Option<EntityId>) {
        if let Some(entity_id) = entity_id {
            self.track(entity_id);
        }
    }

    pub fn track_all(&mut self, entity_ids: impl IntoIterator<Item = EntityId>) {
        for entity_id in entity_ids {
            self.track(entity_id);
        }
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.entries.contains_key(&entity_id.encoded())
    }

    pub fn get(&self, entity_id: EntityId) -> Option<&EntityTransaction> {
        self.entries.get(&entity_id.encoded())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entity ids in encoded order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entries.values().map(|entry| entry.entity_id).collect()
    }

    pub fn into_map(self) -> BTreeMap<i64, EntityTransaction> {
        self.entries
    }

    pub fn into_vec(self) -> Vec<EntityTransaction> {
        self.entries.into_values().collect()
    }
}
