//! Resolution of wire account and contract references to entity ids.
//!
//! A lookup that finds nothing is a normal outcome, not an error: callers
//! decide whether to fall back to [`EntityId::EMPTY`], another id, or leave a
//! field unset.

use std::collections::HashMap;
use std::sync::RwLock;

use mirror_protocol::{AccountId, AccountRef, ContractId, ContractRef};
use mirror_types::{Entity, EntityId, FieldUpdate};

pub trait EntityIdResolver: Send + Sync {
    fn lookup_account(&self, account: &AccountId) -> Option<EntityId>;

    fn lookup_contract(&self, contract: &ContractId) -> Option<EntityId>;

    /// Resolves the receipt's contract id when it carries one, the body's otherwise.
    fn lookup_contract_preferred(
        &self,
        receipt: Option<&ContractId>,
        body: Option<&ContractId>,
    ) -> Option<EntityId> {
        match receipt {
            Some(receipt) if !receipt.is_default() => self.lookup_contract(receipt),
            _ => body.and_then(|body| self.lookup_contract(body)),
        }
    }

    /// Called after a newly created entity was projected, so aliases it carries resolve from now on.
    fn notify(&self, _entity: &Entity) {}
}

/// Resolver backed by an in-memory alias table.
///
/// Numeric references and long-zero EVM addresses are decoded directly;
/// anything else is looked up among the aliases and EVM addresses the
/// resolver was seeded with or notified about.
#[derive(Debug, Default)]
pub struct InMemoryEntityIdResolver {
    aliases: RwLock<HashMap<Vec<u8>, EntityId>>,
}

impl InMemoryEntityIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an alias or EVM address for `entity_id`.
    pub fn with_alias(self, alias: impl Into<Vec<u8>>, entity_id: EntityId) -> Self {
        self.insert(alias.into(), entity_id);
        self
    }

    pub fn insert(&self, alias: Vec<u8>, entity_id: EntityId) {
        let mut aliases = self
            .aliases
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        aliases.insert(alias, entity_id);
    }

    pub fn len(&self) -> usize {
        self.aliases
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup_alias(&self, alias: &[u8]) -> Option<EntityId> {
        if let Some(entity_id) = EntityId::from_evm_address(alias) {
            return Some(entity_id);
        }

        let found = self
            .aliases
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(alias)
            .copied();

        if found.is_none() {
            tracing::debug!(
                target: "mirror_importer::parser::resolver",
                alias = %hex::encode(alias),
                "Alias not found"
            );
        }
        found
    }

    fn lookup_numeric(shard: i64, realm: i64, num: i64) -> Option<EntityId> {
        match EntityId::of(shard, realm, num) {
            Ok(entity_id) => Some(entity_id),
            Err(e) => {
                tracing::warn!(
                    target: "mirror_importer::parser::resolver",
                    error = %e,
                    "Unable to encode numeric entity id"
                );
                None
            }
        }
    }
}

impl EntityIdResolver for InMemoryEntityIdResolver {
    fn lookup_account(&self, account: &AccountId) -> Option<EntityId> {
        match &account.account {
            AccountRef::Num(num) => Self::lookup_numeric(account.shard_num, account.realm_num, *num),
            AccountRef::Alias(alias) => self.lookup_alias(alias),
        }
    }

    fn lookup_contract(&self, contract: &ContractId) -> Option<EntityId> {
        match &contract.contract {
            ContractRef::Num(num) => {
                Self::lookup_numeric(contract.shard_num, contract.realm_num, *num)
            }
            ContractRef::EvmAddress(address) => self.lookup_alias(address),
        }
    }

    fn notify(&self, entity: &Entity) {
        if entity.id.is_empty() {
            return;
        }

        if let FieldUpdate::Value(alias) = &entity.alias {
            if !alias.is_empty() {
                self.insert(alias.clone(), entity.id);
            }
        }
        if let FieldUpdate::Value(evm_address) = &entity.evm_address {
            if !evm_address.is_empty() {
                self.insert(evm_address.clone(), entity.id);
            }
        }
    }
}
