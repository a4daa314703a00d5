//! Per-kind transaction handlers.
//!
//! Every [`TransactionType`] has exactly one [`TransactionHandler`]. The
//! provided [`TransactionHandler::update_transaction`] drives every handler
//! through the same steps:
//!
//! 1. attach the primary entity from [`TransactionHandler::get_entity`]
//! 2. record the primary entity, payer and node as entity transactions
//! 3. record the secondary references of the body ([`TransactionHandler::add_entity_ids`])
//! 4. project rows to the listener ([`TransactionHandler::project`]), only when the
//!    transaction succeeded
//!
//! Handlers hold no per-transaction state; everything they need comes from
//! the [`HandlerContext`] and the record item.

/// Extracts the body of the given union case, returning `Ok(Default::default())` for any other case.
macro_rules! body {
    ($item:expr, $variant:ident) => {
        match $item.data() {
            mirror_protocol::TransactionData::$variant(body) => body,
            _ => return Ok(Default::default()),
        }
    };
}

/// Declares a handler holding only the shared context.
macro_rules! declare_handler {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            ctx: $crate::parser::handler::HandlerContext,
        }

        impl $name {
            pub fn new(ctx: $crate::parser::handler::HandlerContext) -> Self {
                Self { ctx }
            }
        }
    };
}

mod airdrop;
mod allowance;
mod consensus;
mod contract;
mod crud;
mod crypto;
mod ethereum;
mod factory;
mod file;
pub mod hook;
mod node;
mod schedule;
mod system;
mod token;

pub use crud::{epoch_day, is_staking_enabled, EntityCrud, STAKING_ACTIVATION};
pub use factory::TransactionHandlerFactory;

use std::sync::Arc;

use mirror_protocol::{AccountId, ContractId, RecordItem, TransactionType};
use mirror_types::{EntityId, Transaction};

use super::bytecode::{ContractBytecodeSource, NoBytecodeSource};
use super::entity_transactions::EntityTransactions;
use super::listener::EntityListener;
use super::resolver::EntityIdResolver;
use crate::error::Result;
use crate::properties::{ImporterProperties, PersistProperties};

pub trait TransactionHandler: Send + Sync {
    fn transaction_type(&self) -> TransactionType;

    /// The entity this transaction is primarily about.
    ///
    /// `Some(EntityId::EMPTY)` means a lookup was attempted and found nothing;
    /// `None` means the kind has no single primary entity. Has no side effects.
    fn get_entity(&self, _item: &RecordItem) -> Result<Option<EntityId>> {
        Ok(None)
    }

    fn update_transaction(
        &self,
        transaction: &mut Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        if transaction.entity_id.is_none() {
            transaction.entity_id = self.get_entity(item)?;
        }

        entity_transactions.track_opt(transaction.entity_id);
        entity_transactions.track(transaction.payer_account_id);
        entity_transactions.track_opt(transaction.node_account_id);
        self.add_entity_ids(transaction, item, entity_transactions)?;

        if !item.is_successful() {
            tracing::trace!(
                target: "mirror_importer::parser::handler",
                consensus_timestamp = transaction.consensus_timestamp,
                transaction_type = %self.transaction_type(),
                status = %item.status(),
                "Skipping projection of unsuccessful transaction"
            );
            return Ok(());
        }

        self.project(transaction, item, entity_transactions)
    }

    /// Records secondary entity references. Runs whether or not the transaction succeeded.
    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        _item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        Ok(())
    }

    /// Emits the rows of a successful transaction.
    fn project(
        &self,
        _transaction: &Transaction,
        _item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        Ok(())
    }
}

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct HandlerContext {
    listener: Arc<dyn EntityListener>,
    resolver: Arc<dyn EntityIdResolver>,
    bytecode: Arc<dyn ContractBytecodeSource>,
    properties: Arc<ImporterProperties>,
}

impl HandlerContext {
    pub fn new(
        listener: Arc<dyn EntityListener>,
        resolver: Arc<dyn EntityIdResolver>,
        properties: Arc<ImporterProperties>,
    ) -> Self {
        Self {
            listener,
            resolver,
            bytecode: Arc::new(NoBytecodeSource),
            properties,
        }
    }

    pub fn with_bytecode_source(mut self, bytecode: Arc<dyn ContractBytecodeSource>) -> Self {
        self.bytecode = bytecode;
        self
    }

    pub fn listener(&self) -> &dyn EntityListener {
        self.listener.as_ref()
    }

    pub fn resolver(&self) -> &dyn EntityIdResolver {
        self.resolver.as_ref()
    }

    pub fn bytecode(&self) -> &dyn ContractBytecodeSource {
        self.bytecode.as_ref()
    }

    pub fn properties(&self) -> &Arc<ImporterProperties> {
        &self.properties
    }

    pub fn persist(&self) -> &PersistProperties {
        &self.properties.persist
    }

    pub fn crud(&self) -> EntityCrud<'_> {
        EntityCrud::new(self.resolver.as_ref())
    }

    pub fn hooks(&self) -> hook::EvmHookHelper<'_> {
        hook::EvmHookHelper::new(self)
    }

    /// Resolves an optional account reference; `None` when absent or unknown.
    pub fn resolve_account(&self, account: Option<&AccountId>) -> Option<EntityId> {
        account.and_then(|account| self.resolver.lookup_account(account))
    }

    /// Resolves an optional account reference to [`EntityId::EMPTY`] when absent or unknown.
    pub fn resolve_account_or_empty(&self, account: Option<&AccountId>) -> EntityId {
        self.resolve_account(account).unwrap_or(EntityId::EMPTY)
    }

    pub fn resolve_contract(&self, contract: Option<&ContractId>) -> Option<EntityId> {
        contract.and_then(|contract| self.resolver.lookup_contract(contract))
    }

    /// Primary entity named by an account reference: `None` when absent, EMPTY when unknown.
    pub fn account_entity(&self, account: Option<&AccountId>) -> Option<EntityId> {
        account.map(|account| self.resolver.lookup_account(account).unwrap_or(EntityId::EMPTY))
    }

    /// Primary entity named by a contract reference: `None` when absent, EMPTY when unknown.
    pub fn contract_entity(&self, contract: Option<&ContractId>) -> Option<EntityId> {
        contract.map(|contract| {
            self.resolver
                .lookup_contract(contract)
                .unwrap_or(EntityId::EMPTY)
        })
    }

    /// Like [`Self::contract_entity`], preferring the receipt's contract over the body's.
    pub fn contract_entity_preferred(
        &self,
        receipt: Option<&ContractId>,
        body: Option<&ContractId>,
    ) -> Option<EntityId> {
        if receipt.is_none() && body.is_none() {
            return None;
        }
        Some(
            self.resolver
                .lookup_contract_preferred(receipt, body)
                .unwrap_or(EntityId::EMPTY),
        )
    }
}

/// The primary entity of a transaction, unless it is absent or unresolved.
pub(crate) fn main_entity(transaction: &Transaction) -> Option<EntityId> {
    transaction.entity_id.and_then(EntityId::non_empty)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use mirror_protocol::RecordItem;

    use super::HandlerContext;
    use crate::parser::bytecode::{ContractBytecodeSource, NoBytecodeSource};
    use crate::parser::listener::{Collected, CollectingEntityListener};
    use crate::parser::processor::{ProcessedTransaction, TransactionProcessor};
    use crate::parser::resolver::InMemoryEntityIdResolver;
    use crate::properties::ImporterProperties;

    /// Processor wired to a collecting listener and an in-memory resolver.
    pub(crate) struct Harness {
        pub listener: Arc<CollectingEntityListener>,
        pub resolver: Arc<InMemoryEntityIdResolver>,
        pub processor: TransactionProcessor,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::build(
                ImporterProperties::default(),
                InMemoryEntityIdResolver::new(),
                Arc::new(NoBytecodeSource),
            )
        }

        pub fn with_properties(properties: ImporterProperties) -> Self {
            Self::build(properties, InMemoryEntityIdResolver::new(), Arc::new(NoBytecodeSource))
        }

        pub fn with_resolver(resolver: InMemoryEntityIdResolver) -> Self {
            Self::build(ImporterProperties::default(), resolver, Arc::new(NoBytecodeSource))
        }

        pub fn build(
            properties: ImporterProperties,
            resolver: InMemoryEntityIdResolver,
            bytecode: Arc<dyn ContractBytecodeSource>,
        ) -> Self {
            let listener = Arc::new(CollectingEntityListener::new());
            let resolver = Arc::new(resolver);
            let ctx = HandlerContext::new(listener.clone(), resolver.clone(), Arc::new(properties))
                .with_bytecode_source(bytecode);
            let processor = TransactionProcessor::new(ctx).unwrap();
            Self {
                listener,
                resolver,
                processor,
            }
        }

        pub fn process(&self, item: &RecordItem) -> ProcessedTransaction {
            self.processor.process(item).unwrap()
        }

        pub fn collected(&self) -> Collected {
            self.listener.collected()
        }
    }
}
