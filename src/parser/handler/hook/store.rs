use mirror_protocol::body::HookEntityId;
use mirror_protocol::{RecordItem, TransactionType};
use mirror_types::{EntityId, Transaction};

use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;
use crate::parser::handler::{main_entity, TransactionHandler};

declare_handler!(
    /// Writes storage slots of an existing hook.
    HookStoreHandler
);

impl TransactionHandler for HookStoreHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::HookStore
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, HookStore);
        let resolver = self.ctx.resolver();
        let owner = match &body.hook_id.entity_id {
            HookEntityId::AccountId(account) => resolver.lookup_account(account),
            HookEntityId::ContractId(contract) => resolver.lookup_contract(contract),
        };
        Ok(Some(owner.unwrap_or(EntityId::EMPTY)))
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, HookStore);
        let Some(owner_id) = main_entity(transaction) else {
            return Ok(());
        };

        self.ctx
            .hooks()
            .on_storage_updates(item, body.hook_id.hook_id, owner_id, &body.storage_updates);
        Ok(())
    }
}
