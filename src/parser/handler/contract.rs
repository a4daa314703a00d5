//! Smart contract service.

use mirror_protocol::body::{ContractCreateBody, InitcodeSource};
use mirror_protocol::{RecordItem, TransactionData, TransactionType};
use mirror_types::{Contract, EntityId, EntityType, FieldUpdate, Transaction};

use super::hook::HookExecutionCollector;
use super::{main_entity, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

declare_handler!(ContractCreateHandler);

impl ContractCreateHandler {
    /// Initcode comes from the body, then from the referenced file, then from
    /// the parent ethereum transaction when this create is its child.
    fn contract(&self, id: EntityId, item: &RecordItem, body: &ContractCreateBody) -> Result<Contract> {
        let bytecode = self.ctx.bytecode();
        let mut contract = Contract {
            id,
            file_id: None,
            initcode: None,
        };

        match &body.initcode_source {
            Some(InitcodeSource::Initcode(initcode)) => contract.initcode = Some(initcode.clone()),
            Some(InitcodeSource::FileId(file_id)) => {
                let file_id = file_id.to_entity_id()?;
                contract.file_id = Some(file_id);
                contract.initcode = bytecode.contract_bytecode(file_id);
            }
            None => {}
        }

        if contract.initcode.is_some() {
            return Ok(contract);
        }

        if let Some(TransactionData::EthereumTransaction(ethereum)) = item.parent().map(RecordItem::data) {
            if !ethereum.call_data.is_empty() {
                contract.initcode = Some(ethereum.call_data.clone());
            } else if let Some(file_id) = &ethereum.call_data_file {
                let file_id = file_id.to_entity_id()?;
                contract.file_id.get_or_insert(file_id);
                contract.initcode = bytecode.contract_bytecode(file_id);
            }
        }

        Ok(contract)
    }
}

impl TransactionHandler for ContractCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractCreateInstance
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        Ok(self.ctx.contract_entity(item.receipt().contract_id.as_ref()))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ContractCreateInstance);
        if let Some(InitcodeSource::FileId(file_id)) = &body.initcode_source {
            entity_transactions.track(file_id.to_entity_id()?);
        }
        entity_transactions.track_opt(self.ctx.resolve_account(body.auto_renew_account_id.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ContractCreateInstance);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Contract);
        crud.key(&mut entity, body.admin_key.as_ref());
        crud.create_memo(&mut entity, &body.memo);
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
        crud.auto_renew_account(&mut entity, body.auto_renew_account_id.as_ref());
        crud.max_automatic_token_associations(
            &mut entity,
            Some(body.max_automatic_token_associations),
        );
        crud.staking(
            &mut entity,
            item,
            body.staked_id.as_ref(),
            Some(body.decline_reward),
        );

        let evm_address = item
            .record
            .contract_result
            .as_ref()
            .map(|result| &result.evm_address)
            .filter(|address| !address.is_empty())
            .unwrap_or(&item.record.evm_address);
        if !evm_address.is_empty() {
            entity.evm_address = FieldUpdate::Value(evm_address.clone());
        }

        let contract = self.contract(id, item, body)?;
        self.ctx.resolver().notify(&entity);
        self.ctx.listener().on_entity(entity);
        self.ctx.listener().on_contract(contract);
        self.ctx
            .hooks()
            .on_hooks_created(item, id, &body.hook_creation_details);
        Ok(())
    }
}

declare_handler!(ContractUpdateHandler);

impl TransactionHandler for ContractUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractUpdateInstance
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ContractUpdateInstance);
        Ok(self.ctx.contract_entity(body.contract_id.as_ref()))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ContractUpdateInstance);
        entity_transactions.track_opt(self.ctx.resolve_account(body.auto_renew_account_id.as_ref()));
        entity_transactions.track_opt(self.ctx.resolve_account(body.proxy_account_id.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ContractUpdateInstance);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Contract);
        crud.key(&mut entity, body.admin_key.as_ref());
        crud.expiration(&mut entity, body.expiration_time.as_ref());
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
        crud.auto_renew_account(&mut entity, body.auto_renew_account_id.as_ref());
        crud.max_automatic_token_associations(&mut entity, body.max_automatic_token_associations);
        crud.proxy_account(&mut entity, body.proxy_account_id.as_ref());
        crud.staking(&mut entity, item, body.staked_id.as_ref(), body.decline_reward);

        match &body.memo_wrapper {
            Some(memo) => crud.update_memo(&mut entity, Some(memo)),
            None if !body.memo.is_empty() => crud.update_memo(&mut entity, Some(&body.memo)),
            None => {}
        }

        self.ctx.listener().on_entity(entity);

        let hooks = self.ctx.hooks();
        hooks.on_hooks_deleted(item, id, &body.hook_ids_to_delete);
        hooks.on_hooks_created(item, id, &body.hook_creation_details);
        Ok(())
    }
}

declare_handler!(ContractDeleteHandler);

impl TransactionHandler for ContractDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractDeleteInstance
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ContractDeleteInstance);
        Ok(self
            .ctx
            .contract_entity_preferred(item.receipt().contract_id.as_ref(), body.contract_id.as_ref()))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ContractDeleteInstance);
        entity_transactions.track_opt(self.ctx.resolve_account(body.transfer_account_id.as_ref()));
        entity_transactions.track_opt(self.ctx.resolve_contract(body.transfer_contract_id.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ContractDeleteInstance);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Contract);
        crud.obtainer(
            &mut entity,
            body.transfer_account_id.as_ref(),
            body.transfer_contract_id.as_ref(),
        );
        entity.permanent_removal = FieldUpdate::Value(body.permanent_removal);
        self.ctx.listener().on_entity(entity);
        Ok(())
    }
}

declare_handler!(
    /// Contract calls project nothing themselves; the contract results are
    /// persisted elsewhere. Calls executing an allowance hook of their parent
    /// transfer are attributed to the hook owner.
    ContractCallHandler
);

impl TransactionHandler for ContractCallHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractCall
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ContractCall);
        Ok(self
            .ctx
            .contract_entity_preferred(item.receipt().contract_id.as_ref(), body.contract_id.as_ref()))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let (Some(index), Some(parent)) = (item.hook_execution_index, item.parent()) else {
            return Ok(());
        };
        let TransactionData::CryptoTransfer(transfer) = parent.data() else {
            return Ok(());
        };

        let hooks = HookExecutionCollector::from_transfer(transfer, self.ctx.resolver());
        match hooks.hook_at(index) {
            Some(hook) => entity_transactions.track(hook.owner_id),
            None => tracing::debug!(
                target: "mirror_importer::parser::contract",
                index,
                consensus_timestamp = item.consensus_timestamp(),
                "No allowance hook at execution index"
            ),
        }
        Ok(())
    }
}
