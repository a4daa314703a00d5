//! Crypto service: accounts, transfers and live hashes.

use mirror_protocol::{RecordItem, TransactionType};
use mirror_types::{EntityId, EntityType, FieldUpdate, LiveHash, Transaction, EVM_ADDRESS_LENGTH};

use super::hook::HookExecutionCollector;
use super::{main_entity, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

declare_handler!(CryptoCreateHandler);

impl TransactionHandler for CryptoCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoCreateAccount
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        Ok(self.ctx.account_entity(item.receipt().account_id.as_ref()))
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoCreateAccount);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Account);
        crud.key(&mut entity, body.key.as_ref());
        crud.create_memo(&mut entity, &body.memo);
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
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
        entity.receiver_sig_required = FieldUpdate::Value(body.receiver_sig_required);

        let alias = if body.alias.is_empty() {
            &item.record.alias
        } else {
            &body.alias
        };
        if !alias.is_empty() {
            entity.alias = FieldUpdate::Value(alias.clone());
        }
        if !item.record.evm_address.is_empty() {
            entity.evm_address = FieldUpdate::Value(item.record.evm_address.clone());
        } else if alias.len() == EVM_ADDRESS_LENGTH {
            entity.evm_address = FieldUpdate::Value(alias.clone());
        }

        self.ctx.resolver().notify(&entity);
        self.ctx.listener().on_entity(entity);
        self.ctx
            .hooks()
            .on_hooks_created(item, id, &body.hook_creation_details);
        Ok(())
    }
}

declare_handler!(CryptoUpdateHandler);

impl TransactionHandler for CryptoUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoUpdateAccount
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, CryptoUpdateAccount);
        Ok(Some(
            self.ctx
                .account_entity(body.account_id_to_update.as_ref())
                .unwrap_or(EntityId::EMPTY),
        ))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoUpdateAccount);
        entity_transactions.track_opt(self.ctx.resolve_account(body.proxy_account_id.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoUpdateAccount);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Account);
        crud.key(&mut entity, body.key.as_ref());
        crud.expiration(&mut entity, body.expiration_time.as_ref());
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
        crud.update_memo(&mut entity, body.memo.as_ref());
        crud.max_automatic_token_associations(&mut entity, body.max_automatic_token_associations);
        crud.proxy_account(&mut entity, body.proxy_account_id.as_ref());
        crud.staking(&mut entity, item, body.staked_id.as_ref(), body.decline_reward);
        entity.receiver_sig_required = FieldUpdate::from_option(body.receiver_sig_required_wrapper);
        self.ctx.listener().on_entity(entity);

        let hooks = self.ctx.hooks();
        hooks.on_hooks_deleted(item, id, &body.hook_ids_to_delete);
        hooks.on_hooks_created(item, id, &body.hook_creation_details);
        Ok(())
    }
}

declare_handler!(CryptoDeleteHandler);

impl TransactionHandler for CryptoDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoDelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, CryptoDelete);
        Ok(self.ctx.account_entity(body.delete_account_id.as_ref()))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoDelete);
        entity_transactions.track_opt(self.ctx.resolve_account(body.transfer_account_id.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoDelete);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Account);
        crud.obtainer(&mut entity, body.transfer_account_id.as_ref(), None);
        self.ctx.listener().on_entity(entity);
        Ok(())
    }
}

declare_handler!(
    /// Transfers have no primary entity; every party is tracked instead.
    CryptoTransferHandler
);

impl TransactionHandler for CryptoTransferHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoTransfer
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoTransfer);
        let resolver = self.ctx.resolver();

        for transfer in &body.transfers {
            entity_transactions.track_opt(resolver.lookup_account(&transfer.account_id));
        }
        for token_transfers in &body.token_transfers {
            entity_transactions.track(token_transfers.token.to_entity_id()?);
            for transfer in &token_transfers.transfers {
                entity_transactions.track_opt(resolver.lookup_account(&transfer.account_id));
            }
            for nft in &token_transfers.nft_transfers {
                entity_transactions.track_opt(resolver.lookup_account(&nft.sender_account_id));
                entity_transactions.track_opt(resolver.lookup_account(&nft.receiver_account_id));
            }
        }

        let hooks = HookExecutionCollector::from_transfer(body, resolver);
        entity_transactions.track_all(hooks.owners());
        Ok(())
    }
}

declare_handler!(CryptoAddLiveHashHandler);

impl TransactionHandler for CryptoAddLiveHashHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoAddLiveHash
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, CryptoAddLiveHash);
        Ok(self.ctx.account_entity(body.account_id.as_ref()))
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoAddLiveHash);
        if !self.ctx.persist().claims {
            return Ok(());
        }
        let Some(account_id) = main_entity(transaction) else {
            return Ok(());
        };

        self.ctx.listener().on_live_hash(LiveHash {
            consensus_timestamp: transaction.consensus_timestamp,
            account_id,
            hash: body.hash.clone(),
        });
        Ok(())
    }
}

declare_handler!(CryptoDeleteLiveHashHandler);

impl TransactionHandler for CryptoDeleteLiveHashHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoDeleteLiveHash
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, CryptoDeleteLiveHash);
        Ok(self.ctx.account_entity(body.account_of_live_hash.as_ref()))
    }
}
