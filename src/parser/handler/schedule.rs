//! Schedule service. Projection is gated by `persist.schedules`.

use mirror_protocol::{RecordItem, ScheduleId, TransactionType};
use mirror_types::{EntityId, EntityType, Schedule, Transaction};

use super::{main_entity, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

fn schedule_entity(schedule_id: Option<&ScheduleId>) -> Result<Option<EntityId>> {
    Ok(schedule_id.map(ScheduleId::to_entity_id).transpose()?)
}

declare_handler!(ScheduleCreateHandler);

impl TransactionHandler for ScheduleCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ScheduleCreate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        schedule_entity(item.receipt().schedule_id.as_ref())
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ScheduleCreate);
        entity_transactions.track_opt(self.ctx.resolve_account(body.payer_account_id.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        if !self.ctx.persist().schedules {
            return Ok(());
        }
        let body = body!(item, ScheduleCreate);
        let Some(schedule_id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, schedule_id, EntityType::Schedule);
        crud.key(&mut entity, body.admin_key.as_ref());
        crud.create_memo(&mut entity, &body.memo);
        crud.expiration(&mut entity, body.expiration_time.as_ref());
        self.ctx.listener().on_entity(entity);

        let creator = transaction.payer_account_id;
        self.ctx.listener().on_schedule(Schedule {
            schedule_id,
            consensus_timestamp: transaction.consensus_timestamp,
            creator_account_id: creator,
            payer_account_id: self
                .ctx
                .resolve_account(body.payer_account_id.as_ref())
                .unwrap_or(creator),
            transaction_body: body.scheduled_transaction_body.clone(),
            expiration_time: body.expiration_time.as_ref().map(|time| time.to_nanos()),
            wait_for_expiry: body.wait_for_expiry,
        });
        Ok(())
    }
}

declare_handler!(
    /// Signatures only; the executed transaction arrives as its own record.
    ScheduleSignHandler
);

impl TransactionHandler for ScheduleSignHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ScheduleSign
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ScheduleSign);
        schedule_entity(body.schedule_id.as_ref())
    }
}

declare_handler!(ScheduleDeleteHandler);

impl TransactionHandler for ScheduleDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ScheduleDelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ScheduleDelete);
        schedule_entity(body.schedule_id.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        if !self.ctx.persist().schedules {
            return Ok(());
        }
        if let Some(schedule_id) = main_entity(transaction) {
            let entity = self.ctx.crud().entity(item, schedule_id, EntityType::Schedule);
            self.ctx.listener().on_entity(entity);
        }
        Ok(())
    }
}
