//! Drives one record item through its handler.
//!
//! The processor builds the [`Transaction`] envelope from the record item,
//! dispatches to the handler registered for the item's type and returns the
//! envelope together with the entity transactions the handler recorded.

use mirror_protocol::RecordItem;
use mirror_types::{EntityId, EntityTransaction, Transaction};
use serde::Serialize;

use super::entity_transactions::EntityTransactions;
use super::handler::{HandlerContext, TransactionHandlerFactory};
use crate::error::Result;

const TARGET: &str = "mirror_importer::parser::processor";

/// Output of processing one record item. Rows go to the listener; this only
/// carries what the caller persists per transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedTransaction {
    pub transaction: Transaction,
    pub entity_transactions: Vec<EntityTransaction>,
}

pub struct TransactionProcessor {
    ctx: HandlerContext,
    factory: TransactionHandlerFactory,
}

impl TransactionProcessor {
    pub fn new(ctx: HandlerContext) -> Result<Self> {
        let factory = TransactionHandlerFactory::new(ctx.clone())?;
        tracing::info!(
            target: TARGET,
            handlers = factory.len(),
            "Initialized transaction processor"
        );
        Ok(Self { ctx, factory })
    }

    pub fn context(&self) -> &HandlerContext {
        &self.ctx
    }

    pub fn process(&self, item: &RecordItem) -> Result<ProcessedTransaction> {
        let kind = item.transaction_type();
        let handler = self.factory.get(kind)?;

        let mut transaction = self.transaction(item);
        let mut entity_transactions =
            EntityTransactions::new(&transaction, self.ctx.properties().clone());
        handler.update_transaction(&mut transaction, item, &mut entity_transactions)?;

        tracing::debug!(
            target: TARGET,
            consensus_timestamp = transaction.consensus_timestamp,
            transaction_type = %kind,
            status = %item.status(),
            entity_id = ?transaction.entity_id.map(|id| id.to_string()),
            entity_transactions = entity_transactions.len(),
            "Processed transaction"
        );

        Ok(ProcessedTransaction {
            transaction,
            entity_transactions: entity_transactions.into_vec(),
        })
    }

    /// The envelope of `item`, before the handler attaches its primary entity.
    fn transaction(&self, item: &RecordItem) -> Transaction {
        let transaction_id = &item.body.transaction_id;
        let payer_account_id = self.ctx.resolve_account(Some(item.payer_account_id()));
        if payer_account_id.is_none() {
            tracing::warn!(
                target: TARGET,
                consensus_timestamp = item.consensus_timestamp(),
                payer = %item.payer_account_id(),
                "Unable to resolve payer account"
            );
        }

        Transaction {
            consensus_timestamp: item.consensus_timestamp(),
            entity_id: None,
            payer_account_id: payer_account_id.unwrap_or(EntityId::EMPTY),
            node_account_id: self.ctx.resolve_account(item.node_account_id()),
            transaction_type: item.transaction_type().proto_id(),
            result: item.status().0,
            charged_tx_fee: item.record.transaction_fee,
            max_fee: item.body.transaction_fee,
            memo: item.body.memo.as_bytes().to_vec(),
            nonce: transaction_id.nonce,
            scheduled: transaction_id.scheduled,
            valid_start_ns: transaction_id.transaction_valid_start.to_nanos(),
            parent_consensus_timestamp: item
                .record
                .parent_consensus_timestamp
                .as_ref()
                .map(|timestamp| timestamp.to_nanos()),
            transaction_hash: item.record.transaction_hash.clone(),
        }
    }
}
