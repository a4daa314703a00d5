//! Address book nodes and ledger id publication.

use mirror_protocol::{RecordItem, TransactionType};
use mirror_types::{EntityId, FieldUpdate, Ledger, LedgerNodeContribution, Node, Transaction};

use super::TransactionHandler;
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

declare_handler!(NodeCreateHandler);

impl TransactionHandler for NodeCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::NodeCreate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, NodeCreate);
        Ok(self.ctx.account_entity(body.account_id.as_ref()))
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, NodeCreate);
        let timestamp = transaction.consensus_timestamp;

        let mut node = Node::new(item.receipt().node_id, timestamp);
        node.account_id =
            FieldUpdate::Value(self.ctx.resolve_account_or_empty(body.account_id.as_ref()));
        node.admin_key = FieldUpdate::from_option(body.admin_key.clone());
        node.created_timestamp = FieldUpdate::Value(timestamp);
        node.decline_reward = FieldUpdate::Value(body.decline_reward);
        node.deleted = FieldUpdate::Value(false);
        node.description = FieldUpdate::Value(body.description.clone());
        node.grpc_proxy_endpoint = FieldUpdate::from_option(body.grpc_proxy_endpoint.clone());
        self.ctx.listener().on_node(node);
        Ok(())
    }
}

declare_handler!(NodeUpdateHandler);

impl TransactionHandler for NodeUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::NodeUpdate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, NodeUpdate);
        Ok(self.ctx.account_entity(body.account_id.as_ref()))
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, NodeUpdate);

        let mut node = Node::new(body.node_id, transaction.consensus_timestamp);
        if let Some(account_id) = self.ctx.resolve_account(body.account_id.as_ref()) {
            node.account_id = FieldUpdate::Value(account_id);
        }
        node.admin_key = FieldUpdate::from_option(body.admin_key.clone());
        node.decline_reward = FieldUpdate::from_option(body.decline_reward);
        node.description = FieldUpdate::from_option(body.description.clone());
        node.grpc_proxy_endpoint = FieldUpdate::from_option(body.grpc_proxy_endpoint.clone());
        self.ctx.listener().on_node(node);
        Ok(())
    }
}

declare_handler!(NodeDeleteHandler);

impl TransactionHandler for NodeDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::NodeDelete
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, NodeDelete);
        let mut node = Node::new(body.node_id, transaction.consensus_timestamp);
        node.deleted = FieldUpdate::Value(true);
        self.ctx.listener().on_node(node);
        Ok(())
    }
}

declare_handler!(LedgerIdPublicationHandler);

impl TransactionHandler for LedgerIdPublicationHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::LedgerIdPublication
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, LedgerIdPublication);
        self.ctx.listener().on_ledger(Ledger {
            ledger_id: body.ledger_id.clone(),
            consensus_timestamp: transaction.consensus_timestamp,
            history_proof_verification_key: body.history_proof_verification_key.clone(),
            node_contributions: body
                .node_contributions
                .iter()
                .map(|contribution| LedgerNodeContribution {
                    node_id: contribution.node_id,
                    weight: contribution.weight,
                    history_proof_key: contribution.history_proof_key.clone(),
                })
                .collect(),
        });
        Ok(())
    }
}
