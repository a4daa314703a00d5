use mirror_protocol::{RecordItem, TransactionType};
use mirror_types::{EntityId, EntityType, EthereumTransaction, FieldUpdate, Transaction};

use super::TransactionHandler;
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

declare_handler!(
    /// Ethereum transactions wrap a contract create or call. The primary
    /// entity is the contract the execution touched.
    EthereumTransactionHandler
);

impl TransactionHandler for EthereumTransactionHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::EthereumTransaction
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let result_contract = item
            .record
            .contract_result
            .as_ref()
            .and_then(|result| result.contract_id.as_ref());
        Ok(self
            .ctx
            .contract_entity(result_contract.or(item.receipt().contract_id.as_ref())))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, EthereumTransaction);
        if let Some(file_id) = &body.call_data_file {
            entity_transactions.track(file_id.to_entity_id()?);
        }
        let sender = item
            .record
            .contract_result
            .as_ref()
            .and_then(|result| result.sender_id.as_ref());
        entity_transactions.track_opt(self.ctx.resolve_account(sender));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, EthereumTransaction);

        let call_data_id = body
            .call_data_file
            .as_ref()
            .map(|file_id| file_id.to_entity_id())
            .transpose()?;
        self.ctx.listener().on_ethereum_transaction(EthereumTransaction {
            consensus_timestamp: transaction.consensus_timestamp,
            hash: item.record.ethereum_hash.clone(),
            payer_account_id: transaction.payer_account_id,
            data: body.ethereum_data.clone(),
            call_data: (!body.call_data.is_empty()).then(|| body.call_data.clone()),
            call_data_id,
            chain_id: body.chain_id.clone(),
            gas_limit: body.gas_limit,
            max_gas_allowance: body.max_gas_allowance,
            nonce: body.nonce,
            to_address: body.to_address.clone(),
            value: body.value.clone(),
        });

        let Some(result) = &item.record.contract_result else {
            return Ok(());
        };
        let (Some(sender), Some(nonce)) = (
            self.ctx.resolve_account(result.sender_id.as_ref()),
            result.signer_nonce,
        ) else {
            return Ok(());
        };

        let mut signer = self.ctx.crud().entity(item, sender, EntityType::Account);
        signer.ethereum_nonce = FieldUpdate::Value(nonce);
        self.ctx.listener().on_entity(signer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::EthereumTransactionBody;
    use mirror_protocol::{ContractFunctionResult, ResponseCode, TransactionData};
    use mirror_test_utils::{account, contract, entity, file, RecordItemBuilder, PAYER};

    use super::*;
    use crate::parser::handler::test_support::Harness;

    fn ethereum(call_data: Vec<u8>) -> RecordItemBuilder {
        RecordItemBuilder::new(TransactionData::EthereumTransaction(EthereumTransactionBody {
            ethereum_data: vec![0x02, 0xf8],
            call_data_file: Some(file(1600)),
            call_data,
            chain_id: vec![0x01, 0x2a],
            gas_limit: 300_000,
            nonce: 4,
            to_address: Some(vec![0x11; 20]),
            ..EthereumTransactionBody::default()
        }))
        .record(|record| {
            record.ethereum_hash = vec![0xab; 32];
            record.contract_result = Some(ContractFunctionResult {
                contract_id: Some(contract(3000)),
                sender_id: Some(account(2000)),
                signer_nonce: Some(5),
                ..ContractFunctionResult::default()
            });
        })
    }

    #[test]
    fn test_projects_ethereum_transaction_and_signer_nonce() {
        let harness = Harness::new();
        let processed = harness.process(&ethereum(vec![]).build());
        assert_eq!(processed.transaction.entity_id, Some(entity(3000)));

        let collected = harness.collected();
        let row = &collected.ethereum_transactions[0];
        assert_eq!(row.hash, vec![0xab; 32]);
        assert_eq!(row.payer_account_id, entity(PAYER));
        assert_eq!(row.call_data, None);
        assert_eq!(row.call_data_id, Some(entity(1600)));
        assert_eq!(row.gas_limit, 300_000);
        assert_eq!(row.nonce, 4);

        assert_eq!(collected.entities.len(), 1);
        assert_eq!(collected.entities[0].id, entity(2000));
        assert_eq!(collected.entities[0].ethereum_nonce, FieldUpdate::Value(5));

        let tracked: Vec<EntityId> = processed
            .entity_transactions
            .iter()
            .map(|e| e.entity_id)
            .collect();
        assert!(tracked.contains(&entity(1600)));
        assert!(tracked.contains(&entity(2000)));
    }

    #[test]
    fn test_inline_call_data_is_kept() {
        let harness = Harness::new();
        harness.process(&ethereum(vec![0xca, 0xfe]).build());
        assert_eq!(
            harness.collected().ethereum_transactions[0].call_data,
            Some(vec![0xca, 0xfe])
        );
    }

    #[test]
    fn test_receipt_contract_used_without_result() {
        let harness = Harness::new();
        let item = ethereum(vec![])
            .record(|record| record.contract_result = None)
            .receipt(|receipt| receipt.contract_id = Some(contract(3005)))
            .build();

        let processed = harness.process(&item);
        assert_eq!(processed.transaction.entity_id, Some(entity(3005)));
        assert!(harness.collected().entities.is_empty());
    }

    #[test]
    fn test_failed_transaction_projects_nothing() {
        let harness = Harness::new();
        let item = ethereum(vec![])
            .status(ResponseCode::INSUFFICIENT_PAYER_BALANCE)
            .build();

        harness.process(&item);
        assert!(harness.collected().is_empty());
    }
}
