//! Consensus service: topics and their messages.

use mirror_protocol::{RecordItem, TopicId, TransactionType};
use mirror_types::{EntityId, EntityType, FieldUpdate, TopicMessage, Transaction};

use super::{main_entity, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

fn topic_entity(topic_id: Option<&TopicId>) -> Result<Option<EntityId>> {
    Ok(topic_id.map(TopicId::to_entity_id).transpose()?)
}

declare_handler!(ConsensusCreateTopicHandler);

impl TransactionHandler for ConsensusCreateTopicHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusCreateTopic
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        topic_entity(item.receipt().topic_id.as_ref())
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ConsensusCreateTopic);
        entity_transactions.track_opt(self.ctx.resolve_account(body.auto_renew_account.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ConsensusCreateTopic);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Topic);
        crud.key(&mut entity, body.admin_key.as_ref());
        crud.create_memo(&mut entity, &body.memo);
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
        crud.auto_renew_account(&mut entity, body.auto_renew_account.as_ref());
        if let Some(submit_key) = &body.submit_key {
            entity.submit_key = FieldUpdate::Value(submit_key.clone());
        }
        self.ctx.listener().on_entity(entity);
        Ok(())
    }
}

declare_handler!(ConsensusUpdateTopicHandler);

impl TransactionHandler for ConsensusUpdateTopicHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusUpdateTopic
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ConsensusUpdateTopic);
        topic_entity(body.topic_id.as_ref())
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ConsensusUpdateTopic);
        entity_transactions.track_opt(self.ctx.resolve_account(body.auto_renew_account.as_ref()));
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, ConsensusUpdateTopic);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::Topic);
        crud.key(&mut entity, body.admin_key.as_ref());
        crud.update_memo(&mut entity, body.memo.as_ref());
        crud.expiration(&mut entity, body.expiration_time.as_ref());
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
        crud.auto_renew_account(&mut entity, body.auto_renew_account.as_ref());
        if let Some(submit_key) = &body.submit_key {
            entity.submit_key = FieldUpdate::Value(submit_key.clone());
        }
        self.ctx.listener().on_entity(entity);
        Ok(())
    }
}

declare_handler!(ConsensusDeleteTopicHandler);

impl TransactionHandler for ConsensusDeleteTopicHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusDeleteTopic
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ConsensusDeleteTopic);
        topic_entity(body.topic_id.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        if let Some(id) = main_entity(transaction) {
            let entity = self.ctx.crud().entity(item, id, EntityType::Topic);
            self.ctx.listener().on_entity(entity);
        }
        Ok(())
    }
}

/// Running hash version as stored: `0` predates versioning and means `1`. No
/// version at all when the record carries no running hash.
fn running_hash_version(running_hash: Option<&Vec<u8>>, version: i64) -> Option<i64> {
    running_hash?;
    Some(match version {
        0 => 1,
        version => version,
    })
}

declare_handler!(ConsensusSubmitMessageHandler);

impl TransactionHandler for ConsensusSubmitMessageHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusSubmitMessage
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, ConsensusSubmitMessage);
        topic_entity(body.topic_id.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        if !self.ctx.persist().topics {
            return Ok(());
        }
        let body = body!(item, ConsensusSubmitMessage);
        let Some(topic_id) = main_entity(transaction) else {
            return Ok(());
        };

        let receipt = item.receipt();
        let chunk = body.chunk_info.as_ref();
        self.ctx.listener().on_topic_message(TopicMessage {
            consensus_timestamp: transaction.consensus_timestamp,
            topic_id,
            message: body.message.clone(),
            payer_account_id: transaction.payer_account_id,
            running_hash: receipt.topic_running_hash.clone(),
            running_hash_version: running_hash_version(
                receipt.topic_running_hash.as_ref(),
                receipt.topic_running_hash_version,
            ),
            sequence_number: receipt.topic_sequence_number,
            chunk_num: chunk.map(|chunk| chunk.number),
            chunk_total: chunk.map(|chunk| chunk.total),
            initial_transaction_id: chunk
                .and_then(|chunk| chunk.initial_transaction_id.as_ref())
                .map(ToString::to_string),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::{
        ChunkInfo, ConsensusCreateTopicBody, ConsensusSubmitMessageBody, ConsensusUpdateTopicBody,
    };
    use mirror_protocol::{TransactionData, TransactionId};
    use mirror_test_utils::{account, alias_account, entity, topic, RecordItemBuilder, PAYER};

    use super::*;
    use crate::parser::handler::test_support::Harness;
    use crate::properties::{ImporterProperties, PersistProperties};

    fn submit(running_hash: Option<Vec<u8>>, version: i64) -> RecordItem {
        RecordItemBuilder::new(TransactionData::ConsensusSubmitMessage(
            ConsensusSubmitMessageBody {
                topic_id: Some(topic(2000)),
                message: b"hello".to_vec(),
                chunk_info: None,
            },
        ))
        .receipt(|receipt| {
            receipt.topic_running_hash = running_hash;
            receipt.topic_running_hash_version = version;
            receipt.topic_sequence_number = 7;
        })
        .build()
    }

    #[test]
    fn test_running_hash_version_mapping() {
        let harness = Harness::new();
        harness.process(&submit(Some(vec![1; 48]), 0));
        harness.process(&submit(Some(vec![1; 48]), 2));
        harness.process(&submit(None, 3));

        let messages = harness.collected().topic_messages;
        assert_eq!(messages[0].running_hash_version, Some(1));
        assert_eq!(messages[1].running_hash_version, Some(2));
        assert_eq!(messages[2].running_hash_version, None);
        assert_eq!(messages[2].running_hash, None);
        assert_eq!(messages[0].sequence_number, 7);
        assert_eq!(messages[0].topic_id, entity(2000));
    }

    #[test]
    fn test_chunk_info_passthrough() {
        let harness = Harness::new();
        let initial = TransactionId {
            account_id: account(PAYER),
            ..TransactionId::default()
        };
        let item = RecordItemBuilder::new(TransactionData::ConsensusSubmitMessage(
            ConsensusSubmitMessageBody {
                topic_id: Some(topic(2000)),
                message: vec![1],
                chunk_info: Some(ChunkInfo {
                    initial_transaction_id: Some(initial.clone()),
                    total: 3,
                    number: 2,
                }),
            },
        ))
        .build();

        harness.process(&item);
        let message = &harness.collected().topic_messages[0];
        assert_eq!(message.chunk_num, Some(2));
        assert_eq!(message.chunk_total, Some(3));
        assert_eq!(message.initial_transaction_id, Some(initial.to_string()));
    }

    #[test]
    fn test_topics_disabled_still_tracks_topic() {
        let harness = Harness::with_properties(ImporterProperties {
            persist: PersistProperties {
                topics: false,
                ..PersistProperties::default()
            },
        });

        let processed = harness.process(&submit(Some(vec![1]), 2));
        assert!(harness.collected().is_empty());
        assert!(processed
            .entity_transactions
            .iter()
            .any(|e| e.entity_id == entity(2000)));
    }

    #[test]
    fn test_create_and_update_topic() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::ConsensusCreateTopic(
                ConsensusCreateTopicBody {
                    submit_key: Some(vec![9]),
                    auto_renew_account: Some(account(2001)),
                    ..ConsensusCreateTopicBody::default()
                },
            ))
            .receipt(|receipt| receipt.topic_id = Some(topic(2000)))
            .build(),
        );
        harness.process(
            &RecordItemBuilder::new(TransactionData::ConsensusUpdateTopic(
                ConsensusUpdateTopicBody {
                    topic_id: Some(topic(2000)),
                    auto_renew_account: Some(alias_account(&[4; 33])),
                    ..ConsensusUpdateTopicBody::default()
                },
            ))
            .build(),
        );

        let entities = harness.collected().entities;
        assert_eq!(entities[0].entity_type, Some(EntityType::Topic));
        assert_eq!(entities[0].memo, FieldUpdate::Value(String::new()));
        assert_eq!(entities[0].submit_key, FieldUpdate::Value(vec![9]));
        assert_eq!(entities[0].auto_renew_account_id, FieldUpdate::Value(entity(2001)));
        assert!(entities[1].memo.is_unset());
        assert!(entities[1].auto_renew_account_id.is_unset());
    }
}
