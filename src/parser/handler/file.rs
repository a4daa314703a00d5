//! File service. File contents are persisted as [`FileData`] rows when the
//! file-data policy allows it; the file entity itself is always projected.

use mirror_protocol::{FileId, RecordItem, TransactionType};
use mirror_types::{EntityId, EntityType, FileData, Transaction};

use super::{main_entity, HandlerContext, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

fn file_entity(file_id: Option<&FileId>) -> Result<Option<EntityId>> {
    Ok(file_id.map(FileId::to_entity_id).transpose()?)
}

fn emit_file_data(ctx: &HandlerContext, item: &RecordItem, file_id: EntityId, contents: &[u8]) {
    if !ctx.persist().should_persist_file_data(file_id) {
        return;
    }
    ctx.listener().on_file_data(FileData {
        consensus_timestamp: item.consensus_timestamp(),
        entity_id: file_id,
        file_data: contents.to_vec(),
        transaction_type: item.transaction_type().proto_id(),
    });
}

declare_handler!(FileCreateHandler);

impl TransactionHandler for FileCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileCreate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        file_entity(item.receipt().file_id.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, FileCreate);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::File);
        crud.key(&mut entity, body.keys.as_ref());
        crud.create_memo(&mut entity, &body.memo);
        crud.expiration(&mut entity, body.expiration_time.as_ref());
        self.ctx.listener().on_entity(entity);

        emit_file_data(&self.ctx, item, id, &body.contents);
        Ok(())
    }
}

declare_handler!(FileAppendHandler);

impl TransactionHandler for FileAppendHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileAppend
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, FileAppend);
        file_entity(body.file_id.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, FileAppend);
        if let Some(id) = main_entity(transaction) {
            emit_file_data(&self.ctx, item, id, &body.contents);
        }
        Ok(())
    }
}

declare_handler!(FileUpdateHandler);

impl TransactionHandler for FileUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileUpdate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, FileUpdate);
        file_entity(body.file_id.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, FileUpdate);
        let Some(id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, id, EntityType::File);
        crud.key(&mut entity, body.keys.as_ref());
        crud.expiration(&mut entity, body.expiration_time.as_ref());
        crud.update_memo(&mut entity, body.memo.as_ref());
        self.ctx.listener().on_entity(entity);

        if !body.contents.is_empty() {
            emit_file_data(&self.ctx, item, id, &body.contents);
        }
        Ok(())
    }
}

declare_handler!(FileDeleteHandler);

impl TransactionHandler for FileDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileDelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, FileDelete);
        file_entity(body.file_id.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        if let Some(id) = main_entity(transaction) {
            let entity = self.ctx.crud().entity(item, id, EntityType::File);
            self.ctx.listener().on_entity(entity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::{FileAppendBody, FileCreateBody, FileDeleteBody, FileUpdateBody};
    use mirror_protocol::TransactionData;
    use mirror_test_utils::{entity, file, RecordItemBuilder};
    use mirror_types::FieldUpdate;

    use super::*;
    use crate::parser::handler::test_support::Harness;
    use crate::properties::{ImporterProperties, PersistProperties};

    fn create(num: i64, contents: &[u8]) -> RecordItem {
        RecordItemBuilder::new(TransactionData::FileCreate(FileCreateBody {
            contents: contents.to_vec(),
            keys: Some(vec![0x0a]),
            ..FileCreateBody::default()
        }))
        .receipt(|receipt| receipt.file_id = Some(file(num)))
        .build()
    }

    #[test]
    fn test_create_append_update_rebuild_contents() {
        let harness = Harness::new();
        let id = entity(1500);

        harness.process(&create(1500, b"ab"));
        harness.process(
            &RecordItemBuilder::new(TransactionData::FileAppend(FileAppendBody {
                file_id: Some(file(1500)),
                contents: b"cd".to_vec(),
            }))
            .build(),
        );
        assert_eq!(harness.listener.file_contents(id), Some(b"abcd".to_vec()));

        harness.process(
            &RecordItemBuilder::new(TransactionData::FileUpdate(FileUpdateBody {
                file_id: Some(file(1500)),
                contents: b"ef".to_vec(),
                ..FileUpdateBody::default()
            }))
            .build(),
        );
        assert_eq!(harness.listener.file_contents(id), Some(b"ef".to_vec()));

        let collected = harness.collected();
        let created = &collected.entities[0];
        assert_eq!(created.entity_type, Some(EntityType::File));
        assert_eq!(created.memo, FieldUpdate::Value(String::new()));
        assert_eq!(created.key, FieldUpdate::Value(vec![0x0a]));
        assert!(collected.entities[1].memo.is_unset());
    }

    #[test]
    fn test_update_without_contents_writes_no_file_data() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::FileUpdate(FileUpdateBody {
                file_id: Some(file(1500)),
                memo: Some("renamed".to_string()),
                ..FileUpdateBody::default()
            }))
            .build(),
        );

        let collected = harness.collected();
        assert!(collected.file_data.is_empty());
        assert_eq!(collected.entities[0].memo, FieldUpdate::Value("renamed".to_string()));
    }

    #[test]
    fn test_file_data_policy() {
        let harness = Harness::with_properties(ImporterProperties {
            persist: PersistProperties {
                files: false,
                ..PersistProperties::default()
            },
        });

        harness.process(&create(1500, b"user"));
        harness.process(&create(150, b"system"));

        let collected = harness.collected();
        assert_eq!(collected.entities.len(), 2);
        assert_eq!(collected.file_data.len(), 1);
        assert_eq!(collected.file_data[0].entity_id, entity(150));
    }

    #[test]
    fn test_delete() {
        let harness = Harness::new();
        let processed = harness.process(
            &RecordItemBuilder::new(TransactionData::FileDelete(FileDeleteBody {
                file_id: Some(file(1500)),
            }))
            .build(),
        );

        assert_eq!(processed.transaction.entity_id, Some(entity(1500)));
        assert_eq!(harness.collected().entities[0].deleted, FieldUpdate::Value(true));
    }
}
