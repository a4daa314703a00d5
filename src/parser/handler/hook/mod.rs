//! EVM hook lifecycle and storage.

mod collector;
mod storage;
mod store;

pub use collector::{HookExecutionCollector, HookId};
pub use storage::{effective_value, left_pad32, mapping_slot_for_key, mapping_slot_for_preimage};
pub use store::HookStoreHandler;

use mirror_protocol::body::{HookCreationDetails, HookStorageUpdate, MappingKey};
use mirror_protocol::RecordItem;
use mirror_types::{EntityId, Hook, HookStorageChange, HookType, TimestampRange};

use super::HandlerContext;

const TARGET: &str = "mirror_importer::parser::hook";

/// Projects hook creations, deletions and storage writes for an owner.
pub struct EvmHookHelper<'a> {
    ctx: &'a HandlerContext,
}

impl<'a> EvmHookHelper<'a> {
    pub fn new(ctx: &'a HandlerContext) -> Self {
        Self { ctx }
    }

    pub fn on_hooks_created(
        &self,
        item: &RecordItem,
        owner_id: EntityId,
        details: &[HookCreationDetails],
    ) {
        let timestamp = item.consensus_timestamp();
        for detail in details {
            let lambda = detail.lambda_evm_hook.as_ref();
            let contract_id = lambda.and_then(|lambda| lambda.contract_id.as_ref()).map(|contract| {
                self.ctx
                    .resolver()
                    .lookup_contract(contract)
                    .unwrap_or(EntityId::EMPTY)
            });

            self.ctx.listener().on_hook(Hook {
                hook_id: detail.hook_id,
                owner_id,
                timestamp_range: TimestampRange::since(timestamp),
                admin_key: detail.admin_key.clone(),
                contract_id,
                created_timestamp: Some(timestamp),
                deleted: Some(false),
                extension_point: Some(detail.extension_point),
                hook_type: Some(HookType::Lambda),
            });

            if let Some(lambda) = lambda {
                self.on_storage_updates(item, detail.hook_id, owner_id, &lambda.storage_updates);
            }
        }
    }

    /// Emits a tombstone per deleted hook.
    pub fn on_hooks_deleted(&self, item: &RecordItem, owner_id: EntityId, hook_ids: &[i64]) {
        for hook_id in hook_ids {
            self.ctx.listener().on_hook(Hook::tombstone(
                *hook_id,
                owner_id,
                item.consensus_timestamp(),
            ));
        }
    }

    /// Emits one storage change per written slot, skipping updates that carry nothing.
    pub fn on_storage_updates(
        &self,
        item: &RecordItem,
        hook_id: i64,
        owner_id: EntityId,
        updates: &[HookStorageUpdate],
    ) {
        let consensus_timestamp = item.consensus_timestamp();
        let emit = |key: Vec<u8>, value: &[u8]| {
            self.ctx.listener().on_hook_storage_change(HookStorageChange {
                consensus_timestamp,
                hook_id,
                owner_id,
                key,
                value_written: effective_value(value),
            });
        };

        for update in updates {
            match (&update.storage_slot, &update.mapping_entries) {
                (Some(slot), _) => emit(left_pad32(&slot.key).to_vec(), &slot.value),
                (None, Some(mapping)) => {
                    for entry in &mapping.entries {
                        let slot = match &entry.key {
                            MappingKey::Key(key) => mapping_slot_for_key(key, &mapping.mapping_slot),
                            MappingKey::Preimage(preimage) => {
                                mapping_slot_for_preimage(preimage, &mapping.mapping_slot)
                            }
                        };
                        emit(slot.to_vec(), &entry.value);
                    }
                }
                (None, None) => tracing::warn!(
                    target: TARGET,
                    hook_id,
                    owner_id = %owner_id,
                    consensus_timestamp,
                    "Skipping hook storage update with neither a slot nor mapping entries"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::{
        CryptoCreateAccountBody, LambdaEvmHook, MappingEntries, MappingEntry, StorageSlot,
    };
    use mirror_protocol::TransactionData;
    use mirror_test_utils::{account, contract, entity, evm_contract, RecordItemBuilder};
    use mirror_types::HookExtensionPoint;

    use super::*;
    use crate::parser::handler::test_support::Harness;

    fn details(hook_id: i64, updates: Vec<HookStorageUpdate>) -> HookCreationDetails {
        HookCreationDetails {
            extension_point: HookExtensionPoint::AccountAllowanceHook,
            hook_id,
            lambda_evm_hook: Some(LambdaEvmHook {
                contract_id: Some(contract(4000)),
                storage_updates: updates,
            }),
            admin_key: Some(vec![1, 2]),
        }
    }

    #[test]
    fn test_account_create_emits_hooks_and_storage() {
        let harness = Harness::new();
        let updates = vec![
            HookStorageUpdate {
                storage_slot: Some(StorageSlot {
                    key: vec![0x01],
                    value: vec![0x05],
                }),
                mapping_entries: None,
            },
            HookStorageUpdate::default(),
            HookStorageUpdate {
                storage_slot: None,
                mapping_entries: Some(MappingEntries {
                    mapping_slot: vec![0x02],
                    entries: vec![
                        MappingEntry {
                            key: MappingKey::Key(vec![0xaa]),
                            value: vec![],
                        },
                        MappingEntry {
                            key: MappingKey::Preimage(b"spender".to_vec()),
                            value: vec![0x07],
                        },
                    ],
                }),
            },
        ];
        let item = RecordItemBuilder::new(TransactionData::CryptoCreateAccount(
            CryptoCreateAccountBody {
                hook_creation_details: vec![details(1, updates)],
                ..CryptoCreateAccountBody::default()
            },
        ))
        .receipt(|receipt| receipt.account_id = Some(account(2000)))
        .build();

        harness.process(&item);
        let collected = harness.collected();

        assert_eq!(collected.hooks.len(), 1);
        let hook = &collected.hooks[0];
        assert_eq!(hook.owner_id, entity(2000));
        assert_eq!(hook.contract_id, Some(entity(4000)));
        assert_eq!(hook.created_timestamp, Some(item.consensus_timestamp()));
        assert_eq!(hook.deleted, Some(false));
        assert_eq!(hook.hook_type, Some(HookType::Lambda));

        let changes = &collected.hook_storage_changes;
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].key, left_pad32(&[0x01]).to_vec());
        assert_eq!(changes[0].value_written.as_deref().map(<[u8]>::len), Some(16));
        assert_eq!(changes[1].key, mapping_slot_for_key(&[0xaa], &[0x02]).to_vec());
        assert_eq!(changes[1].value_written, None);
        assert_eq!(
            changes[2].key,
            mapping_slot_for_preimage(b"spender", &[0x02]).to_vec()
        );
        assert!(changes.iter().all(|change| change.hook_id == 1));
    }

    #[test]
    fn test_unresolved_hook_contract_is_empty() {
        let harness = Harness::new();
        let mut detail = details(9, vec![]);
        if let Some(lambda) = detail.lambda_evm_hook.as_mut() {
            lambda.contract_id = Some(evm_contract(&[0x11; 20]));
        }
        let item = RecordItemBuilder::new(TransactionData::CryptoCreateAccount(
            CryptoCreateAccountBody {
                hook_creation_details: vec![detail],
                ..CryptoCreateAccountBody::default()
            },
        ))
        .receipt(|receipt| receipt.account_id = Some(account(2000)))
        .build();

        harness.process(&item);
        assert_eq!(harness.collected().hooks[0].contract_id, Some(EntityId::EMPTY));
    }
}
