//! Network administration and utility transactions.

use chrono::{DateTime, Duration, NaiveTime};
use mirror_protocol::body::{FreezeBody, SystemTarget};
use mirror_protocol::{Entropy, RecordItem, TransactionType};
use mirror_types::{EntityId, EntityType, NetworkFreeze, Prng, Transaction};

use super::{main_entity, HandlerContext, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

/// Handlers whose transactions carry nothing to project.
macro_rules! passthrough_handler {
    ($($(#[$meta:meta])* $name:ident => $kind:ident),* $(,)?) => {
        $(
            declare_handler!($(#[$meta])* $name);

            impl TransactionHandler for $name {
                fn transaction_type(&self) -> TransactionType {
                    TransactionType::$kind
                }
            }
        )*
    };
}

passthrough_handler! {
    /// Inner transactions of a batch arrive as their own record items.
    AtomicBatchHandler => AtomicBatch,
    NodeStakeUpdateHandler => NodeStakeUpdate,
    UncheckedSubmitHandler => UncheckedSubmit,
    /// Union cases the decoder does not know. Only the envelope is recorded.
    UnknownDataHandler => Unknown,
}

// =============================================================================
// Privileged delete and undelete
// =============================================================================

/// Files are addressed by number; contracts that do not resolve become [`EntityId::EMPTY`].
fn system_target(ctx: &HandlerContext, target: Option<&SystemTarget>) -> Result<Option<EntityId>> {
    Ok(match target {
        Some(SystemTarget::FileId(file_id)) => Some(file_id.to_entity_id()?),
        Some(SystemTarget::ContractId(contract_id)) => ctx.contract_entity(Some(contract_id)),
        None => None,
    })
}

fn target_type(target: Option<&SystemTarget>) -> EntityType {
    match target {
        Some(SystemTarget::ContractId(_)) => EntityType::Contract,
        _ => EntityType::File,
    }
}

declare_handler!(SystemDeleteHandler);

impl TransactionHandler for SystemDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::SystemDelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, SystemDelete);
        system_target(&self.ctx, body.target.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, SystemDelete);
        if let Some(id) = main_entity(transaction) {
            let entity_type = target_type(body.target.as_ref());
            let entity = self.ctx.crud().entity(item, id, entity_type);
            self.ctx.listener().on_entity(entity);
        }
        Ok(())
    }
}

declare_handler!(SystemUndeleteHandler);

impl TransactionHandler for SystemUndeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::SystemUndelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, SystemUndelete);
        system_target(&self.ctx, body.target.as_ref())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, SystemUndelete);
        if let Some(id) = main_entity(transaction) {
            let crud = self.ctx.crud();
            let mut entity = crud.entity(item, id, target_type(body.target.as_ref()));
            crud.undelete(&mut entity);
            self.ctx.listener().on_entity(entity);
        }
        Ok(())
    }
}

// =============================================================================
// Freeze
// =============================================================================

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;

/// Nanoseconds of `hour:minute` on the UTC day of `consensus_timestamp`.
fn time_of_consensus_day(consensus_timestamp: i64, hour: i32, minute: i32) -> Option<i64> {
    let seconds = consensus_timestamp.div_euclid(NANOS_PER_SECOND);
    let midnight = DateTime::from_timestamp(seconds, 0)?
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();
    (midnight + Duration::hours(i64::from(hour)) + Duration::minutes(i64::from(minute)))
        .timestamp_nanos_opt()
}

/// Start and end of a freeze window.
///
/// Older networks send hour and minute of the consensus day; an end before the
/// start rolls over to the next day. Newer networks send an absolute start and
/// no end.
fn freeze_window(body: &FreezeBody, consensus_timestamp: i64) -> (i64, Option<i64>) {
    if let Some(start_time) = &body.start_time {
        return (start_time.to_nanos(), None);
    }

    let start = time_of_consensus_day(consensus_timestamp, body.start_hour, body.start_min)
        .unwrap_or(consensus_timestamp);
    let end = time_of_consensus_day(consensus_timestamp, body.end_hour, body.end_min).map(|end| {
        if end < start {
            end + NANOS_PER_DAY
        } else {
            end
        }
    });
    (start, end)
}

declare_handler!(FreezeHandler);

impl TransactionHandler for FreezeHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::Freeze
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, Freeze);
        Ok(body.update_file.as_ref().map(|file| file.to_entity_id()).transpose()?)
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, Freeze);
        let (start_time, end_time) = freeze_window(body, transaction.consensus_timestamp);

        self.ctx.listener().on_network_freeze(NetworkFreeze {
            consensus_timestamp: transaction.consensus_timestamp,
            start_time,
            end_time,
            file_hash: body.file_hash.clone(),
            file_id: main_entity(transaction),
            freeze_type: body.freeze_type,
            payer_account_id: transaction.payer_account_id,
        });
        Ok(())
    }
}

// =============================================================================
// Pseudo-random numbers
// =============================================================================

declare_handler!(UtilPrngHandler);

impl TransactionHandler for UtilPrngHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::UtilPrng
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, UtilPrng);

        let (prng_bytes, prng_number) = match &item.record.entropy {
            Some(Entropy::PrngBytes(bytes)) => (Some(bytes.clone()), None),
            Some(Entropy::PrngNumber(number)) => (None, Some(*number)),
            None => {
                tracing::warn!(
                    target: "mirror_importer::parser::prng",
                    consensus_timestamp = transaction.consensus_timestamp,
                    range = body.range,
                    "PRNG record carries no output"
                );
                return Ok(());
            }
        };

        self.ctx.listener().on_prng(Prng {
            consensus_timestamp: transaction.consensus_timestamp,
            payer_account_id: transaction.payer_account_id,
            range: body.range,
            prng_bytes,
            prng_number,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::{
        AtomicBatchBody, SystemDeleteBody, SystemUndeleteBody, UtilPrngBody,
    };
    use mirror_protocol::{Timestamp, TransactionData};
    use mirror_test_utils::{
        consensus_nanos, contract, entity, evm_contract, file, RecordItemBuilder, CONSENSUS_SECONDS,
    };
    use mirror_types::FieldUpdate;

    use super::*;
    use crate::parser::handler::test_support::Harness;

    const HOUR_NANOS: i64 = 3_600_000_000_000;

    fn freeze(body: FreezeBody) -> RecordItem {
        RecordItemBuilder::new(TransactionData::Freeze(body)).build()
    }

    fn consensus_midnight() -> i64 {
        consensus_nanos() - consensus_nanos().rem_euclid(24 * HOUR_NANOS)
    }

    #[test]
    fn test_freeze_end_before_start_rolls_over() {
        let harness = Harness::new();
        harness.process(&freeze(FreezeBody {
            start_hour: 10,
            end_hour: 3,
            ..FreezeBody::default()
        }));

        let row = &harness.collected().network_freezes[0];
        let midnight = consensus_midnight();
        assert_eq!(row.start_time, midnight + 10 * HOUR_NANOS);
        assert_eq!(row.end_time, Some(midnight + 3 * HOUR_NANOS + 24 * HOUR_NANOS));
    }

    #[test]
    fn test_freeze_same_day_window() {
        let harness = Harness::new();
        harness.process(&freeze(FreezeBody {
            start_hour: 1,
            start_min: 30,
            end_hour: 2,
            ..FreezeBody::default()
        }));

        let row = &harness.collected().network_freezes[0];
        let midnight = consensus_midnight();
        assert_eq!(row.start_time, midnight + HOUR_NANOS + HOUR_NANOS / 2);
        assert_eq!(row.end_time, Some(midnight + 2 * HOUR_NANOS));
    }

    #[test]
    fn test_freeze_with_absolute_start_time() {
        let harness = Harness::new();
        let processed = harness.process(&freeze(FreezeBody {
            start_time: Some(Timestamp::new(CONSENSUS_SECONDS + 60, 5)),
            update_file: Some(file(150)),
            file_hash: vec![0xfe],
            freeze_type: 2,
            ..FreezeBody::default()
        }));

        assert_eq!(processed.transaction.entity_id, Some(entity(150)));
        let row = &harness.collected().network_freezes[0];
        assert_eq!(row.start_time, (CONSENSUS_SECONDS + 60) * 1_000_000_000 + 5);
        assert_eq!(row.end_time, None);
        assert_eq!(row.file_id, Some(entity(150)));
        assert_eq!(row.freeze_type, 2);
    }

    #[test]
    fn test_system_delete_contract_and_file() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::SystemDelete(SystemDeleteBody {
                target: Some(SystemTarget::ContractId(contract(3000))),
                expiration_time: None,
            }))
            .build(),
        );
        harness.process(
            &RecordItemBuilder::new(TransactionData::SystemDelete(SystemDeleteBody {
                target: Some(SystemTarget::FileId(file(1500))),
                expiration_time: None,
            }))
            .build(),
        );

        let entities = harness.collected().entities;
        assert_eq!(entities[0].entity_type, Some(EntityType::Contract));
        assert_eq!(entities[0].deleted, FieldUpdate::Value(true));
        assert_eq!(entities[1].id, entity(1500));
        assert_eq!(entities[1].entity_type, Some(EntityType::File));
    }

    #[test]
    fn test_system_undelete_unresolved_contract_is_empty() {
        let harness = Harness::new();
        let item = RecordItemBuilder::new(TransactionData::SystemUndelete(SystemUndeleteBody {
            target: Some(SystemTarget::ContractId(evm_contract(&[0x31; 20]))),
        }))
        .build();

        let handler = SystemUndeleteHandler::new(harness.processor.context().clone());
        assert_eq!(handler.get_entity(&item).unwrap(), Some(EntityId::EMPTY));

        let processed = harness.process(&item);
        assert_eq!(processed.transaction.entity_id, Some(EntityId::EMPTY));
        assert!(harness.collected().is_empty());
    }

    #[test]
    fn test_system_undelete() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::SystemUndelete(SystemUndeleteBody {
                target: Some(SystemTarget::ContractId(contract(3000))),
            }))
            .build(),
        );
        assert_eq!(harness.collected().entities[0].deleted, FieldUpdate::Value(false));
    }

    #[test]
    fn test_prng_outputs() {
        let harness = Harness::new();
        let prng = |entropy| {
            RecordItemBuilder::new(TransactionData::UtilPrng(UtilPrngBody { range: 100 }))
                .record(|record| record.entropy = entropy)
                .build()
        };

        harness.process(&prng(Some(Entropy::PrngNumber(42))));
        harness.process(&prng(Some(Entropy::PrngBytes(vec![7; 48]))));
        harness.process(&prng(None));

        let prngs = harness.collected().prngs;
        assert_eq!(prngs.len(), 2);
        assert_eq!(prngs[0].prng_number, Some(42));
        assert_eq!(prngs[0].prng_bytes, None);
        assert_eq!(prngs[1].prng_bytes, Some(vec![7; 48]));
    }

    #[test]
    fn test_passthrough_kinds_project_nothing() {
        let harness = Harness::new();
        let processed = harness.process(
            &RecordItemBuilder::new(TransactionData::AtomicBatch(AtomicBatchBody {
                transactions: vec![vec![1, 2, 3]],
            }))
            .build(),
        );
        harness.process(&RecordItemBuilder::new(TransactionData::Unknown).build());

        assert_eq!(processed.transaction.entity_id, None);
        assert_eq!(processed.entity_transactions.len(), 2);
        assert!(harness.collected().is_empty());
    }
}
