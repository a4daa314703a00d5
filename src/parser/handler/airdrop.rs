//! Pending airdrops: created by TokenAirdrop, resolved by claim or cancel.
//!
//! Like allowances, repeated airdrop ids within one transaction collapse to
//! the last occurrence.

use std::collections::HashSet;

use mirror_protocol::{PendingAirdropId, RecordItem, TransactionType};
use mirror_types::{EntityId, TimestampRange, TokenAirdrop, TokenAirdropState, Transaction};

use super::{HandlerContext, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

const TARGET: &str = "mirror_importer::parser::airdrop";

type AirdropKey = (EntityId, EntityId, EntityId, i64);

/// Resolves the parties and token of an airdrop id. `None` when either party
/// is unknown to the resolver.
fn airdrop_key(
    ctx: &HandlerContext,
    airdrop: &PendingAirdropId,
    timestamp: i64,
) -> Result<Option<AirdropKey>> {
    let sender = ctx.resolve_account(Some(&airdrop.sender_id));
    let receiver = ctx.resolve_account(Some(&airdrop.receiver_id));
    let (Some(sender), Some(receiver)) = (sender, receiver) else {
        tracing::warn!(
            target: TARGET,
            consensus_timestamp = timestamp,
            sender = %airdrop.sender_id,
            receiver = %airdrop.receiver_id,
            "Skipping airdrop with unresolvable party"
        );
        return Ok(None);
    };
    let token_id = airdrop.token_reference.token_id().to_entity_id()?;
    Ok(Some((
        sender,
        receiver,
        token_id,
        airdrop.token_reference.serial_number(),
    )))
}

fn track_airdrop(
    ctx: &HandlerContext,
    airdrop: &PendingAirdropId,
    entity_transactions: &mut EntityTransactions,
) -> Result<()> {
    entity_transactions.track_opt(ctx.resolve_account(Some(&airdrop.sender_id)));
    entity_transactions.track_opt(ctx.resolve_account(Some(&airdrop.receiver_id)));
    entity_transactions.track(airdrop.token_reference.token_id().to_entity_id()?);
    Ok(())
}

declare_handler!(TokenAirdropHandler);

impl TransactionHandler for TokenAirdropHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenAirdrop
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenAirdrop);
        let resolver = self.ctx.resolver();
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
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        if !self.ctx.persist().tokens {
            return Ok(());
        }
        let timestamp = transaction.consensus_timestamp;

        let mut seen = HashSet::new();
        for pending in item.record.new_pending_airdrops.iter().rev() {
            let Some(key) = airdrop_key(&self.ctx, &pending.pending_airdrop_id, timestamp)? else {
                continue;
            };
            if !seen.insert(key) {
                continue;
            }
            let (sender_account_id, receiver_account_id, token_id, serial_number) = key;
            self.ctx.listener().on_token_airdrop(TokenAirdrop {
                sender_account_id,
                receiver_account_id,
                token_id,
                serial_number,
                amount: pending.amount,
                state: TokenAirdropState::Pending,
                timestamp_range: TimestampRange::since(timestamp),
            });
        }
        Ok(())
    }
}

/// Shared by claim and cancel: both resolve a pending airdrop to a final state.
macro_rules! resolve_airdrop_handler {
    ($($name:ident => $kind:ident, $state:expr;)*) => {
        $(
            declare_handler!($name);

            impl TransactionHandler for $name {
                fn transaction_type(&self) -> TransactionType {
                    TransactionType::$kind
                }

                fn add_entity_ids(
                    &self,
                    _transaction: &Transaction,
                    item: &RecordItem,
                    entity_transactions: &mut EntityTransactions,
                ) -> Result<()> {
                    let body = body!(item, $kind);
                    for airdrop in &body.pending_airdrops {
                        track_airdrop(&self.ctx, airdrop, entity_transactions)?;
                    }
                    Ok(())
                }

                fn project(
                    &self,
                    transaction: &Transaction,
                    item: &RecordItem,
                    _entity_transactions: &mut EntityTransactions,
                ) -> Result<()> {
                    let body = body!(item, $kind);
                    emit_resolved(&self.ctx, transaction, &body.pending_airdrops, $state)
                }
            }
        )*
    };
}

fn emit_resolved(
    ctx: &HandlerContext,
    transaction: &Transaction,
    airdrops: &[PendingAirdropId],
    state: TokenAirdropState,
) -> Result<()> {
    if !ctx.persist().tokens {
        return Ok(());
    }
    let timestamp = transaction.consensus_timestamp;

    let mut seen = HashSet::new();
    for airdrop in airdrops.iter().rev() {
        let Some(key) = airdrop_key(ctx, airdrop, timestamp)? else {
            continue;
        };
        if !seen.insert(key) {
            continue;
        }
        let (sender_account_id, receiver_account_id, token_id, serial_number) = key;
        ctx.listener().on_token_airdrop(TokenAirdrop {
            sender_account_id,
            receiver_account_id,
            token_id,
            serial_number,
            amount: None,
            state,
            timestamp_range: TimestampRange::since(timestamp),
        });
    }
    Ok(())
}

resolve_airdrop_handler! {
    TokenCancelAirdropHandler => TokenCancelAirdrop, TokenAirdropState::Cancelled;
    TokenClaimAirdropHandler => TokenClaimAirdrop, TokenAirdropState::Claimed;
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::{PendingAirdropsBody, TokenAirdropBody, TokenTransferList};
    use mirror_protocol::{NftId, PendingAirdropRecord, ResponseCode, TokenReference, TransactionData};
    use mirror_test_utils::{account, alias_account, entity, token, RecordItemBuilder};

    use super::*;
    use crate::parser::handler::test_support::Harness;

    fn fungible(sender: i64, receiver: i64) -> PendingAirdropId {
        PendingAirdropId {
            sender_id: account(sender),
            receiver_id: account(receiver),
            token_reference: TokenReference::FungibleToken(token(5000)),
        }
    }

    fn nft(serial_number: i64) -> PendingAirdropId {
        PendingAirdropId {
            sender_id: account(2000),
            receiver_id: account(2001),
            token_reference: TokenReference::Nft(NftId {
                token_id: token(5001),
                serial_number,
            }),
        }
    }

    #[test]
    fn test_pending_airdrops_last_write_wins() {
        let harness = Harness::new();
        let item = RecordItemBuilder::new(TransactionData::TokenAirdrop(TokenAirdropBody {
            token_transfers: vec![TokenTransferList {
                token: token(5000),
                ..TokenTransferList::default()
            }],
        }))
        .record(|record| {
            record.new_pending_airdrops = vec![
                PendingAirdropRecord {
                    pending_airdrop_id: fungible(2000, 2001),
                    amount: Some(10),
                },
                PendingAirdropRecord {
                    pending_airdrop_id: nft(1),
                    amount: None,
                },
                PendingAirdropRecord {
                    pending_airdrop_id: fungible(2000, 2001),
                    amount: Some(25),
                },
            ];
        })
        .build();

        let processed = harness.process(&item);
        assert!(processed
            .entity_transactions
            .iter()
            .any(|e| e.entity_id == entity(5000)));

        let airdrops = harness.collected().token_airdrops;
        assert_eq!(airdrops.len(), 2);
        let fungible_row = airdrops.iter().find(|a| a.serial_number == 0).unwrap();
        assert_eq!(fungible_row.amount, Some(25));
        assert_eq!(fungible_row.state, TokenAirdropState::Pending);
        let nft_row = airdrops.iter().find(|a| a.serial_number == 1).unwrap();
        assert_eq!(nft_row.token_id, entity(5001));
        assert_eq!(nft_row.amount, None);
    }

    #[test]
    fn test_claim_and_cancel() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenClaimAirdrop(PendingAirdropsBody {
                pending_airdrops: vec![fungible(2000, 2001), nft(3), fungible(2000, 2001)],
            }))
            .build(),
        );
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenCancelAirdrop(PendingAirdropsBody {
                pending_airdrops: vec![nft(4)],
            }))
            .build(),
        );

        let airdrops = harness.collected().token_airdrops;
        assert_eq!(airdrops.len(), 3);
        assert_eq!(
            airdrops
                .iter()
                .filter(|a| a.state == TokenAirdropState::Claimed)
                .count(),
            2
        );
        let cancelled = airdrops
            .iter()
            .find(|a| a.state == TokenAirdropState::Cancelled)
            .unwrap();
        assert_eq!(cancelled.serial_number, 4);
        assert_eq!(cancelled.receiver_account_id, entity(2001));
    }

    #[test]
    fn test_unresolvable_party_is_skipped_but_tracked() {
        let harness = Harness::new();
        let item = RecordItemBuilder::new(TransactionData::TokenCancelAirdrop(PendingAirdropsBody {
            pending_airdrops: vec![PendingAirdropId {
                sender_id: account(2000),
                receiver_id: alias_account(&[6; 33]),
                token_reference: TokenReference::FungibleToken(token(5000)),
            }],
        }))
        .build();

        let processed = harness.process(&item);
        assert!(harness.collected().token_airdrops.is_empty());
        let tracked: Vec<EntityId> = processed
            .entity_transactions
            .iter()
            .map(|e| e.entity_id)
            .collect();
        assert!(tracked.contains(&entity(2000)));
        assert!(tracked.contains(&entity(5000)));
    }

    #[test]
    fn test_failed_claim_emits_nothing() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenClaimAirdrop(PendingAirdropsBody {
                pending_airdrops: vec![fungible(2000, 2001)],
            }))
            .status(ResponseCode::INVALID_SIGNATURE)
            .build(),
        );
        assert!(harness.collected().is_empty());
    }
}
