//! Approving and removing spending allowances.
//!
//! A body may name the same allowance several times; the last occurrence
//! wins. Entries are walked back to front and every key already seen is
//! skipped, so exactly one row per key is emitted.

use std::collections::HashSet;

use mirror_protocol::{AccountId, RecordItem, TransactionType};
use mirror_types::{
    CryptoAllowance, EntityId, FieldUpdate, Nft, NftAllowance, TimestampRange, TokenAllowance,
    Transaction,
};

use super::{HandlerContext, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

const TARGET: &str = "mirror_importer::parser::allowance";

/// An owner that is absent, `0.0.0` or unknown is the payer.
fn owner_or_payer(ctx: &HandlerContext, owner: Option<&AccountId>, payer: EntityId) -> EntityId {
    match owner {
        Some(owner) if !owner.is_default() => ctx.resolver().lookup_account(owner).unwrap_or(payer),
        _ => payer,
    }
}

fn resolve_spender(ctx: &HandlerContext, spender: Option<&AccountId>, timestamp: i64) -> Option<EntityId> {
    let resolved = ctx.resolve_account(spender);
    if resolved.is_none() {
        tracing::warn!(
            target: TARGET,
            consensus_timestamp = timestamp,
            spender = ?spender.map(ToString::to_string),
            "Skipping allowance with unresolvable spender"
        );
    }
    resolved
}

declare_handler!(CryptoApproveAllowanceHandler);

impl TransactionHandler for CryptoApproveAllowanceHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoApproveAllowance
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoApproveAllowance);
        for allowance in &body.crypto_allowances {
            entity_transactions.track_opt(self.ctx.resolve_account(allowance.owner.as_ref()));
            entity_transactions.track_opt(self.ctx.resolve_account(allowance.spender.as_ref()));
        }
        for allowance in &body.token_allowances {
            entity_transactions.track(allowance.token_id.to_entity_id()?);
            entity_transactions.track_opt(self.ctx.resolve_account(allowance.owner.as_ref()));
            entity_transactions.track_opt(self.ctx.resolve_account(allowance.spender.as_ref()));
        }
        for allowance in &body.nft_allowances {
            entity_transactions.track(allowance.token_id.to_entity_id()?);
            entity_transactions.track_opt(self.ctx.resolve_account(allowance.owner.as_ref()));
            entity_transactions.track_opt(self.ctx.resolve_account(allowance.spender.as_ref()));
            entity_transactions
                .track_opt(self.ctx.resolve_account(allowance.delegating_spender.as_ref()));
        }
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoApproveAllowance);
        let timestamp = transaction.consensus_timestamp;
        let payer = transaction.payer_account_id;
        let listener = self.ctx.listener();

        let mut seen = HashSet::new();
        for allowance in body.crypto_allowances.iter().rev() {
            let owner = owner_or_payer(&self.ctx, allowance.owner.as_ref(), payer);
            let Some(spender) = resolve_spender(&self.ctx, allowance.spender.as_ref(), timestamp)
            else {
                continue;
            };
            if seen.insert((owner, spender)) {
                listener.on_crypto_allowance(CryptoAllowance {
                    owner,
                    spender,
                    amount: allowance.amount,
                    amount_granted: allowance.amount,
                    payer_account_id: payer,
                    timestamp_range: TimestampRange::since(timestamp),
                });
            }
        }

        let mut seen = HashSet::new();
        for allowance in body.token_allowances.iter().rev() {
            let owner = owner_or_payer(&self.ctx, allowance.owner.as_ref(), payer);
            let Some(spender) = resolve_spender(&self.ctx, allowance.spender.as_ref(), timestamp)
            else {
                continue;
            };
            let token_id = allowance.token_id.to_entity_id()?;
            if seen.insert((owner, spender, token_id)) {
                listener.on_token_allowance(TokenAllowance {
                    owner,
                    spender,
                    token_id,
                    amount: allowance.amount,
                    amount_granted: allowance.amount,
                    payer_account_id: payer,
                    timestamp_range: TimestampRange::since(timestamp),
                });
            }
        }

        let mut seen_allowances = HashSet::new();
        let mut seen_serials = HashSet::new();
        for allowance in body.nft_allowances.iter().rev() {
            let owner = owner_or_payer(&self.ctx, allowance.owner.as_ref(), payer);
            let Some(spender) = resolve_spender(&self.ctx, allowance.spender.as_ref(), timestamp)
            else {
                continue;
            };
            let token_id = allowance.token_id.to_entity_id()?;

            if let Some(approved_for_all) = allowance.approved_for_all {
                if seen_allowances.insert((owner, spender, token_id)) {
                    listener.on_nft_allowance(NftAllowance {
                        owner,
                        spender,
                        token_id,
                        approved_for_all,
                        payer_account_id: payer,
                        timestamp_range: TimestampRange::since(timestamp),
                    });
                }
            }

            let delegating_spender = self
                .ctx
                .resolve_account(allowance.delegating_spender.as_ref())
                .unwrap_or(EntityId::EMPTY);
            for serial_number in allowance.serial_numbers.iter().rev() {
                if seen_serials.insert((token_id, *serial_number)) {
                    let mut nft = Nft::new(token_id, *serial_number, timestamp);
                    nft.spender = FieldUpdate::Value(spender);
                    nft.delegating_spender = FieldUpdate::Value(delegating_spender);
                    listener.on_nft(nft);
                }
            }
        }

        Ok(())
    }
}

declare_handler!(CryptoDeleteAllowanceHandler);

impl TransactionHandler for CryptoDeleteAllowanceHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoDeleteAllowance
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoDeleteAllowance);
        for allowance in &body.nft_allowances {
            entity_transactions.track(allowance.token_id.to_entity_id()?);
            entity_transactions.track_opt(self.ctx.resolve_account(allowance.owner.as_ref()));
        }
        Ok(())
    }

    fn project(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        _entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, CryptoDeleteAllowance);
        let mut seen = HashSet::new();
        for allowance in body.nft_allowances.iter().rev() {
            let token_id = allowance.token_id.to_entity_id()?;
            for serial_number in allowance.serial_numbers.iter().rev() {
                if seen.insert((token_id, *serial_number)) {
                    let mut nft = Nft::new(token_id, *serial_number, transaction.consensus_timestamp);
                    nft.spender = FieldUpdate::Clear;
                    nft.delegating_spender = FieldUpdate::Clear;
                    self.ctx.listener().on_nft(nft);
                }
            }
        }
        Ok(())
    }
}
