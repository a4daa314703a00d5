//! Token service.
//!
//! Every projection here is gated by `persist.tokens`; the referenced
//! entities are tracked regardless.

use mirror_protocol::body::{CustomFeeEntry, CustomFeeKind, FixedFeeSpec};
use mirror_protocol::{AccountId, RecordItem, TokenId, TransactionType};
use mirror_types::{
    CustomFee, EntityId, EntityType, FallbackFee, FieldUpdate, FixedFee, FractionalFee, Nft,
    RoyaltyFee, Token, TokenAccount, TokenFreezeStatus, TokenKycStatus, TokenPauseStatus,
    Transaction,
};

use super::{main_entity, HandlerContext, TransactionHandler};
use crate::error::Result;
use crate::parser::entity_transactions::EntityTransactions;

fn token_entity(token_id: Option<&TokenId>) -> Result<Option<EntityId>> {
    Ok(token_id.map(TokenId::to_entity_id).transpose()?)
}

fn set_key(field: &mut FieldUpdate<Vec<u8>>, key: Option<&Vec<u8>>) {
    if let Some(key) = key {
        *field = FieldUpdate::Value(key.clone());
    }
}

// =============================================================================
// Custom fees
// =============================================================================

/// A denominating token of `0.0.0` stands for the token the fee belongs to.
fn denominating_token(token_id: EntityId, denominating: Option<&TokenId>) -> Result<Option<EntityId>> {
    match denominating {
        Some(denominating) => {
            let denominating = denominating.to_entity_id()?;
            Ok(Some(if denominating.is_empty() { token_id } else { denominating }))
        }
        None => Ok(None),
    }
}

fn fixed_fee(
    token_id: EntityId,
    spec: &FixedFeeSpec,
    collector_account_id: Option<EntityId>,
    all_collectors_are_exempt: bool,
) -> Result<FixedFee> {
    Ok(FixedFee {
        amount: spec.amount,
        collector_account_id,
        denominating_token_id: denominating_token(token_id, spec.denominating_token_id.as_ref())?,
        all_collectors_are_exempt,
    })
}

/// The complete fee schedule of `token_id` as of this transaction. An empty
/// schedule is still emitted, it records that the token has no fees.
fn custom_fee(
    ctx: &HandlerContext,
    token_id: EntityId,
    timestamp: i64,
    entries: &[CustomFeeEntry],
) -> Result<CustomFee> {
    let mut custom_fee = CustomFee::new(token_id, timestamp);

    for entry in entries {
        let collector = ctx.resolve_account(entry.fee_collector_account_id.as_ref());
        let exempt = entry.all_collectors_are_exempt;
        match &entry.fee {
            CustomFeeKind::Fixed(spec) => {
                custom_fee.add_fixed_fee(fixed_fee(token_id, spec, collector, exempt)?);
            }
            CustomFeeKind::Fractional(spec) => custom_fee.add_fractional_fee(FractionalFee {
                numerator: spec.numerator,
                denominator: spec.denominator,
                minimum_amount: spec.minimum_amount,
                maximum_amount: (spec.maximum_amount != 0).then_some(spec.maximum_amount),
                net_of_transfers: spec.net_of_transfers,
                collector_account_id: collector,
                all_collectors_are_exempt: exempt,
            }),
            CustomFeeKind::Royalty(spec) => {
                let fallback_fee = spec
                    .fallback_fee
                    .as_ref()
                    .map(|fallback| -> Result<FallbackFee> {
                        Ok(FallbackFee {
                            amount: fallback.amount,
                            denominating_token_id: denominating_token(
                                token_id,
                                fallback.denominating_token_id.as_ref(),
                            )?,
                        })
                    })
                    .transpose()?;
                custom_fee.add_royalty_fee(RoyaltyFee {
                    numerator: spec.numerator,
                    denominator: spec.denominator,
                    fallback_fee,
                    collector_account_id: collector,
                    all_collectors_are_exempt: exempt,
                });
            }
        }
    }

    Ok(custom_fee)
}

fn track_fee_collectors(
    ctx: &HandlerContext,
    entries: &[CustomFeeEntry],
    entity_transactions: &mut EntityTransactions,
) {
    for entry in entries {
        entity_transactions.track_opt(ctx.resolve_account(entry.fee_collector_account_id.as_ref()));
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

declare_handler!(TokenCreateHandler);

impl TransactionHandler for TokenCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenCreation
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        token_entity(item.receipt().token_id.as_ref())
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenCreation);
        entity_transactions.track_opt(self.ctx.resolve_account(body.treasury.as_ref()));
        entity_transactions.track_opt(self.ctx.resolve_account(body.auto_renew_account.as_ref()));
        track_fee_collectors(&self.ctx, &body.custom_fees, entity_transactions);
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
        let body = body!(item, TokenCreation);
        let Some(token_id) = main_entity(transaction) else {
            return Ok(());
        };
        let timestamp = transaction.consensus_timestamp;

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, token_id, EntityType::Token);
        crud.key(&mut entity, body.admin_key.as_ref());
        crud.create_memo(&mut entity, &body.memo);
        crud.expiration(&mut entity, body.expiry.as_ref());
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
        crud.auto_renew_account(&mut entity, body.auto_renew_account.as_ref());
        self.ctx.listener().on_entity(entity);

        let mut token = Token::new(token_id, timestamp);
        token.created_timestamp = FieldUpdate::Value(timestamp);
        token.decimals = FieldUpdate::Value(body.decimals);
        token.freeze_default = FieldUpdate::Value(body.freeze_default);
        token.initial_supply = FieldUpdate::Value(body.initial_supply);
        token.total_supply = FieldUpdate::Value(body.initial_supply);
        token.max_supply = FieldUpdate::Value(body.max_supply);
        token.metadata = FieldUpdate::Value(body.metadata.clone());
        token.name = FieldUpdate::Value(body.name.clone());
        token.symbol = FieldUpdate::Value(body.symbol.clone());
        token.supply_type = FieldUpdate::Value(body.supply_type);
        token.token_type = FieldUpdate::Value(body.token_type);
        token.pause_status = FieldUpdate::Value(if body.pause_key.is_some() {
            TokenPauseStatus::Unpaused
        } else {
            TokenPauseStatus::NotApplicable
        });
        token.treasury_account_id =
            FieldUpdate::Value(self.ctx.resolve_account_or_empty(body.treasury.as_ref()));
        set_key(&mut token.fee_schedule_key, body.fee_schedule_key.as_ref());
        set_key(&mut token.freeze_key, body.freeze_key.as_ref());
        set_key(&mut token.kyc_key, body.kyc_key.as_ref());
        set_key(&mut token.metadata_key, body.metadata_key.as_ref());
        set_key(&mut token.pause_key, body.pause_key.as_ref());
        set_key(&mut token.supply_key, body.supply_key.as_ref());
        set_key(&mut token.wipe_key, body.wipe_key.as_ref());
        self.ctx.listener().on_token(token);

        let fees = custom_fee(&self.ctx, token_id, timestamp, &body.custom_fees)?;
        self.ctx.listener().on_custom_fee(fees);

        // Treasury and fee collectors are associated by the network itself.
        let freeze_status = if body.freeze_key.is_some() {
            TokenFreezeStatus::Unfrozen
        } else {
            TokenFreezeStatus::NotApplicable
        };
        let kyc_status = if body.kyc_key.is_some() {
            TokenKycStatus::Granted
        } else {
            TokenKycStatus::NotApplicable
        };
        for association in &item.record.automatic_token_associations {
            let Some(account_id) = self.ctx.resolve_account(Some(&association.account_id)) else {
                continue;
            };
            let mut token_account =
                TokenAccount::new(account_id, association.token_id.to_entity_id()?, timestamp);
            token_account.associated = FieldUpdate::Value(true);
            token_account.automatic_association = FieldUpdate::Value(false);
            token_account.created_timestamp = FieldUpdate::Value(timestamp);
            token_account.freeze_status = FieldUpdate::Value(freeze_status);
            token_account.kyc_status = FieldUpdate::Value(kyc_status);
            self.ctx.listener().on_token_account(token_account);
        }
        Ok(())
    }
}

declare_handler!(TokenUpdateHandler);

impl TransactionHandler for TokenUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenUpdate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenUpdate);
        token_entity(body.token.as_ref())
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenUpdate);
        entity_transactions.track_opt(self.ctx.resolve_account(body.treasury.as_ref()));
        entity_transactions.track_opt(self.ctx.resolve_account(body.auto_renew_account.as_ref()));
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
        let body = body!(item, TokenUpdate);
        let Some(token_id) = main_entity(transaction) else {
            return Ok(());
        };

        let crud = self.ctx.crud();
        let mut entity = crud.entity(item, token_id, EntityType::Token);
        crud.key(&mut entity, body.admin_key.as_ref());
        crud.update_memo(&mut entity, body.memo.as_ref());
        crud.expiration(&mut entity, body.expiry.as_ref());
        crud.auto_renew_period(&mut entity, body.auto_renew_period.as_ref());
        crud.auto_renew_account(&mut entity, body.auto_renew_account.as_ref());
        self.ctx.listener().on_entity(entity);

        let mut token = Token::new(token_id, transaction.consensus_timestamp);
        if !body.name.is_empty() {
            token.name = FieldUpdate::Value(body.name.clone());
        }
        if !body.symbol.is_empty() {
            token.symbol = FieldUpdate::Value(body.symbol.clone());
        }
        if let Some(metadata) = &body.metadata {
            token.metadata = FieldUpdate::Value(metadata.clone());
        }
        if let Some(treasury) = self.ctx.resolve_account(body.treasury.as_ref()) {
            token.treasury_account_id = FieldUpdate::Value(treasury);
        }
        set_key(&mut token.fee_schedule_key, body.fee_schedule_key.as_ref());
        set_key(&mut token.freeze_key, body.freeze_key.as_ref());
        set_key(&mut token.kyc_key, body.kyc_key.as_ref());
        set_key(&mut token.metadata_key, body.metadata_key.as_ref());
        set_key(&mut token.pause_key, body.pause_key.as_ref());
        set_key(&mut token.supply_key, body.supply_key.as_ref());
        set_key(&mut token.wipe_key, body.wipe_key.as_ref());
        self.ctx.listener().on_token(token);
        Ok(())
    }
}

declare_handler!(TokenDeleteHandler);

impl TransactionHandler for TokenDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenDeletion
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenDeletion);
        token_entity(body.token.as_ref())
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
        if let Some(token_id) = main_entity(transaction) {
            let entity = self.ctx.crud().entity(item, token_id, EntityType::Token);
            self.ctx.listener().on_entity(entity);
        }
        Ok(())
    }
}

// =============================================================================
// Supply
// =============================================================================

fn emit_total_supply(ctx: &HandlerContext, token_id: EntityId, item: &RecordItem) {
    let mut token = Token::new(token_id, item.consensus_timestamp());
    token.total_supply = FieldUpdate::Value(item.receipt().new_total_supply);
    ctx.listener().on_token(token);
}

fn emit_removed_nfts(ctx: &HandlerContext, token_id: EntityId, item: &RecordItem, serials: &[i64]) {
    for serial in serials {
        let mut nft = Nft::new(token_id, *serial, item.consensus_timestamp());
        nft.deleted = FieldUpdate::Value(true);
        ctx.listener().on_nft(nft);
    }
}

declare_handler!(TokenMintHandler);

impl TransactionHandler for TokenMintHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenMint
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenMint);
        token_entity(body.token.as_ref())
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
        let body = body!(item, TokenMint);
        let Some(token_id) = main_entity(transaction) else {
            return Ok(());
        };

        emit_total_supply(&self.ctx, token_id, item);

        let timestamp = transaction.consensus_timestamp;
        for (serial, metadata) in item.receipt().serial_numbers.iter().zip(&body.metadata) {
            let mut nft = Nft::new(token_id, *serial, timestamp);
            nft.created_timestamp = FieldUpdate::Value(timestamp);
            nft.deleted = FieldUpdate::Value(false);
            nft.metadata = FieldUpdate::Value(metadata.clone());
            self.ctx.listener().on_nft(nft);
        }
        Ok(())
    }
}

declare_handler!(TokenBurnHandler);

impl TransactionHandler for TokenBurnHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenBurn
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenBurn);
        token_entity(body.token.as_ref())
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
        let body = body!(item, TokenBurn);
        if let Some(token_id) = main_entity(transaction) {
            emit_total_supply(&self.ctx, token_id, item);
            emit_removed_nfts(&self.ctx, token_id, item, &body.serial_numbers);
        }
        Ok(())
    }
}

declare_handler!(TokenWipeHandler);

impl TransactionHandler for TokenWipeHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenWipe
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenWipe);
        token_entity(body.token.as_ref())
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenWipe);
        entity_transactions.track_opt(self.ctx.resolve_account(body.account.as_ref()));
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
        let body = body!(item, TokenWipe);
        if let Some(token_id) = main_entity(transaction) {
            emit_total_supply(&self.ctx, token_id, item);
            emit_removed_nfts(&self.ctx, token_id, item, &body.serial_numbers);
        }
        Ok(())
    }
}

// =============================================================================
// Account relationships
// =============================================================================

declare_handler!(TokenAssociateHandler);

impl TransactionHandler for TokenAssociateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenAssociate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenAssociate);
        Ok(self.ctx.account_entity(body.account.as_ref()))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenAssociate);
        for token in &body.tokens {
            entity_transactions.track(token.to_entity_id()?);
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
        let body = body!(item, TokenAssociate);
        let Some(account_id) = main_entity(transaction) else {
            return Ok(());
        };

        let timestamp = transaction.consensus_timestamp;
        for token in &body.tokens {
            let mut token_account = TokenAccount::new(account_id, token.to_entity_id()?, timestamp);
            token_account.associated = FieldUpdate::Value(true);
            token_account.automatic_association = FieldUpdate::Value(false);
            token_account.created_timestamp = FieldUpdate::Value(timestamp);
            self.ctx.listener().on_token_account(token_account);
        }
        Ok(())
    }
}

declare_handler!(TokenDissociateHandler);

impl TransactionHandler for TokenDissociateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenDissociate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenDissociate);
        Ok(self.ctx.account_entity(body.account.as_ref()))
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenDissociate);
        for token in &body.tokens {
            entity_transactions.track(token.to_entity_id()?);
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
        let body = body!(item, TokenDissociate);
        let Some(account_id) = main_entity(transaction) else {
            return Ok(());
        };

        for token in &body.tokens {
            let mut token_account = TokenAccount::new(
                account_id,
                token.to_entity_id()?,
                transaction.consensus_timestamp,
            );
            token_account.associated = FieldUpdate::Value(false);
            self.ctx.listener().on_token_account(token_account);
        }
        Ok(())
    }
}

/// Status change of one account's relationship with a token.
enum AccountStatus {
    Freeze(TokenFreezeStatus),
    Kyc(TokenKycStatus),
}

/// Shared by freeze, unfreeze, grant KYC and revoke KYC.
macro_rules! token_account_status_handler {
    ($($name:ident => $kind:ident, $status:expr;)*) => {
        $(
            declare_handler!($name);

            impl TransactionHandler for $name {
                fn transaction_type(&self) -> TransactionType {
                    TransactionType::$kind
                }

                fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
                    let body = body!(item, $kind);
                    token_entity(body.token.as_ref())
                }

                fn add_entity_ids(
                    &self,
                    _transaction: &Transaction,
                    item: &RecordItem,
                    entity_transactions: &mut EntityTransactions,
                ) -> Result<()> {
                    let body = body!(item, $kind);
                    entity_transactions.track_opt(self.ctx.resolve_account(body.account.as_ref()));
                    Ok(())
                }

                fn project(
                    &self,
                    transaction: &Transaction,
                    item: &RecordItem,
                    _entity_transactions: &mut EntityTransactions,
                ) -> Result<()> {
                    let body = body!(item, $kind);
                    emit_account_status(
                        &self.ctx,
                        transaction,
                        body.account.as_ref(),
                        $status,
                    );
                    Ok(())
                }
            }
        )*
    };
}

fn emit_account_status(
    ctx: &HandlerContext,
    transaction: &Transaction,
    account: Option<&AccountId>,
    status: AccountStatus,
) {
    if !ctx.persist().tokens {
        return;
    }
    let (Some(token_id), Some(account_id)) = (main_entity(transaction), ctx.resolve_account(account))
    else {
        return;
    };

    let mut token_account = TokenAccount::new(account_id, token_id, transaction.consensus_timestamp);
    match status {
        AccountStatus::Freeze(status) => token_account.freeze_status = FieldUpdate::Value(status),
        AccountStatus::Kyc(status) => token_account.kyc_status = FieldUpdate::Value(status),
    }
    ctx.listener().on_token_account(token_account);
}

token_account_status_handler! {
    TokenFreezeHandler => TokenFreeze, AccountStatus::Freeze(TokenFreezeStatus::Frozen);
    TokenUnfreezeHandler => TokenUnfreeze, AccountStatus::Freeze(TokenFreezeStatus::Unfrozen);
    TokenGrantKycHandler => TokenGrantKyc, AccountStatus::Kyc(TokenKycStatus::Granted);
    TokenRevokeKycHandler => TokenRevokeKyc, AccountStatus::Kyc(TokenKycStatus::Revoked);
}

// =============================================================================
// Token-wide settings
// =============================================================================

macro_rules! token_pause_handler {
    ($($name:ident => $kind:ident, $status:expr;)*) => {
        $(
            declare_handler!($name);

            impl TransactionHandler for $name {
                fn transaction_type(&self) -> TransactionType {
                    TransactionType::$kind
                }

                fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
                    let body = body!(item, $kind);
                    token_entity(body.token.as_ref())
                }

                fn project(
                    &self,
                    transaction: &Transaction,
                    _item: &RecordItem,
                    _entity_transactions: &mut EntityTransactions,
                ) -> Result<()> {
                    if !self.ctx.persist().tokens {
                        return Ok(());
                    }
                    if let Some(token_id) = main_entity(transaction) {
                        let mut token = Token::new(token_id, transaction.consensus_timestamp);
                        token.pause_status = FieldUpdate::Value($status);
                        self.ctx.listener().on_token(token);
                    }
                    Ok(())
                }
            }
        )*
    };
}

token_pause_handler! {
    TokenPauseHandler => TokenPause, TokenPauseStatus::Paused;
    TokenUnpauseHandler => TokenUnpause, TokenPauseStatus::Unpaused;
}

declare_handler!(TokenFeeScheduleUpdateHandler);

impl TransactionHandler for TokenFeeScheduleUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenFeeScheduleUpdate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenFeeScheduleUpdate);
        token_entity(body.token_id.as_ref())
    }

    fn add_entity_ids(
        &self,
        _transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenFeeScheduleUpdate);
        track_fee_collectors(&self.ctx, &body.custom_fees, entity_transactions);
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
        let body = body!(item, TokenFeeScheduleUpdate);
        if let Some(token_id) = main_entity(transaction) {
            let fees = custom_fee(
                &self.ctx,
                token_id,
                transaction.consensus_timestamp,
                &body.custom_fees,
            )?;
            self.ctx.listener().on_custom_fee(fees);
        }
        Ok(())
    }
}

declare_handler!(TokenUpdateNftsHandler);

impl TransactionHandler for TokenUpdateNftsHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenUpdateNfts
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<EntityId>> {
        let body = body!(item, TokenUpdateNfts);
        token_entity(body.token.as_ref())
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
        let body = body!(item, TokenUpdateNfts);
        let (Some(token_id), Some(metadata)) = (main_entity(transaction), &body.metadata) else {
            return Ok(());
        };

        for serial in &body.serial_numbers {
            let mut nft = Nft::new(token_id, *serial, transaction.consensus_timestamp);
            nft.metadata = FieldUpdate::Value(metadata.clone());
            self.ctx.listener().on_nft(nft);
        }
        Ok(())
    }
}

declare_handler!(
    /// Returns tokens to their treasury. The resulting transfers arrive in
    /// the record, so only the references are tracked here.
    TokenRejectHandler
);

impl TransactionHandler for TokenRejectHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::TokenReject
    }

    fn add_entity_ids(
        &self,
        transaction: &Transaction,
        item: &RecordItem,
        entity_transactions: &mut EntityTransactions,
    ) -> Result<()> {
        let body = body!(item, TokenReject);
        let owner = self
            .ctx
            .resolve_account(body.owner.as_ref())
            .unwrap_or(transaction.payer_account_id);
        entity_transactions.track(owner);
        for rejection in &body.rejections {
            entity_transactions.track(rejection.token_id().to_entity_id()?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::{
        FractionalFeeSpec, RoyaltyFeeSpec, TokenAccountBody, TokenAssociationBody, TokenBody,
        TokenBurnBody, TokenCreateBody, TokenFeeScheduleUpdateBody, TokenMintBody,
        TokenRejectBody, TokenUpdateBody, TokenUpdateNftsBody,
    };
    use mirror_protocol::{NftId, TokenAssociation, TokenReference, TransactionData};
    use mirror_test_utils::{account, alias_account, entity, token, RecordItemBuilder, PAYER};

    use super::*;
    use crate::parser::handler::test_support::Harness;
    use crate::properties::{ImporterProperties, PersistProperties};

    fn tracked(harness: &Harness, item: &RecordItem) -> Vec<EntityId> {
        harness
            .process(item)
            .entity_transactions
            .iter()
            .map(|e| e.entity_id)
            .collect()
    }

    fn create_item() -> RecordItem {
        RecordItemBuilder::new(TransactionData::TokenCreation(TokenCreateBody {
            name: "Mirror".to_string(),
            symbol: "MIR".to_string(),
            decimals: 8,
            initial_supply: 1_000,
            treasury: Some(account(2000)),
            freeze_key: Some(vec![1]),
            custom_fees: vec![
                CustomFeeEntry {
                    fee_collector_account_id: Some(account(2001)),
                    all_collectors_are_exempt: false,
                    fee: CustomFeeKind::Fixed(FixedFeeSpec {
                        amount: 10,
                        denominating_token_id: Some(token(0)),
                    }),
                },
                CustomFeeEntry {
                    fee_collector_account_id: Some(account(2001)),
                    all_collectors_are_exempt: true,
                    fee: CustomFeeKind::Royalty(RoyaltyFeeSpec {
                        numerator: 1,
                        denominator: 20,
                        fallback_fee: Some(FixedFeeSpec {
                            amount: 5,
                            denominating_token_id: Some(token(4000)),
                        }),
                    }),
                },
            ],
            ..TokenCreateBody::default()
        }))
        .receipt(|receipt| receipt.token_id = Some(token(5000)))
        .record(|record| {
            record.automatic_token_associations = vec![TokenAssociation {
                token_id: token(5000),
                account_id: account(2000),
            }];
        })
        .build()
    }

    #[test]
    fn test_create_token() {
        let harness = Harness::new();
        let ids = tracked(&harness, &create_item());
        assert!(ids.contains(&entity(5000)));
        assert!(ids.contains(&entity(2000)));
        assert!(ids.contains(&entity(2001)));

        let collected = harness.collected();
        assert_eq!(collected.entities[0].entity_type, Some(EntityType::Token));
        assert_eq!(collected.entities[0].memo, FieldUpdate::Value(String::new()));

        let token_row = &collected.tokens[0];
        assert_eq!(token_row.decimals, FieldUpdate::Value(8));
        assert_eq!(token_row.total_supply, FieldUpdate::Value(1_000));
        assert_eq!(token_row.treasury_account_id, FieldUpdate::Value(entity(2000)));
        assert_eq!(
            token_row.pause_status,
            FieldUpdate::Value(TokenPauseStatus::NotApplicable)
        );
        assert!(token_row.kyc_key.is_unset());

        let fees = &collected.custom_fees[0];
        let fixed = fees.fixed_fees.as_ref().unwrap();
        assert_eq!(fixed[0].denominating_token_id, Some(entity(5000)));
        assert_eq!(fixed[0].collector_account_id, Some(entity(2001)));
        let royalty = fees.royalty_fees.as_ref().unwrap();
        assert_eq!(
            royalty[0].fallback_fee.as_ref().unwrap().denominating_token_id,
            Some(entity(4000))
        );
        assert!(fees.fractional_fees.is_none());

        let association = &collected.token_accounts[0];
        assert_eq!(association.account_id, entity(2000));
        assert_eq!(association.associated, FieldUpdate::Value(true));
        assert_eq!(
            association.freeze_status,
            FieldUpdate::Value(TokenFreezeStatus::Unfrozen)
        );
        assert_eq!(
            association.kyc_status,
            FieldUpdate::Value(TokenKycStatus::NotApplicable)
        );
    }

    #[test]
    fn test_create_keeps_decimals_above_i32_range() {
        let harness = Harness::new();
        let mut item = create_item();
        if let TransactionData::TokenCreation(body) = &mut item.body.data {
            body.decimals = u32::MAX;
        }
        harness.process(&item);
        assert_eq!(harness.collected().tokens[0].decimals, FieldUpdate::Value(u32::MAX));
    }

    #[test]
    fn test_tokens_disabled_still_tracks() {
        let harness = Harness::with_properties(ImporterProperties {
            persist: PersistProperties {
                tokens: false,
                ..PersistProperties::default()
            },
        });

        let ids = tracked(&harness, &create_item());
        assert!(ids.contains(&entity(5000)));
        assert!(harness.collected().is_empty());
    }

    #[test]
    fn test_empty_fee_schedule_update_clears_fees() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenFeeScheduleUpdate(
                TokenFeeScheduleUpdateBody {
                    token_id: Some(token(5000)),
                    custom_fees: vec![],
                },
            ))
            .build(),
        );

        let fees = &harness.collected().custom_fees[0];
        assert_eq!(fees.entity_id, entity(5000));
        assert!(fees.is_empty());
    }

    #[test]
    fn test_fractional_fee_without_maximum() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenFeeScheduleUpdate(
                TokenFeeScheduleUpdateBody {
                    token_id: Some(token(5000)),
                    custom_fees: vec![CustomFeeEntry {
                        fee_collector_account_id: Some(alias_account(&[2; 33])),
                        all_collectors_are_exempt: false,
                        fee: CustomFeeKind::Fractional(FractionalFeeSpec {
                            numerator: 1,
                            denominator: 100,
                            minimum_amount: 1,
                            maximum_amount: 0,
                            net_of_transfers: true,
                        }),
                    }],
                },
            ))
            .build(),
        );

        let fees = &harness.collected().custom_fees[0];
        let fractional = &fees.fractional_fees.as_ref().unwrap()[0];
        assert_eq!(fractional.maximum_amount, None);
        assert_eq!(fractional.collector_account_id, None);
        assert!(fractional.net_of_transfers);
    }

    #[test]
    fn test_update_token_leaves_empty_name_unchanged() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenUpdate(TokenUpdateBody {
                token: Some(token(5000)),
                symbol: "NEW".to_string(),
                treasury: Some(account(2002)),
                ..TokenUpdateBody::default()
            }))
            .build(),
        );

        let collected = harness.collected();
        assert!(collected.entities[0].memo.is_unset());
        let token_row = &collected.tokens[0];
        assert!(token_row.name.is_unset());
        assert_eq!(token_row.symbol, FieldUpdate::Value("NEW".to_string()));
        assert_eq!(token_row.treasury_account_id, FieldUpdate::Value(entity(2002)));
    }

    #[test]
    fn test_mint_and_burn_nfts() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenMint(TokenMintBody {
                token: Some(token(5000)),
                amount: 0,
                metadata: vec![b"a".to_vec(), b"b".to_vec()],
            }))
            .receipt(|receipt| {
                receipt.serial_numbers = vec![1, 2];
                receipt.new_total_supply = 2;
            })
            .build(),
        );
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenBurn(TokenBurnBody {
                token: Some(token(5000)),
                amount: 0,
                serial_numbers: vec![2],
            }))
            .receipt(|receipt| receipt.new_total_supply = 1)
            .build(),
        );

        let collected = harness.collected();
        assert_eq!(collected.tokens[0].total_supply, FieldUpdate::Value(2));
        assert_eq!(collected.tokens[1].total_supply, FieldUpdate::Value(1));
        assert_eq!(collected.nfts.len(), 3);
        assert_eq!(collected.nfts[1].serial_number, 2);
        assert_eq!(collected.nfts[1].metadata, FieldUpdate::Value(b"b".to_vec()));
        assert_eq!(collected.nfts[2].deleted, FieldUpdate::Value(true));
    }

    #[test]
    fn test_associate_and_dissociate() {
        let harness = Harness::new();
        let association = |dissociate: bool| {
            let body = TokenAssociationBody {
                account: Some(account(2000)),
                tokens: vec![token(5000), token(5001)],
            };
            let data = if dissociate {
                TransactionData::TokenDissociate(body)
            } else {
                TransactionData::TokenAssociate(body)
            };
            RecordItemBuilder::new(data).build()
        };

        let ids = tracked(&harness, &association(false));
        assert!(ids.contains(&entity(2000)) && ids.contains(&entity(5001)));
        harness.process(&association(true));

        let accounts = harness.collected().token_accounts;
        assert_eq!(accounts.len(), 4);
        assert_eq!(accounts[1].token_id, entity(5001));
        assert_eq!(accounts[1].associated, FieldUpdate::Value(true));
        assert_eq!(accounts[3].associated, FieldUpdate::Value(false));
        assert!(accounts[3].created_timestamp.is_unset());
    }

    #[test]
    fn test_freeze_and_kyc_status() {
        let harness = Harness::new();
        let body = || TokenAccountBody {
            token: Some(token(5000)),
            account: Some(account(2000)),
        };
        harness.process(&RecordItemBuilder::new(TransactionData::TokenFreeze(body())).build());
        harness.process(&RecordItemBuilder::new(TransactionData::TokenGrantKyc(body())).build());
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenFreeze(TokenAccountBody {
                token: Some(token(5000)),
                account: Some(alias_account(&[8; 33])),
            }))
            .build(),
        );

        let accounts = harness.collected().token_accounts;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].freeze_status, FieldUpdate::Value(TokenFreezeStatus::Frozen));
        assert!(accounts[0].kyc_status.is_unset());
        assert_eq!(accounts[1].kyc_status, FieldUpdate::Value(TokenKycStatus::Granted));
    }

    #[test]
    fn test_pause() {
        let harness = Harness::new();
        harness.process(
            &RecordItemBuilder::new(TransactionData::TokenPause(TokenBody {
                token: Some(token(5000)),
            }))
            .build(),
        );
        assert_eq!(
            harness.collected().tokens[0].pause_status,
            FieldUpdate::Value(TokenPauseStatus::Paused)
        );
    }

    #[test]
    fn test_update_nfts_requires_metadata() {
        let harness = Harness::new();
        let update = |metadata| {
            RecordItemBuilder::new(TransactionData::TokenUpdateNfts(TokenUpdateNftsBody {
                token: Some(token(5000)),
                serial_numbers: vec![1, 3],
                metadata,
            }))
            .build()
        };
        harness.process(&update(None));
        harness.process(&update(Some(b"new".to_vec())));

        let nfts = harness.collected().nfts;
        assert_eq!(nfts.len(), 2);
        assert_eq!(nfts[1].serial_number, 3);
        assert_eq!(nfts[1].metadata, FieldUpdate::Value(b"new".to_vec()));
    }

    #[test]
    fn test_reject_tracks_owner_or_payer() {
        let harness = Harness::new();
        let reject = |owner| {
            RecordItemBuilder::new(TransactionData::TokenReject(TokenRejectBody {
                owner,
                rejections: vec![
                    TokenReference::FungibleToken(token(5000)),
                    TokenReference::Nft(NftId {
                        token_id: token(5001),
                        serial_number: 1,
                    }),
                ],
            }))
            .build()
        };

        let with_owner = tracked(&harness, &reject(Some(account(2000))));
        assert!(with_owner.contains(&entity(2000)));
        assert!(with_owner.contains(&entity(5001)));

        let without_owner = tracked(&harness, &reject(None));
        assert!(without_owner.contains(&entity(PAYER)));
        assert!(!without_owner.contains(&entity(2000)));
        assert!(harness.collected().is_empty());
    }
}
