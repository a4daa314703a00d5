//! Partial entity rows for create, update, delete and undelete handlers.
//!
//! Each lifecycle handler builds its row through [`EntityCrud::entity`] and
//! then sets the fields its body carries with the helpers below. Which fields
//! a handler touches is decided by the handler itself.

use mirror_protocol::body::StakedId;
use mirror_protocol::{
    AccountId, ContractId, Duration, EntityOperation, RecordItem, Timestamp, Version,
};
use mirror_types::{Entity, EntityId, EntityType, FieldUpdate};

use crate::parser::resolver::EntityIdResolver;

/// First protocol version carrying consensus staking.
pub const STAKING_ACTIVATION: Version = Version::new(0, 27, 0);

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Days since the epoch of a consensus timestamp in nanoseconds.
pub fn epoch_day(consensus_timestamp: i64) -> i64 {
    consensus_timestamp.div_euclid(SECONDS_PER_DAY * NANOS_PER_SECOND)
}

pub fn is_staking_enabled(version: Version) -> bool {
    version >= STAKING_ACTIVATION
}

pub struct EntityCrud<'a> {
    resolver: &'a dyn EntityIdResolver,
}

impl<'a> EntityCrud<'a> {
    pub fn new(resolver: &'a dyn EntityIdResolver) -> Self {
        Self { resolver }
    }

    /// Row for `id` opened at the consensus timestamp, with the lifecycle
    /// fields implied by the transaction kind already applied.
    pub fn entity(&self, item: &RecordItem, id: EntityId, entity_type: EntityType) -> Entity {
        let timestamp = item.consensus_timestamp();
        let mut entity = Entity::new(id, entity_type, timestamp);

        match item.transaction_type().entity_operation() {
            EntityOperation::Create => {
                entity.created_timestamp = FieldUpdate::Value(timestamp);
                entity.deleted = FieldUpdate::Value(false);
                if matches!(entity_type, EntityType::Account | EntityType::Contract) {
                    entity.balance = FieldUpdate::Value(0);
                    entity.balance_timestamp = FieldUpdate::Value(timestamp);
                }
            }
            EntityOperation::Delete => entity.deleted = FieldUpdate::Value(true),
            EntityOperation::Update | EntityOperation::None => {}
        }

        entity
    }

    /// Create bodies always carry a memo; an absent one is the empty string.
    pub fn create_memo(&self, entity: &mut Entity, memo: &str) {
        entity.memo = FieldUpdate::Value(memo.to_string());
    }

    /// Update bodies only change the memo when the wrapper is present.
    pub fn update_memo(&self, entity: &mut Entity, memo: Option<&String>) {
        if let Some(memo) = memo {
            entity.memo = FieldUpdate::Value(memo.clone());
        }
    }

    pub fn key(&self, entity: &mut Entity, key: Option<&Vec<u8>>) {
        if let Some(key) = key {
            entity.key = FieldUpdate::Value(key.clone());
        }
    }

    pub fn expiration(&self, entity: &mut Entity, expiration: Option<&Timestamp>) {
        if let Some(expiration) = expiration {
            entity.expiration_timestamp = FieldUpdate::Value(expiration.to_nanos());
        }
    }

    pub fn auto_renew_period(&self, entity: &mut Entity, period: Option<&Duration>) {
        if let Some(period) = period {
            entity.auto_renew_period = FieldUpdate::Value(period.seconds);
        }
    }

    /// `0.0.0` removes the auto-renew account; an alias that does not resolve leaves it untouched.
    pub fn auto_renew_account(&self, entity: &mut Entity, account: Option<&AccountId>) {
        let Some(account) = account else {
            return;
        };

        if account.is_default() {
            entity.auto_renew_account_id = FieldUpdate::Value(EntityId::EMPTY);
            return;
        }

        match self.resolver.lookup_account(account) {
            Some(resolved) => entity.auto_renew_account_id = FieldUpdate::Value(resolved),
            None => tracing::warn!(
                target: "mirror_importer::parser::crud",
                entity_id = %entity.id,
                account = %account,
                consensus_timestamp = entity.timestamp_range.lower,
                "Unable to resolve auto-renew account"
            ),
        }
    }

    pub fn proxy_account(&self, entity: &mut Entity, account: Option<&AccountId>) {
        let Some(account) = account else {
            return;
        };

        let resolved = if account.is_default() {
            Some(EntityId::EMPTY)
        } else {
            self.resolver.lookup_account(account)
        };
        if let Some(resolved) = resolved {
            entity.proxy_account_id = FieldUpdate::Value(resolved);
        }
    }

    pub fn max_automatic_token_associations(&self, entity: &mut Entity, max: Option<i32>) {
        if let Some(max) = max {
            entity.max_automatic_token_associations = FieldUpdate::Value(max);
        }
    }

    /// Applies the staking fields, only for protocol versions that have staking.
    ///
    /// Staking to an account clears the staked node and vice versa. A staked
    /// account of `0.0.0` clears the account. Staking to a node, or changing
    /// the decline-reward flag, restarts the stake period at the current day.
    pub fn staking(
        &self,
        entity: &mut Entity,
        item: &RecordItem,
        staked_id: Option<&StakedId>,
        decline_reward: Option<bool>,
    ) {
        if !is_staking_enabled(item.hapi_version) {
            return;
        }

        let stake_period_start = epoch_day(item.consensus_timestamp());

        if let Some(decline_reward) = decline_reward {
            entity.decline_reward = FieldUpdate::Value(decline_reward);
            entity.stake_period_start = FieldUpdate::Value(stake_period_start);
        }

        match staked_id {
            Some(StakedId::AccountId(account)) => {
                let staked_account = if account.is_default() {
                    Some(Entity::CLEARED_STAKED_ACCOUNT)
                } else {
                    self.resolver.lookup_account(account)
                };
                match staked_account {
                    Some(staked_account) => {
                        entity.staked_account_id = FieldUpdate::Value(staked_account);
                        entity.staked_node_id = FieldUpdate::Value(Entity::CLEARED_STAKED_NODE);
                    }
                    None => tracing::warn!(
                        target: "mirror_importer::parser::crud",
                        entity_id = %entity.id,
                        account = %account,
                        "Unable to resolve staked account"
                    ),
                }
            }
            Some(StakedId::NodeId(node_id)) => {
                entity.staked_node_id = FieldUpdate::Value(*node_id);
                entity.staked_account_id = FieldUpdate::Value(Entity::CLEARED_STAKED_ACCOUNT);
                entity.stake_period_start = FieldUpdate::Value(stake_period_start);
            }
            None => {}
        }
    }

    /// Sets the obtainer, preferring an account over a contract. An obtainer
    /// that does not resolve is recorded as [`EntityId::EMPTY`].
    pub fn obtainer(
        &self,
        entity: &mut Entity,
        account: Option<&AccountId>,
        contract: Option<&ContractId>,
    ) {
        let obtainer = match (account, contract) {
            (Some(account), _) => self.resolver.lookup_account(account),
            (None, Some(contract)) => self.resolver.lookup_contract(contract),
            (None, None) => return,
        };
        entity.obtainer_id = FieldUpdate::Value(obtainer.unwrap_or(EntityId::EMPTY));
    }

    pub fn undelete(&self, entity: &mut Entity) {
        entity.deleted = FieldUpdate::Value(false);
    }
}

#[cfg(test)]
mod tests {
    use mirror_protocol::body::CryptoUpdateAccountBody;
    use mirror_protocol::TransactionData;
    use mirror_test_utils::{account, alias_account, contract, entity, RecordItemBuilder};

    use super::*;
    use crate::parser::resolver::InMemoryEntityIdResolver;

    fn update_item(version: Version) -> RecordItem {
        RecordItemBuilder::new(TransactionData::CryptoUpdateAccount(
            CryptoUpdateAccountBody::default(),
        ))
        .hapi_version(version)
        .build()
    }

    #[test]
    fn test_staking_gate_boundary() {
        let resolver = InMemoryEntityIdResolver::new();
        let crud = EntityCrud::new(&resolver);
        let staked = StakedId::NodeId(3);

        let at = update_item(STAKING_ACTIVATION);
        let mut gated_in = crud.entity(&at, entity(1001), EntityType::Account);
        crud.staking(&mut gated_in, &at, Some(&staked), Some(true));
        assert_eq!(gated_in.staked_node_id, FieldUpdate::Value(3));
        assert_eq!(gated_in.staked_account_id, FieldUpdate::Value(EntityId::EMPTY));
        assert_eq!(gated_in.decline_reward, FieldUpdate::Value(true));
        assert_eq!(
            gated_in.stake_period_start,
            FieldUpdate::Value(epoch_day(at.consensus_timestamp()))
        );

        let below = update_item(Version::new(0, 26, 0));
        let mut gated_out = crud.entity(&below, entity(1001), EntityType::Account);
        crud.staking(&mut gated_out, &below, Some(&staked), Some(true));
        assert!(gated_out.staked_node_id.is_unset());
        assert!(gated_out.staked_account_id.is_unset());
        assert!(gated_out.decline_reward.is_unset());
        assert!(gated_out.stake_period_start.is_unset());
    }

    #[test]
    fn test_staked_account_sentinels() {
        let resolver = InMemoryEntityIdResolver::new();
        let crud = EntityCrud::new(&resolver);
        let item = update_item(Version::LATEST);

        let mut cleared = crud.entity(&item, entity(1001), EntityType::Account);
        crud.staking(&mut cleared, &item, Some(&StakedId::AccountId(account(0))), None);
        assert_eq!(cleared.staked_account_id, FieldUpdate::Value(EntityId::EMPTY));
        assert_eq!(cleared.staked_node_id, FieldUpdate::Value(-1));
        assert!(cleared.decline_reward.is_unset());

        let mut staked = crud.entity(&item, entity(1001), EntityType::Account);
        crud.staking(&mut staked, &item, Some(&StakedId::AccountId(account(2000))), None);
        assert_eq!(staked.staked_account_id, FieldUpdate::Value(entity(2000)));
        assert!(staked.stake_period_start.is_unset());
    }

    #[test]
    fn test_decline_reward_with_staked_account_restarts_period() {
        let resolver = InMemoryEntityIdResolver::new();
        let crud = EntityCrud::new(&resolver);
        let item = update_item(Version::LATEST);

        let mut row = crud.entity(&item, entity(1001), EntityType::Account);
        crud.staking(&mut row, &item, Some(&StakedId::AccountId(account(2000))), Some(true));
        assert_eq!(row.staked_account_id, FieldUpdate::Value(entity(2000)));
        assert_eq!(row.staked_node_id, FieldUpdate::Value(-1));
        assert_eq!(row.decline_reward, FieldUpdate::Value(true));
        assert_eq!(
            row.stake_period_start,
            FieldUpdate::Value(epoch_day(item.consensus_timestamp()))
        );
    }

    #[test]
    fn test_auto_renew_account_resolution() {
        let resolver = InMemoryEntityIdResolver::new().with_alias(vec![7; 33], entity(4000));
        let crud = EntityCrud::new(&resolver);
        let item = update_item(Version::LATEST);
        let mut row = crud.entity(&item, entity(1001), EntityType::Account);

        crud.auto_renew_account(&mut row, Some(&alias_account(&[9; 33])));
        assert!(row.auto_renew_account_id.is_unset());

        crud.auto_renew_account(&mut row, Some(&alias_account(&[7; 33])));
        assert_eq!(row.auto_renew_account_id, FieldUpdate::Value(entity(4000)));

        crud.auto_renew_account(&mut row, Some(&account(0)));
        assert_eq!(row.auto_renew_account_id, FieldUpdate::Value(EntityId::EMPTY));
    }

    #[test]
    fn test_obtainer_prefers_account() {
        let resolver = InMemoryEntityIdResolver::new();
        let crud = EntityCrud::new(&resolver);
        let item = update_item(Version::LATEST);
        let mut row = crud.entity(&item, entity(1001), EntityType::Contract);

        crud.obtainer(&mut row, Some(&account(5)), Some(&contract(6)));
        assert_eq!(row.obtainer_id, FieldUpdate::Value(entity(5)));

        crud.obtainer(&mut row, Some(&alias_account(&[1; 33])), Some(&contract(6)));
        assert_eq!(row.obtainer_id, FieldUpdate::Value(EntityId::EMPTY));

        crud.obtainer(&mut row, None, Some(&contract(6)));
        assert_eq!(row.obtainer_id, FieldUpdate::Value(entity(6)));
    }

    #[test]
    fn test_epoch_day() {
        assert_eq!(epoch_day(0), 0);
        assert_eq!(epoch_day(86_400 * NANOS_PER_SECOND - 1), 0);
        assert_eq!(epoch_day(86_400 * NANOS_PER_SECOND), 1);
    }
}
