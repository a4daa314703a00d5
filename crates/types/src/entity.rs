//! The shared entity row (accounts, contracts, files, schedules, tokens and topics).

use serde::{Deserialize, Serialize};

use crate::field::{FieldUpdate, TimestampRange};
use crate::id::{EntityId, EntityType};

/// A partial entity row.
///
/// Only the fields a transaction touched are set; everything else stays
/// [`FieldUpdate::Unset`] and must be merged against the current row by the
/// persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    pub timestamp_range: TimestampRange,

    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub alias: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub auto_renew_account_id: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub auto_renew_period: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub balance: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub balance_timestamp: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub created_timestamp: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub decline_reward: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub deleted: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub ethereum_nonce: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub evm_address: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub expiration_timestamp: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub key: FieldUpdate<Vec<u8>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub max_automatic_token_associations: FieldUpdate<i32>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub memo: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub obtainer_id: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub permanent_removal: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub proxy_account_id: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub receiver_sig_required: FieldUpdate<bool>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub stake_period_start: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub staked_account_id: FieldUpdate<EntityId>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub staked_node_id: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unset")]
    pub submit_key: FieldUpdate<Vec<u8>>,
}

impl Entity {
    /// Staked account value meaning "no longer staked to an account".
    pub const CLEARED_STAKED_ACCOUNT: EntityId = EntityId::EMPTY;
    /// Staked node value meaning "no longer staked to a node".
    pub const CLEARED_STAKED_NODE: i64 = -1;

    /// An empty partial row for `id` whose history starts at `timestamp`.
    pub fn new(id: EntityId, entity_type: EntityType, timestamp: i64) -> Self {
        Self {
            id,
            entity_type: Some(entity_type),
            timestamp_range: TimestampRange::since(timestamp),
            ..Self::default()
        }
    }

    /// Layers a newer partial row of the same entity on top of this one.
    pub fn merge(&mut self, newer: Self) {
        macro_rules! merge_fields {
            ($($field:ident),* $(,)?) => {
                $(self.$field = std::mem::take(&mut self.$field).merge(newer.$field);)*
            };
        }

        if newer.entity_type.is_some() {
            self.entity_type = newer.entity_type;
        }
        self.timestamp_range = newer.timestamp_range;

        merge_fields!(
            alias,
            auto_renew_account_id,
            auto_renew_period,
            balance,
            balance_timestamp,
            created_timestamp,
            decline_reward,
            deleted,
            ethereum_nonce,
            evm_address,
            expiration_timestamp,
            key,
            max_automatic_token_associations,
            memo,
            obtainer_id,
            permanent_removal,
            proxy_account_id,
            receiver_sig_required,
            stake_period_start,
            staked_account_id,
            staked_node_id,
            submit_key,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(num: i64) -> EntityId {
        EntityId::of(0, 0, num).unwrap()
    }

    #[test]
    fn test_merge_applies_only_touched_fields() {
        let mut current = Entity::new(id(1001), EntityType::Account, 100);
        current.memo = FieldUpdate::Value("created".to_string());
        current.key = FieldUpdate::Value(vec![1, 2, 3]);

        let mut update = Entity::new(id(1001), EntityType::Account, 200);
        update.memo = FieldUpdate::Value(String::new());
        update.staked_node_id = FieldUpdate::Value(Entity::CLEARED_STAKED_NODE);

        current.merge(update);

        assert_eq!(current.timestamp_range.lower, 200);
        assert_eq!(current.memo, FieldUpdate::Value(String::new()));
        assert_eq!(current.key, FieldUpdate::Value(vec![1, 2, 3]));
        assert_eq!(current.staked_node_id, FieldUpdate::Value(-1));
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let mut entity = Entity::new(id(5), EntityType::Topic, 1);
        entity.memo = FieldUpdate::Value(String::new());
        entity.auto_renew_account_id = FieldUpdate::Clear;

        let json = serde_json::to_value(&entity).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object["memo"], "");
        assert!(object["auto_renew_account_id"].is_null());
        assert!(!object.contains_key("key"));
        assert_eq!(object["type"], "TOPIC");
    }
}
