//! Importer properties: which feature areas get persisted.
//!
//! Properties are read from an optional TOML file and then overridden from
//! the environment, e.g. `MIRROR_IMPORTER__PERSIST__TOKENS=false`.

use std::collections::HashSet;
use std::path::Path;

use config::{Config, Environment, File};
use mirror_types::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable prefix for property overrides.
pub const ENV_PREFIX: &str = "MIRROR_IMPORTER";

/// Highest file number considered a system file.
const SYSTEM_FILE_MAX_NUM: i64 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterProperties {
    pub persist: PersistProperties,
}

impl ImporterProperties {
    /// Loads properties from `path` (if any) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("persist.entity_transaction_exclusion"),
            )
            .build()?;

        let properties: Self = config.try_deserialize()?;
        tracing::info!(
            target: "mirror_importer::properties",
            entity_transactions = properties.persist.entity_transactions,
            excluded = properties.persist.entity_transaction_exclusion.len(),
            tokens = properties.persist.tokens,
            topics = properties.persist.topics,
            "Loaded importer properties"
        );
        Ok(properties)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistProperties {
    /// Live hashes.
    pub claims: bool,
    pub entity_transactions: bool,
    /// Entities never recorded as entity transactions.
    pub entity_transaction_exclusion: HashSet<EntityId>,
    pub files: bool,
    pub schedules: bool,
    pub system_files: bool,
    pub tokens: bool,
    /// Topic messages.
    pub topics: bool,
}

impl Default for PersistProperties {
    fn default() -> Self {
        Self {
            claims: false,
            entity_transactions: true,
            // Fee collection and staking reward accounts appear in nearly every transaction.
            entity_transaction_exclusion: HashSet::from([
                EntityId::from_encoded(98),
                EntityId::from_encoded(800),
            ]),
            files: true,
            schedules: true,
            system_files: true,
            tokens: true,
            topics: true,
        }
    }
}

impl PersistProperties {
    pub fn should_persist_entity_transaction(&self, entity_id: EntityId) -> bool {
        self.entity_transactions
            && !entity_id.is_empty()
            && !self.entity_transaction_exclusion.contains(&entity_id)
    }

    /// Whether the contents of `file_id` are kept.
    pub fn should_persist_file_data(&self, file_id: EntityId) -> bool {
        if file_id.num() <= SYSTEM_FILE_MAX_NUM {
            self.system_files
        } else {
            self.files
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn id(num: i64) -> EntityId {
        EntityId::from_encoded(num)
    }

    #[test]
    fn test_defaults() {
        let persist = PersistProperties::default();
        assert!(persist.entity_transactions);
        assert!(persist.tokens && persist.topics && persist.schedules);
        assert!(!persist.claims);
        assert!(persist.should_persist_entity_transaction(id(1001)));
        assert!(!persist.should_persist_entity_transaction(id(98)));
        assert!(!persist.should_persist_entity_transaction(id(800)));
        assert!(!persist.should_persist_entity_transaction(EntityId::EMPTY));
    }

    #[test]
    fn test_entity_transactions_disabled() {
        let persist = PersistProperties {
            entity_transactions: false,
            ..PersistProperties::default()
        };
        assert!(!persist.should_persist_entity_transaction(id(1001)));
    }

    #[test]
    fn test_file_data_split_between_system_and_user_files() {
        let persist = PersistProperties {
            files: false,
            ..PersistProperties::default()
        };
        assert!(persist.should_persist_file_data(id(111)));
        assert!(!persist.should_persist_file_data(id(1001)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[persist]
claims = true
tokens = false
entity_transaction_exclusion = ["0.0.98"]
"#
        )
        .unwrap();

        let properties = ImporterProperties::load(Some(file.path())).unwrap();
        assert!(properties.persist.claims);
        assert!(!properties.persist.tokens);
        assert!(properties.persist.topics);
        assert_eq!(
            properties.persist.entity_transaction_exclusion,
            HashSet::from([id(98)])
        );
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let properties = ImporterProperties::load(None).unwrap();
        assert_eq!(properties.persist.files, PersistProperties::default().files);
    }
}
