//! Mirror Replay - runs recorded transactions through the importer core
//!
//! Each input line is one JSON record item. Items are processed in file
//! order; a child item is linked to its parent when the parent appeared
//! earlier in the file.
//!
//! # Usage
//!
//! ```bash
//! # Print every processed transaction, then a summary
//! mirror-replay --input items.ndjson
//!
//! # Summary only, with tokens disabled
//! MIRROR_IMPORTER__PERSIST__TOKENS=false mirror-replay --input items.ndjson --summary-only
//! ```

mod config;

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use mirror_importer::parser::{
    CollectingEntityListener, CompositeEntityListener, EntityListener, InMemoryEntityIdResolver,
    LoggingEntityListener,
};
use mirror_importer::protocol::{RecordItem, TransactionType};
use mirror_importer::{HandlerContext, ImporterProperties, TransactionProcessor};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Links child items to parents seen earlier in the stream.
#[derive(Default)]
struct ParentIndex {
    parents: HashMap<i64, Arc<RecordItem>>,
    hook_calls: HashMap<i64, usize>,
}

impl ParentIndex {
    /// Attaches the parent of `item` if known. Contract calls under a crypto
    /// transfer that carry no hook position get the next one in order.
    fn attach(&mut self, mut item: RecordItem) -> RecordItem {
        let Some(parent_timestamp) = item.record.parent_consensus_timestamp.map(|t| t.to_nanos())
        else {
            return item;
        };
        let Some(parent) = self.parents.get(&parent_timestamp) else {
            tracing::debug!(
                target: "mirror_replay",
                consensus_timestamp = item.consensus_timestamp(),
                parent_consensus_timestamp = parent_timestamp,
                "Parent not found in input"
            );
            return item;
        };

        if item.hook_execution_index.is_none()
            && item.transaction_type() == TransactionType::ContractCall
            && parent.transaction_type() == TransactionType::CryptoTransfer
        {
            let next = self.hook_calls.entry(parent_timestamp).or_insert(0);
            item.hook_execution_index = Some(*next);
            *next += 1;
        }
        item.parent = Some(parent.clone());
        item
    }

    /// Only top-level items can be parents.
    fn remember(&mut self, item: RecordItem) {
        if item.record.parent_consensus_timestamp.is_none() {
            self.parents.insert(item.consensus_timestamp(), Arc::new(item));
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    items: usize,
    failed: usize,
    errors: usize,
    rows: BTreeMap<&'static str, usize>,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_json);

    tracing::info!("Starting mirror replay");
    tracing::info!("Input: {}", config.input.display());

    let properties = ImporterProperties::load(config.config.as_deref())
        .context("Failed to load importer properties")?;

    let collector = Arc::new(CollectingEntityListener::new());
    let listeners: Vec<Arc<dyn EntityListener>> =
        vec![collector.clone(), Arc::new(LoggingEntityListener::new())];
    let ctx = HandlerContext::new(
        Arc::new(CompositeEntityListener::new(listeners)),
        Arc::new(InMemoryEntityIdResolver::new()),
        Arc::new(properties),
    )
    .with_bytecode_source(collector.clone());
    let processor = TransactionProcessor::new(ctx)?;

    let input = File::open(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut index = ParentIndex::default();
    let mut summary = Summary {
        items: 0,
        failed: 0,
        errors: 0,
        rows: BTreeMap::new(),
    };

    for (line_number, line) in BufReader::new(input).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_number + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let item: RecordItem = serde_json::from_str(&line)
            .with_context(|| format!("Invalid record item on line {}", line_number + 1))?;
        let item = index.attach(item);

        summary.items += 1;
        if !item.is_successful() {
            summary.failed += 1;
        }

        match processor.process(&item) {
            Ok(processed) => {
                if !config.summary_only {
                    serde_json::to_writer(&mut out, &processed)?;
                    writeln!(out)?;
                }
            }
            Err(e) => {
                summary.errors += 1;
                tracing::error!(
                    target: "mirror_replay",
                    line = line_number + 1,
                    consensus_timestamp = item.consensus_timestamp(),
                    error = %e,
                    "Failed to process record item"
                );
            }
        }
        index.remember(item);
    }

    summary.rows = collector.collected().summary();
    serde_json::to_writer_pretty(&mut out, &summary)?;
    writeln!(out)?;

    tracing::info!(
        items = summary.items,
        failed = summary.failed,
        errors = summary.errors,
        "Replay complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use mirror_importer::protocol::body::{ContractCallBody, CryptoTransferBody};
    use mirror_importer::protocol::TransactionData;
    use mirror_test_utils::RecordItemBuilder;

    use super::*;

    fn transfer() -> RecordItem {
        RecordItemBuilder::new(TransactionData::CryptoTransfer(CryptoTransferBody::default()))
            .build()
    }

    fn child(data: TransactionData) -> RecordItem {
        RecordItemBuilder::new(data).parent(transfer()).build()
    }

    fn call() -> TransactionData {
        TransactionData::ContractCall(ContractCallBody::default())
    }

    #[test]
    fn test_children_get_parent_and_hook_positions() {
        let mut index = ParentIndex::default();
        index.remember(transfer());

        let first = index.attach(child(call()));
        let second = index.attach(child(call()));
        let nested = index.attach(child(TransactionData::CryptoTransfer(
            CryptoTransferBody::default(),
        )));

        assert!(first.parent.is_some());
        assert_eq!(first.hook_execution_index, Some(0));
        assert_eq!(second.hook_execution_index, Some(1));
        assert!(nested.parent.is_some());
        assert_eq!(nested.hook_execution_index, None);
    }

    #[test]
    fn test_children_are_not_remembered_as_parents() {
        let mut index = ParentIndex::default();
        index.remember(child(call()));
        assert!(index.parents.is_empty());
    }

    #[test]
    fn test_unknown_parent_is_left_unlinked() {
        let mut index = ParentIndex::default();
        let mut orphan = child(call());
        orphan.parent = None;

        let orphan = index.attach(orphan);
        assert!(orphan.parent.is_none());
        assert_eq!(orphan.hook_execution_index, None);
    }
}
