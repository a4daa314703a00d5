//! Mirror importer core.
//!
//! Turns decoded ledger record items into a normalized entity model. Each
//! record item is classified by its transaction type, the entities it touches
//! are recorded as entity transactions, and successful transactions are
//! projected into partial entity rows handed to an [`EntityListener`].
//!
//! ```ignore
//! let ctx = HandlerContext::new(listener, resolver, Arc::new(properties));
//! let processor = TransactionProcessor::new(ctx)?;
//! let processed = processor.process(&record_item)?;
//! ```

pub mod error;
pub mod parser;
pub mod properties;

pub use mirror_protocol as protocol;
pub use mirror_types as types;

pub use error::{ImporterError, Result};
pub use parser::{
    EntityIdResolver, EntityListener, HandlerContext, ProcessedTransaction, TransactionProcessor,
};
pub use properties::{ImporterProperties, PersistProperties};
