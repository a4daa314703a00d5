//! Error types for the importer core.
//!
//! Per-transaction handling only fails on identifiers that cannot be encoded.
//! Registration-time invariant violations surface when the handler factory is
//! built, never while processing.

use mirror_protocol::TransactionType;
use mirror_types::InvalidEntityId;
use thiserror::Error;

// =============================================================================
// Importer Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ImporterError {
    /// A wire identifier does not fit the entity id encoding.
    #[error(transparent)]
    InvalidEntityId(#[from] InvalidEntityId),

    /// No handler is registered for a transaction type.
    #[error("No handler registered for transaction type {0}")]
    MissingHandler(TransactionType),

    /// Two handlers were registered for the same transaction type.
    #[error("Duplicate handler registered for transaction type {0}")]
    DuplicateHandler(TransactionType),

    /// A handler was registered under a type it does not report.
    #[error("Handler registered for {registered} reports transaction type {reported}")]
    MismatchedHandler {
        registered: TransactionType,
        reported: TransactionType,
    },

    /// Importer properties could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T, E = ImporterError> = std::result::Result<T, E>;
