//! Record item parsing: classification, entity transactions and projection.

pub mod bytecode;
pub mod entity_transactions;
pub mod handler;
pub mod listener;
pub mod processor;
pub mod resolver;

pub use bytecode::{ContractBytecodeSource, NoBytecodeSource};
pub use entity_transactions::EntityTransactions;
pub use handler::{HandlerContext, TransactionHandler, TransactionHandlerFactory};
pub use listener::{
    Collected, CollectingEntityListener, CompositeEntityListener, EntityListener,
    LoggingEntityListener,
};
pub use processor::{ProcessedTransaction, TransactionProcessor};
pub use resolver::{EntityIdResolver, InMemoryEntityIdResolver};
