//! Decoded ledger transactions as handed to the importer.
//!
//! Decoding the record stream into these types happens upstream; this crate
//! only defines the shapes and a few derived accessors.

pub mod body;
mod ids;
mod item;
mod kind;
mod record;
mod response;
mod version;

pub use body::{TransactionBody, TransactionData};
pub use ids::{
    AccountId, AccountRef, ContractId, ContractRef, Duration, FileId, NftId, PendingAirdropId,
    ScheduleId, Timestamp, TokenId, TokenReference, TopicId, TransactionId,
};
pub use item::RecordItem;
pub use kind::{EntityOperation, TransactionType};
pub use record::{
    ContractFunctionResult, Entropy, PendingAirdropRecord, TokenAssociation, TransactionReceipt,
    TransactionRecord,
};
pub use response::ResponseCode;
pub use version::Version;
