use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::body::{TransactionBody, TransactionData};
use crate::ids::AccountId;
use crate::kind::TransactionType;
use crate::record::{TransactionReceipt, TransactionRecord};
use crate::response::ResponseCode;
use crate::version::Version;

/// One decoded transaction: body, record and where it sits in its transaction tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordItem {
    pub body: TransactionBody,
    pub record: TransactionRecord,
    #[serde(default = "Version::latest")]
    pub hapi_version: Version,
    /// The transaction that spawned this one, when it is a child.
    #[serde(skip)]
    pub parent: Option<Arc<RecordItem>>,
    /// Position of this child in its parent's hook execution queue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_execution_index: Option<usize>,
}

impl RecordItem {
    pub fn new(body: TransactionBody, record: TransactionRecord, hapi_version: Version) -> Self {
        Self {
            body,
            record,
            hapi_version,
            parent: None,
            hook_execution_index: None,
        }
    }

    pub fn with_parent(mut self, parent: Arc<Self>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Consensus timestamp in nanoseconds.
    pub fn consensus_timestamp(&self) -> i64 {
        self.record.consensus_timestamp.to_nanos()
    }

    pub fn data(&self) -> &TransactionData {
        &self.body.data
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.body.data.transaction_type()
    }

    pub fn payer_account_id(&self) -> &AccountId {
        &self.body.transaction_id.account_id
    }

    pub fn node_account_id(&self) -> Option<&AccountId> {
        self.body.node_account_id.as_ref()
    }

    pub fn receipt(&self) -> &TransactionReceipt {
        &self.record.receipt
    }

    pub fn status(&self) -> ResponseCode {
        self.record.receipt.status
    }

    pub fn is_successful(&self) -> bool {
        self.status().is_successful()
    }

    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    pub fn is_child(&self) -> bool {
        self.parent.is_some() || self.record.parent_consensus_timestamp.is_some()
    }
}
