//! Fixtures for importer tests.
//!
//! [`RecordItemBuilder`] produces a successful record item with a fixed payer,
//! node and consensus timestamp; tests override only what they care about.

use std::sync::Arc;

use mirror_protocol::body::{HookEntityId, HookIdRef, HookStoreBody};
use mirror_protocol::{
    AccountId, ContractId, FileId, RecordItem, ResponseCode, ScheduleId, Timestamp, TokenId,
    TopicId, TransactionBody, TransactionData, TransactionId, TransactionReceipt,
    TransactionRecord, TransactionType, Version,
};
use mirror_types::EntityId;

/// Account paying for fixture transactions.
pub const PAYER: i64 = 1001;
/// Node account submitting fixture transactions.
pub const NODE: i64 = 3;
/// Consensus time of fixture transactions: 2023-11-14T22:13:20Z.
pub const CONSENSUS_SECONDS: i64 = 1_700_000_000;

pub fn account(num: i64) -> AccountId {
    AccountId::from_num(0, 0, num)
}

pub fn alias_account(alias: &[u8]) -> AccountId {
    AccountId::from_alias(0, 0, alias.to_vec())
}

pub fn contract(num: i64) -> ContractId {
    ContractId::from_num(0, 0, num)
}

pub fn evm_contract(address: &[u8]) -> ContractId {
    ContractId::from_evm_address(0, 0, address.to_vec())
}

pub fn file(num: i64) -> FileId {
    FileId::new(0, 0, num)
}

pub fn schedule(num: i64) -> ScheduleId {
    ScheduleId::new(0, 0, num)
}

pub fn token(num: i64) -> TokenId {
    TokenId::new(0, 0, num)
}

pub fn topic(num: i64) -> TopicId {
    TopicId::new(0, 0, num)
}

/// `0.0.num` as an entity id.
pub fn entity(num: i64) -> EntityId {
    EntityId::from_encoded(num)
}

/// Consensus timestamp of fixture transactions in nanoseconds.
pub fn consensus_nanos() -> i64 {
    Timestamp::new(CONSENSUS_SECONDS, 0).to_nanos()
}

/// A body of the given type with every field at its default. Hook store
/// bodies target hook 1 of the payer.
pub fn empty_data(kind: TransactionType) -> TransactionData {
    use TransactionData as D;
    use TransactionType as T;

    match kind {
        T::AtomicBatch => D::AtomicBatch(Default::default()),
        T::ConsensusCreateTopic => D::ConsensusCreateTopic(Default::default()),
        T::ConsensusDeleteTopic => D::ConsensusDeleteTopic(Default::default()),
        T::ConsensusSubmitMessage => D::ConsensusSubmitMessage(Default::default()),
        T::ConsensusUpdateTopic => D::ConsensusUpdateTopic(Default::default()),
        T::ContractCall => D::ContractCall(Default::default()),
        T::ContractCreateInstance => D::ContractCreateInstance(Default::default()),
        T::ContractDeleteInstance => D::ContractDeleteInstance(Default::default()),
        T::ContractUpdateInstance => D::ContractUpdateInstance(Default::default()),
        T::CryptoAddLiveHash => D::CryptoAddLiveHash(Default::default()),
        T::CryptoApproveAllowance => D::CryptoApproveAllowance(Default::default()),
        T::CryptoCreateAccount => D::CryptoCreateAccount(Default::default()),
        T::CryptoDelete => D::CryptoDelete(Default::default()),
        T::CryptoDeleteAllowance => D::CryptoDeleteAllowance(Default::default()),
        T::CryptoDeleteLiveHash => D::CryptoDeleteLiveHash(Default::default()),
        T::CryptoTransfer => D::CryptoTransfer(Default::default()),
        T::CryptoUpdateAccount => D::CryptoUpdateAccount(Default::default()),
        T::EthereumTransaction => D::EthereumTransaction(Default::default()),
        T::FileAppend => D::FileAppend(Default::default()),
        T::FileCreate => D::FileCreate(Default::default()),
        T::FileDelete => D::FileDelete(Default::default()),
        T::FileUpdate => D::FileUpdate(Default::default()),
        T::Freeze => D::Freeze(Default::default()),
        T::HookStore => D::HookStore(HookStoreBody {
            hook_id: HookIdRef {
                entity_id: HookEntityId::AccountId(account(PAYER)),
                hook_id: 1,
            },
            storage_updates: Vec::new(),
        }),
        T::LedgerIdPublication => D::LedgerIdPublication(Default::default()),
        T::NodeCreate => D::NodeCreate(Default::default()),
        T::NodeDelete => D::NodeDelete(Default::default()),
        T::NodeStakeUpdate => D::NodeStakeUpdate(Default::default()),
        T::NodeUpdate => D::NodeUpdate(Default::default()),
        T::ScheduleCreate => D::ScheduleCreate(Default::default()),
        T::ScheduleDelete => D::ScheduleDelete(Default::default()),
        T::ScheduleSign => D::ScheduleSign(Default::default()),
        T::SystemDelete => D::SystemDelete(Default::default()),
        T::SystemUndelete => D::SystemUndelete(Default::default()),
        T::TokenAirdrop => D::TokenAirdrop(Default::default()),
        T::TokenAssociate => D::TokenAssociate(Default::default()),
        T::TokenBurn => D::TokenBurn(Default::default()),
        T::TokenCancelAirdrop => D::TokenCancelAirdrop(Default::default()),
        T::TokenClaimAirdrop => D::TokenClaimAirdrop(Default::default()),
        T::TokenCreation => D::TokenCreation(Default::default()),
        T::TokenDeletion => D::TokenDeletion(Default::default()),
        T::TokenDissociate => D::TokenDissociate(Default::default()),
        T::TokenFeeScheduleUpdate => D::TokenFeeScheduleUpdate(Default::default()),
        T::TokenFreeze => D::TokenFreeze(Default::default()),
        T::TokenGrantKyc => D::TokenGrantKyc(Default::default()),
        T::TokenMint => D::TokenMint(Default::default()),
        T::TokenPause => D::TokenPause(Default::default()),
        T::TokenReject => D::TokenReject(Default::default()),
        T::TokenRevokeKyc => D::TokenRevokeKyc(Default::default()),
        T::TokenUnfreeze => D::TokenUnfreeze(Default::default()),
        T::TokenUnpause => D::TokenUnpause(Default::default()),
        T::TokenUpdate => D::TokenUpdate(Default::default()),
        T::TokenUpdateNfts => D::TokenUpdateNfts(Default::default()),
        T::TokenWipe => D::TokenWipe(Default::default()),
        T::UncheckedSubmit => D::UncheckedSubmit(Default::default()),
        T::UtilPrng => D::UtilPrng(Default::default()),
        T::Unknown => D::Unknown,
    }
}

/// Fluent builder for [`RecordItem`]s.
#[derive(Debug, Clone)]
pub struct RecordItemBuilder {
    body: TransactionBody,
    record: TransactionRecord,
    hapi_version: Version,
    parent: Option<Arc<RecordItem>>,
    hook_execution_index: Option<usize>,
}

impl RecordItemBuilder {
    pub fn new(data: TransactionData) -> Self {
        let consensus_timestamp = Timestamp::new(CONSENSUS_SECONDS, 0);
        Self {
            body: TransactionBody {
                transaction_id: TransactionId {
                    account_id: account(PAYER),
                    transaction_valid_start: Timestamp::new(CONSENSUS_SECONDS - 10, 0),
                    scheduled: false,
                    nonce: 0,
                },
                node_account_id: Some(account(NODE)),
                transaction_fee: 100_000_000,
                memo: String::new(),
                data,
            },
            record: TransactionRecord {
                receipt: TransactionReceipt {
                    status: ResponseCode::SUCCESS,
                    ..TransactionReceipt::default()
                },
                consensus_timestamp,
                transaction_fee: 50_000,
                ..TransactionRecord::default()
            },
            hapi_version: Version::LATEST,
            parent: None,
            hook_execution_index: None,
        }
    }

    pub fn payer(mut self, payer: AccountId) -> Self {
        self.body.transaction_id.account_id = payer;
        self
    }

    pub fn node(mut self, node: Option<AccountId>) -> Self {
        self.body.node_account_id = node;
        self
    }

    pub fn consensus_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.record.consensus_timestamp = timestamp;
        self
    }

    pub fn status(mut self, status: ResponseCode) -> Self {
        self.record.receipt.status = status;
        self
    }

    pub fn hapi_version(mut self, version: Version) -> Self {
        self.hapi_version = version;
        self
    }

    pub fn memo(mut self, memo: &str) -> Self {
        self.body.memo = memo.to_string();
        self
    }

    pub fn receipt(mut self, customize: impl FnOnce(&mut TransactionReceipt)) -> Self {
        customize(&mut self.record.receipt);
        self
    }

    pub fn record(mut self, customize: impl FnOnce(&mut TransactionRecord)) -> Self {
        customize(&mut self.record);
        self
    }

    /// Makes this item a child of `parent`, one nanosecond after it.
    pub fn parent(mut self, parent: RecordItem) -> Self {
        let parent_timestamp = parent.record.consensus_timestamp;
        self.record.parent_consensus_timestamp = Some(parent_timestamp);
        self.record.consensus_timestamp = Timestamp::from_nanos(parent_timestamp.to_nanos() + 1);
        self.parent = Some(Arc::new(parent));
        self
    }

    pub fn hook_execution_index(mut self, index: usize) -> Self {
        self.hook_execution_index = Some(index);
        self
    }

    pub fn build(self) -> RecordItem {
        RecordItem {
            body: self.body,
            record: self.record,
            hapi_version: self.hapi_version,
            parent: self.parent,
            hook_execution_index: self.hook_execution_index,
        }
    }
}
