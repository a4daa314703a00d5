//! Handler registry keyed by transaction type.

use std::collections::HashMap;
use std::sync::Arc;

use mirror_protocol::TransactionType;

use super::airdrop::{TokenAirdropHandler, TokenCancelAirdropHandler, TokenClaimAirdropHandler};
use super::allowance::{CryptoApproveAllowanceHandler, CryptoDeleteAllowanceHandler};
use super::consensus::{
    ConsensusCreateTopicHandler, ConsensusDeleteTopicHandler, ConsensusSubmitMessageHandler,
    ConsensusUpdateTopicHandler,
};
use super::contract::{
    ContractCallHandler, ContractCreateHandler, ContractDeleteHandler, ContractUpdateHandler,
};
use super::crypto::{
    CryptoAddLiveHashHandler, CryptoCreateHandler, CryptoDeleteHandler,
    CryptoDeleteLiveHashHandler, CryptoTransferHandler, CryptoUpdateHandler,
};
use super::ethereum::EthereumTransactionHandler;
use super::file::{FileAppendHandler, FileCreateHandler, FileDeleteHandler, FileUpdateHandler};
use super::hook::HookStoreHandler;
use super::node::{LedgerIdPublicationHandler, NodeCreateHandler, NodeDeleteHandler, NodeUpdateHandler};
use super::schedule::{ScheduleCreateHandler, ScheduleDeleteHandler, ScheduleSignHandler};
use super::system::{
    AtomicBatchHandler, FreezeHandler, NodeStakeUpdateHandler, SystemDeleteHandler,
    SystemUndeleteHandler, UncheckedSubmitHandler, UnknownDataHandler, UtilPrngHandler,
};
use super::token::{
    TokenAssociateHandler, TokenBurnHandler, TokenCreateHandler, TokenDeleteHandler,
    TokenDissociateHandler, TokenFeeScheduleUpdateHandler, TokenFreezeHandler,
    TokenGrantKycHandler, TokenMintHandler, TokenPauseHandler, TokenRejectHandler,
    TokenRevokeKycHandler, TokenUnfreezeHandler, TokenUnpauseHandler, TokenUpdateHandler,
    TokenUpdateNftsHandler, TokenWipeHandler,
};
use super::{HandlerContext, TransactionHandler};
use crate::error::{ImporterError, Result};

const TARGET: &str = "mirror_importer::parser::handler::factory";

/// Holds exactly one handler per [`TransactionType`].
///
/// Registration is checked once at construction: a handler must report the
/// type it is registered under, and no type may be registered twice.
pub struct TransactionHandlerFactory {
    handlers: HashMap<TransactionType, Arc<dyn TransactionHandler>>,
}

impl TransactionHandlerFactory {
    /// Registers the built-in handler of every transaction type.
    pub fn new(ctx: HandlerContext) -> Result<Self> {
        let mut handlers = Vec::with_capacity(TransactionType::ALL.len());
        for &kind in TransactionType::ALL {
            let handler = Self::create(kind, ctx.clone());
            let reported = handler.transaction_type();
            if reported != kind {
                return Err(ImporterError::MismatchedHandler {
                    registered: kind,
                    reported,
                });
            }
            handlers.push(handler);
        }
        Self::from_handlers(handlers)
    }

    /// Registers the given handlers under the types they report.
    pub fn from_handlers(handlers: Vec<Arc<dyn TransactionHandler>>) -> Result<Self> {
        let mut registry = HashMap::with_capacity(handlers.len());
        for handler in handlers {
            let kind = handler.transaction_type();
            if registry.contains_key(&kind) {
                return Err(ImporterError::DuplicateHandler(kind));
            }
            tracing::trace!(target: TARGET, transaction_type = %kind, "Registered handler");
            registry.insert(kind, handler);
        }

        tracing::debug!(
            target: TARGET,
            "Initialized handler factory with {} transaction types",
            registry.len()
        );

        Ok(Self { handlers: registry })
    }

    pub fn get(&self, kind: TransactionType) -> Result<&Arc<dyn TransactionHandler>> {
        self.handlers
            .get(&kind)
            .ok_or(ImporterError::MissingHandler(kind))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn create(kind: TransactionType, ctx: HandlerContext) -> Arc<dyn TransactionHandler> {
        use TransactionType as T;

        match kind {
            T::Unknown => Arc::new(UnknownDataHandler::new(ctx)),
            T::AtomicBatch => Arc::new(AtomicBatchHandler::new(ctx)),
            T::ConsensusCreateTopic => Arc::new(ConsensusCreateTopicHandler::new(ctx)),
            T::ConsensusDeleteTopic => Arc::new(ConsensusDeleteTopicHandler::new(ctx)),
            T::ConsensusSubmitMessage => Arc::new(ConsensusSubmitMessageHandler::new(ctx)),
            T::ConsensusUpdateTopic => Arc::new(ConsensusUpdateTopicHandler::new(ctx)),
            T::ContractCall => Arc::new(ContractCallHandler::new(ctx)),
            T::ContractCreateInstance => Arc::new(ContractCreateHandler::new(ctx)),
            T::ContractDeleteInstance => Arc::new(ContractDeleteHandler::new(ctx)),
            T::ContractUpdateInstance => Arc::new(ContractUpdateHandler::new(ctx)),
            T::CryptoAddLiveHash => Arc::new(CryptoAddLiveHashHandler::new(ctx)),
            T::CryptoApproveAllowance => Arc::new(CryptoApproveAllowanceHandler::new(ctx)),
            T::CryptoCreateAccount => Arc::new(CryptoCreateHandler::new(ctx)),
            T::CryptoDelete => Arc::new(CryptoDeleteHandler::new(ctx)),
            T::CryptoDeleteAllowance => Arc::new(CryptoDeleteAllowanceHandler::new(ctx)),
            T::CryptoDeleteLiveHash => Arc::new(CryptoDeleteLiveHashHandler::new(ctx)),
            T::CryptoTransfer => Arc::new(CryptoTransferHandler::new(ctx)),
            T::CryptoUpdateAccount => Arc::new(CryptoUpdateHandler::new(ctx)),
            T::EthereumTransaction => Arc::new(EthereumTransactionHandler::new(ctx)),
            T::FileAppend => Arc::new(FileAppendHandler::new(ctx)),
            T::FileCreate => Arc::new(FileCreateHandler::new(ctx)),
            T::FileDelete => Arc::new(FileDeleteHandler::new(ctx)),
            T::FileUpdate => Arc::new(FileUpdateHandler::new(ctx)),
            T::Freeze => Arc::new(FreezeHandler::new(ctx)),
            T::HookStore => Arc::new(HookStoreHandler::new(ctx)),
            T::LedgerIdPublication => Arc::new(LedgerIdPublicationHandler::new(ctx)),
            T::NodeCreate => Arc::new(NodeCreateHandler::new(ctx)),
            T::NodeDelete => Arc::new(NodeDeleteHandler::new(ctx)),
            T::NodeStakeUpdate => Arc::new(NodeStakeUpdateHandler::new(ctx)),
            T::NodeUpdate => Arc::new(NodeUpdateHandler::new(ctx)),
            T::ScheduleCreate => Arc::new(ScheduleCreateHandler::new(ctx)),
            T::ScheduleDelete => Arc::new(ScheduleDeleteHandler::new(ctx)),
            T::ScheduleSign => Arc::new(ScheduleSignHandler::new(ctx)),
            T::SystemDelete => Arc::new(SystemDeleteHandler::new(ctx)),
            T::SystemUndelete => Arc::new(SystemUndeleteHandler::new(ctx)),
            T::TokenAirdrop => Arc::new(TokenAirdropHandler::new(ctx)),
            T::TokenAssociate => Arc::new(TokenAssociateHandler::new(ctx)),
            T::TokenBurn => Arc::new(TokenBurnHandler::new(ctx)),
            T::TokenCancelAirdrop => Arc::new(TokenCancelAirdropHandler::new(ctx)),
            T::TokenClaimAirdrop => Arc::new(TokenClaimAirdropHandler::new(ctx)),
            T::TokenCreation => Arc::new(TokenCreateHandler::new(ctx)),
            T::TokenDeletion => Arc::new(TokenDeleteHandler::new(ctx)),
            T::TokenDissociate => Arc::new(TokenDissociateHandler::new(ctx)),
            T::TokenFeeScheduleUpdate => Arc::new(TokenFeeScheduleUpdateHandler::new(ctx)),
            T::TokenFreeze => Arc::new(TokenFreezeHandler::new(ctx)),
            T::TokenGrantKyc => Arc::new(TokenGrantKycHandler::new(ctx)),
            T::TokenMint => Arc::new(TokenMintHandler::new(ctx)),
            T::TokenPause => Arc::new(TokenPauseHandler::new(ctx)),
            T::TokenReject => Arc::new(TokenRejectHandler::new(ctx)),
            T::TokenRevokeKyc => Arc::new(TokenRevokeKycHandler::new(ctx)),
            T::TokenUnfreeze => Arc::new(TokenUnfreezeHandler::new(ctx)),
            T::TokenUnpause => Arc::new(TokenUnpauseHandler::new(ctx)),
            T::TokenUpdate => Arc::new(TokenUpdateHandler::new(ctx)),
            T::TokenUpdateNfts => Arc::new(TokenUpdateNftsHandler::new(ctx)),
            T::TokenWipe => Arc::new(TokenWipeHandler::new(ctx)),
            T::UncheckedSubmit => Arc::new(UncheckedSubmitHandler::new(ctx)),
            T::UtilPrng => Arc::new(UtilPrngHandler::new(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::listener::CollectingEntityListener;
    use crate::parser::resolver::InMemoryEntityIdResolver;
    use crate::properties::ImporterProperties;

    fn context() -> HandlerContext {
        HandlerContext::new(
            Arc::new(CollectingEntityListener::new()),
            Arc::new(InMemoryEntityIdResolver::new()),
            Arc::new(ImporterProperties::default()),
        )
    }

    #[test]
    fn test_every_type_has_a_handler() {
        let factory = TransactionHandlerFactory::new(context()).unwrap();
        assert_eq!(factory.len(), TransactionType::ALL.len());
        for &kind in TransactionType::ALL {
            assert_eq!(factory.get(kind).unwrap().transaction_type(), kind);
        }
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let ctx = context();
        let result = TransactionHandlerFactory::from_handlers(vec![
            Arc::new(FileCreateHandler::new(ctx.clone())),
            Arc::new(FileCreateHandler::new(ctx)),
        ]);
        assert!(matches!(
            result,
            Err(ImporterError::DuplicateHandler(TransactionType::FileCreate))
        ));
    }

    #[test]
    fn test_missing_handler() {
        let factory = TransactionHandlerFactory::from_handlers(vec![Arc::new(
            FileCreateHandler::new(context()),
        )])
        .unwrap();
        assert!(factory.get(TransactionType::FileCreate).is_ok());
        assert!(matches!(
            factory.get(TransactionType::TokenMint),
            Err(ImporterError::MissingHandler(TransactionType::TokenMint))
        ));
    }
}
