//! The closed set of transaction kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a transaction kind affects its primary entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityOperation {
    None,
    Create,
    Update,
    Delete,
}

macro_rules! transaction_types {
    ($($variant:ident = $id:literal => $operation:ident),* $(,)?) => {
        /// Kind of a transaction, with its stable protocol id.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum TransactionType {
            $($variant,)*
        }

        impl TransactionType {
            /// Every kind, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            pub fn proto_id(self) -> i32 {
                match self {
                    $(Self::$variant => $id,)*
                }
            }

            /// Unknown ids map to [`TransactionType::Unknown`].
            pub fn from_proto_id(id: i32) -> Self {
                match id {
                    $($id => Self::$variant,)*
                    #[allow(unreachable_patterns)]
                    _ => Self::Unknown,
                }
            }

            pub fn entity_operation(self) -> EntityOperation {
                match self {
                    $(Self::$variant => EntityOperation::$operation,)*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

transaction_types! {
    Unknown = -1 => None,
    ContractCall = 7 => None,
    ContractCreateInstance = 8 => Create,
    ContractUpdateInstance = 9 => Update,
    CryptoAddLiveHash = 10 => None,
    CryptoCreateAccount = 11 => Create,
    CryptoDelete = 12 => Delete,
    CryptoDeleteLiveHash = 13 => None,
    CryptoTransfer = 14 => None,
    CryptoUpdateAccount = 15 => Update,
    FileAppend = 16 => None,
    FileCreate = 17 => Create,
    FileDelete = 18 => Delete,
    FileUpdate = 19 => Update,
    SystemDelete = 20 => Delete,
    SystemUndelete = 21 => Update,
    ContractDeleteInstance = 22 => Delete,
    Freeze = 23 => None,
    ConsensusCreateTopic = 24 => Create,
    ConsensusUpdateTopic = 25 => Update,
    ConsensusDeleteTopic = 26 => Delete,
    ConsensusSubmitMessage = 27 => None,
    UncheckedSubmit = 28 => None,
    TokenCreation = 29 => Create,
    TokenFreeze = 31 => None,
    TokenUnfreeze = 32 => None,
    TokenGrantKyc = 33 => None,
    TokenRevokeKyc = 34 => None,
    TokenDeletion = 35 => Delete,
    TokenUpdate = 36 => Update,
    TokenMint = 37 => None,
    TokenBurn = 38 => None,
    TokenWipe = 39 => None,
    TokenAssociate = 40 => None,
    TokenDissociate = 41 => None,
    ScheduleCreate = 42 => Create,
    ScheduleDelete = 43 => Delete,
    ScheduleSign = 44 => None,
    TokenFeeScheduleUpdate = 45 => None,
    TokenPause = 46 => None,
    TokenUnpause = 47 => None,
    CryptoApproveAllowance = 48 => None,
    CryptoDeleteAllowance = 49 => None,
    EthereumTransaction = 50 => None,
    NodeStakeUpdate = 51 => None,
    UtilPrng = 52 => None,
    TokenUpdateNfts = 53 => None,
    NodeCreate = 54 => None,
    NodeUpdate = 55 => None,
    NodeDelete = 56 => None,
    TokenReject = 57 => None,
    TokenAirdrop = 58 => None,
    TokenCancelAirdrop = 59 => None,
    TokenClaimAirdrop = 60 => None,
    AtomicBatch = 74 => None,
    LedgerIdPublication = 75 => None,
    HookStore = 76 => None,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_proto_ids_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for kind in TransactionType::ALL {
            assert!(seen.insert(kind.proto_id()), "duplicate id for {kind}");
            assert_eq!(TransactionType::from_proto_id(kind.proto_id()), *kind);
        }
        assert_eq!(TransactionType::from_proto_id(9999), TransactionType::Unknown);
    }

    #[test]
    fn test_entity_operations() {
        assert_eq!(
            TransactionType::CryptoCreateAccount.entity_operation(),
            EntityOperation::Create
        );
        assert_eq!(TransactionType::SystemUndelete.entity_operation(), EntityOperation::Update);
        assert_eq!(TransactionType::ContractDeleteInstance.entity_operation(), EntityOperation::Delete);
        assert_eq!(TransactionType::CryptoTransfer.entity_operation(), EntityOperation::None);
    }
}
