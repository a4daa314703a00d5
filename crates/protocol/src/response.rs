use std::fmt;

use serde::{Deserialize, Serialize};

/// Consensus response code carried by a transaction receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseCode(pub i32);

impl ResponseCode {
    pub const OK: Self = Self(0);
    pub const INVALID_TRANSACTION: Self = Self(1);
    pub const INVALID_SIGNATURE: Self = Self(7);
    pub const INSUFFICIENT_PAYER_BALANCE: Self = Self(10);
    pub const INVALID_ACCOUNT_ID: Self = Self(15);
    pub const SUCCESS: Self = Self(22);
    pub const CONTRACT_REVERT_EXECUTED: Self = Self(33);
    pub const FEE_SCHEDULE_FILE_PART_UPLOADED: Self = Self(104);
    pub const SUCCESS_BUT_MISSING_EXPECTED_OPERATION: Self = Self(220);

    /// Whether the transaction took effect.
    pub fn is_successful(self) -> bool {
        matches!(
            self,
            Self::SUCCESS | Self::FEE_SCHEDULE_FILE_PART_UPLOADED | Self::SUCCESS_BUT_MISSING_EXPECTED_OPERATION
        )
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::OK => "OK",
            Self::INVALID_TRANSACTION => "INVALID_TRANSACTION",
            Self::INVALID_SIGNATURE => "INVALID_SIGNATURE",
            Self::INSUFFICIENT_PAYER_BALANCE => "INSUFFICIENT_PAYER_BALANCE",
            Self::INVALID_ACCOUNT_ID => "INVALID_ACCOUNT_ID",
            Self::SUCCESS => "SUCCESS",
            Self::CONTRACT_REVERT_EXECUTED => "CONTRACT_REVERT_EXECUTED",
            Self::FEE_SCHEDULE_FILE_PART_UPLOADED => "FEE_SCHEDULE_FILE_PART_UPLOADED",
            Self::SUCCESS_BUT_MISSING_EXPECTED_OPERATION => "SUCCESS_BUT_MISSING_EXPECTED_OPERATION",
            Self(code) => return write!(f, "{code}"),
        };
        f.write_str(name)
    }
}
