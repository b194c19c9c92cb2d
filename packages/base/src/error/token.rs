use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    OverflowError(#[from] OverflowError),

    #[error("{0}")]
    PaymentError(#[from] PaymentError),

    #[error("unauthorized")]
    Unauthorized {},

    #[error("nothing to mint")]
    NothingToMint {},

    #[error("nothing to burn")]
    NothingToBurn {},

    #[error("nothing to transfer")]
    NothingToTransfer {},

    #[error("Exchange rate must not be zero")]
    InvalidExchangeRate {},

    #[error("Fee rate {fee_rate} exceeds maximum {max_fee_rate}")]
    FeeRateTooHigh {
        fee_rate: Uint128,
        max_fee_rate: Uint128,
    },

    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        required: Uint128,
        available: Uint128,
    },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Uint128,
        available: Uint128,
    },

    #[error("Governance is already set to {governance}")]
    GovernanceAlreadySet { governance: String },

    #[error("unknown reply id: {id}")]
    UnknownReplyId { id: u64 },

    #[error("Semver parsing error: {0}")]
    SemVer(String),

    #[error("Can't migrate from {storage_contract_name} to {contract_name}")]
    MigrationError {
        storage_contract_name: String,
        contract_name: String,
    },
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::SemVer(err.to_string())
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
