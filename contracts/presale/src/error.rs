use cosmwasm_std::StdError;
use cw_utils::PaymentError;
use pauser::PauseError;
use presale_types::ConfigError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    PaymentError(#[from] PaymentError),

    #[error(transparent)]
    Pause(#[from] PauseError),

    #[error("Presale already initialized")]
    AlreadyInitialized {},

    #[error("Incompatible storage layout: expected {expected}, found {found}")]
    IncompatibleStorageLayout { expected: String, found: String },

    #[error("Cannot migrate from version {from} down to {to}")]
    CannotDowngrade { from: String, to: String },

    #[error("Invalid contract version {version}")]
    InvalidVersion { version: String },
}

impl From<ContractError> for StdError {
    fn from(err: ContractError) -> StdError {
        StdError::generic_err(err.to_string())
    }
}
