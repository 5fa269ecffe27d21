use std::time::Duration;

use cosmwasm_std::StdError;
use presale_types::ConfigError;
use semver::Version;
use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::chain::{ChainError, Step};
use crate::settings::SettingsError;

/// A submission whose confirmation did not arrive in time. The transaction may
/// or may not have been included.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{step} was not confirmed within {after:?}, outcome unknown")]
pub struct SubmissionTimeout {
    pub step: Step,
    pub after: Duration,
}

#[derive(Debug)]
pub enum SubmitFailure {
    Rejected { step: Step, source: ChainError },
    TimedOut(SubmissionTimeout),
}

#[derive(Error, Debug)]
pub enum DeploymentError {
    #[error("Presale already initialized under label {label} at {address}")]
    AlreadyInitialized { label: String, address: String },

    #[error("Invalid deployment target: {reason}")]
    InvalidTarget { reason: String },

    #[error("Chain query failed")]
    Query(#[from] ChainError),

    #[error("{step} rejected")]
    Submission {
        step: Step,
        #[source]
        source: ChainError,
    },

    #[error("Failed to encode initializer")]
    Encode(#[from] StdError),

    #[error(transparent)]
    Timeout(#[from] SubmissionTimeout),
}

impl From<SubmitFailure> for DeploymentError {
    fn from(failure: SubmitFailure) -> Self {
        match failure {
            SubmitFailure::Rejected { step, source } => DeploymentError::Submission { step, source },
            SubmitFailure::TimedOut(timeout) => DeploymentError::Timeout(timeout),
        }
    }
}

#[derive(Error, Debug)]
pub enum UpgradeError {
    #[error("No contract found at {address}")]
    ProxyNotFound { address: String },

    #[error("Signer {sender} is not the migration admin of {address} (admin: {})", .admin.as_deref().unwrap_or("none"))]
    NotAdmin {
        address: String,
        sender: String,
        admin: Option<String>,
    },

    #[error("Incompatible storage layout at {address}: expected {expected}, found {}", .found.as_deref().unwrap_or("no contract version"))]
    IncompatibleStorageLayout {
        address: String,
        expected: String,
        found: Option<String>,
    },

    #[error("Refusing to downgrade from {from} to {to}")]
    Downgrade { from: Version, to: Version },

    #[error("Contract at {address} records an invalid version {version}")]
    InvalidStoredVersion { address: String, version: String },

    #[error("Chain query failed")]
    Query(#[from] ChainError),

    #[error("{step} rejected")]
    Submission {
        step: Step,
        #[source]
        source: ChainError,
    },

    #[error("Failed to encode migration message")]
    Encode(#[from] StdError),

    #[error(transparent)]
    Timeout(#[from] SubmissionTimeout),
}

impl From<SubmitFailure> for UpgradeError {
    fn from(failure: SubmitFailure) -> Self {
        match failure {
            SubmitFailure::Rejected { step, source } => UpgradeError::Submission { step, source },
            SubmitFailure::TimedOut(timeout) => UpgradeError::Timeout(timeout),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid presale configuration")]
    Config(#[from] ConfigError),

    #[error("Deployment failed")]
    Deployment(#[from] DeploymentError),

    #[error("Upgrade failed")]
    Upgrade(#[from] UpgradeError),

    #[error("Invalid settings")]
    Settings(#[from] SettingsError),

    #[error("Invalid artifact")]
    Artifact(#[from] ArtifactError),

    #[error("Chain query failed")]
    Chain(#[from] ChainError),

    #[error("Failed to encode presale configuration")]
    Encode(#[from] StdError),

    #[error("No client is linked for network {network}, nothing was submitted (use --sandbox for an in-process chain)")]
    NoNetworkClient { network: String },
}

impl Error {
    /// Whether the action may have taken effect despite the error.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(
            self,
            Error::Deployment(DeploymentError::Timeout(_)) | Error::Upgrade(UpgradeError::Timeout(_))
        )
    }
}
