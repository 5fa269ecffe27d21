pub mod artifact;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod record;
pub mod report;
pub mod sandbox;
pub mod settings;
pub mod upgrade;

pub use crate::artifact::{Artifact, ArtifactError};
pub use crate::chain::{Chain, ChainError, Confirmation, ContractInfo, Step};
pub use crate::deploy::{DeploymentDriver, DeploymentTarget};
pub use crate::error::{DeploymentError, Error, SubmissionTimeout, UpgradeError};
pub use crate::record::{DeploymentRecord, Implementation, UpgradeRecord};
pub use crate::report::Report;
pub use crate::sandbox::SandboxChain;
pub use crate::settings::{Settings, SettingsError};
pub use crate::upgrade::UpgradeDriver;
