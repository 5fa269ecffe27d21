use std::time::Duration;

use cosmwasm_std::to_json_binary;
use presale_types::PresaleConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::artifact::Artifact;
use crate::chain::{ensure_code, submit, Chain, Step};
use crate::error::DeploymentError;
use crate::record::{DeploymentRecord, Implementation};

pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a presale is deployed. The label names the deployment on chain and
/// is what makes a second deployment detectable.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub label: String,
    /// Migration admin, the signer when unset.
    pub admin: Option<String>,
}

impl DeploymentTarget {
    pub fn new(label: impl Into<String>) -> Self {
        DeploymentTarget {
            label: label.into(),
            admin: None,
        }
    }

    pub fn with_admin(mut self, admin: impl Into<String>) -> Self {
        self.admin = Some(admin.into());
        self
    }
}

/// Deploys a presale and runs its initializer, once.
pub struct DeploymentDriver<'a, C: Chain + ?Sized> {
    chain: &'a mut C,
    artifact: &'a Artifact,
    target: DeploymentTarget,
    confirmation_timeout: Duration,
}

impl<'a, C: Chain + ?Sized> DeploymentDriver<'a, C> {
    pub fn new(chain: &'a mut C, artifact: &'a Artifact, target: DeploymentTarget) -> Self {
        DeploymentDriver {
            chain,
            artifact,
            target,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    #[instrument(skip_all, fields(label = %self.target.label))]
    pub async fn deploy(self, config: &PresaleConfig) -> Result<DeploymentRecord, DeploymentError> {
        let label = self.target.label.trim();
        if label.is_empty() {
            return Err(DeploymentError::InvalidTarget {
                reason: "label must not be empty".to_string(),
            });
        }
        if let Some(address) = self.chain.contract_by_label(label).await? {
            warn!(%address, "presale already deployed under this label");
            return Err(DeploymentError::AlreadyInitialized {
                label: label.to_string(),
                address,
            });
        }

        let msg = to_json_binary(config.initializer())?;
        let config_hash = config.config_hash()?;

        let code_id = ensure_code::<_, DeploymentError>(
            &mut *self.chain,
            self.artifact,
            self.confirmation_timeout,
        )
        .await?;

        let admin = self
            .target
            .admin
            .clone()
            .unwrap_or_else(|| self.chain.sender().to_string());
        let instantiated = submit(
            Step::Instantiate,
            self.confirmation_timeout,
            self.chain
                .instantiate(code_id, msg, label.to_string(), Some(admin)),
        )
        .await?;
        info!(
            address = %instantiated.address,
            code_id,
            tx_hash = %instantiated.confirmation.tx_hash,
            "presale deployed"
        );

        Ok(DeploymentRecord::new(
            label.to_string(),
            instantiated.address,
            Implementation {
                code_id,
                checksum: self.artifact.checksum().clone(),
            },
            instantiated.confirmation.time,
            config_hash,
            instantiated.confirmation.tx_hash,
        ))
    }
}
