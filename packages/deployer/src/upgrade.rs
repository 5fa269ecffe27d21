use std::time::Duration;

use cosmwasm_std::to_json_binary;
use presale_types::MigrateMsg;
use semver::Version;
use tracing::{info, instrument, warn};

use crate::artifact::Artifact;
use crate::chain::{ensure_code, submit, Chain, Step};
use crate::deploy::DEFAULT_CONFIRMATION_TIMEOUT;
use crate::error::UpgradeError;
use crate::record::{Implementation, UpgradeRecord};

/// Swaps the code behind an existing presale. Storage stays where it is and the
/// initializer is never sent again.
pub struct UpgradeDriver<'a, C: Chain + ?Sized> {
    chain: &'a mut C,
    artifact: &'a Artifact,
    confirmation_timeout: Duration,
}

impl<'a, C: Chain + ?Sized> UpgradeDriver<'a, C> {
    pub fn new(chain: &'a mut C, artifact: &'a Artifact) -> Self {
        UpgradeDriver {
            chain,
            artifact,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    #[instrument(skip(self), fields(version = %self.artifact.version()))]
    pub async fn upgrade(self, proxy_address: &str) -> Result<UpgradeRecord, UpgradeError> {
        let Some(info) = self.chain.contract_info(proxy_address).await? else {
            warn!("no contract at this address");
            return Err(UpgradeError::ProxyNotFound {
                address: proxy_address.to_string(),
            });
        };

        let sender = self.chain.sender();
        if info.admin.as_deref() != Some(sender) {
            warn!(admin = ?info.admin, "signer cannot migrate this contract");
            return Err(UpgradeError::NotAdmin {
                address: proxy_address.to_string(),
                sender: sender.to_string(),
                admin: info.admin,
            });
        }

        let stored = self.chain.contract_version(proxy_address).await?;
        let expected = self.artifact.contract_name();
        let stored = match stored {
            Some(stored) if stored.contract == expected => stored,
            other => {
                let found = other.map(|version| version.contract);
                warn!(?found, "refusing to migrate over a foreign storage layout");
                return Err(UpgradeError::IncompatibleStorageLayout {
                    address: proxy_address.to_string(),
                    expected: expected.to_string(),
                    found,
                });
            }
        };
        let from: Version =
            stored
                .version
                .parse()
                .map_err(|_| UpgradeError::InvalidStoredVersion {
                    address: proxy_address.to_string(),
                    version: stored.version.clone(),
                })?;
        let to = self.artifact.version().clone();
        if to < from {
            warn!(%from, %to, "refusing to downgrade");
            return Err(UpgradeError::Downgrade { from, to });
        }

        let msg = to_json_binary(&MigrateMsg {})?;
        let code_id = ensure_code::<_, UpgradeError>(
            &mut *self.chain,
            self.artifact,
            self.confirmation_timeout,
        )
        .await?;
        let confirmation = submit(
            Step::Migrate,
            self.confirmation_timeout,
            self.chain.migrate(proxy_address, code_id, msg),
        )
        .await?;
        info!(
            previous_code_id = info.code_id,
            code_id,
            tx_hash = %confirmation.tx_hash,
            "presale upgraded"
        );

        Ok(UpgradeRecord::new(
            proxy_address.to_string(),
            info.code_id,
            Implementation {
                code_id,
                checksum: self.artifact.checksum().clone(),
            },
            confirmation.time,
            confirmation.tx_hash,
        ))
    }
}
