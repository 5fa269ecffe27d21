use cosmwasm_std::{HexBinary, Timestamp};
use serde::{Deserialize, Serialize};

/// Uploaded code a contract runs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Implementation {
    pub code_id: u64,
    pub checksum: HexBinary,
}

/// Outcome of a first deployment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRecord {
    label: String,
    proxy_address: String,
    implementation: Implementation,
    deployed_at: Timestamp,
    config_hash: HexBinary,
    tx_hash: String,
}

impl DeploymentRecord {
    pub(crate) fn new(
        label: String,
        proxy_address: String,
        implementation: Implementation,
        deployed_at: Timestamp,
        config_hash: HexBinary,
        tx_hash: String,
    ) -> Self {
        DeploymentRecord {
            label,
            proxy_address,
            implementation,
            deployed_at,
            config_hash,
            tx_hash,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn proxy_address(&self) -> &str {
        &self.proxy_address
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn deployed_at(&self) -> Timestamp {
        self.deployed_at
    }

    pub fn config_hash(&self) -> &HexBinary {
        &self.config_hash
    }

    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }
}

/// Outcome of a code swap behind an existing address.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpgradeRecord {
    proxy_address: String,
    previous_implementation: u64,
    new_implementation: Implementation,
    upgraded_at: Timestamp,
    tx_hash: String,
}

impl UpgradeRecord {
    pub(crate) fn new(
        proxy_address: String,
        previous_implementation: u64,
        new_implementation: Implementation,
        upgraded_at: Timestamp,
        tx_hash: String,
    ) -> Self {
        UpgradeRecord {
            proxy_address,
            previous_implementation,
            new_implementation,
            upgraded_at,
            tx_hash,
        }
    }

    pub fn proxy_address(&self) -> &str {
        &self.proxy_address
    }

    /// Code id the contract ran before the swap.
    pub fn previous_implementation(&self) -> u64 {
        self.previous_implementation
    }

    pub fn new_implementation(&self) -> &Implementation {
        &self.new_implementation
    }

    pub fn upgraded_at(&self) -> Timestamp {
        self.upgraded_at
    }

    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }
}
