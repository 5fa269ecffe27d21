use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cosmwasm_std::Timestamp;
use presale_types::{ConfigBuilder, RawPresaleInputs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{Artifact, ArtifactError};
use crate::deploy::{DeploymentTarget, DEFAULT_CONFIRMATION_TIMEOUT};

/// Overrides `deployer.address`.
pub const DEPLOYER_ADDRESS_ENV: &str = "PRESALE_DEPLOYER_ADDRESS";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to load .env file")]
    Dotenv(#[from] dotenvy::Error),

    #[error("No deployer address configured, set deployer.address or PRESALE_DEPLOYER_ADDRESS")]
    MissingDeployer {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub network: NetworkSettings,
    pub deployer: DeployerSettings,
    pub artifact: ArtifactSettings,
    pub presale: RawPresaleInputs,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NetworkSettings {
    pub name: String,
    pub chain_id: String,
    /// Token addresses must carry this prefix when set.
    #[serde(default)]
    pub bech32_prefix: Option<String>,
    #[serde(with = "humantime_serde", default = "default_confirmation_timeout")]
    pub confirmation_timeout: Duration,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeployerSettings {
    #[serde(default)]
    pub address: String,
    pub label: String,
    #[serde(default)]
    pub admin: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArtifactSettings {
    pub contract_name: String,
    pub version: String,
    /// Compiled wasm. Without one the artifact is resolved by name.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_confirmation_timeout() -> Duration {
    DEFAULT_CONFIRMATION_TIMEOUT
}

impl Settings {
    /// Reads `path`, after loading `.env` into the environment, and applies
    /// environment overrides.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err.into());
            }
        }
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        settings.check()?;
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(address) = lookup(DEPLOYER_ADDRESS_ENV).filter(|value| !value.is_empty()) {
            self.deployer.address = address;
        }
    }

    pub fn check(&self) -> Result<(), SettingsError> {
        if self.deployer.address.trim().is_empty() {
            return Err(SettingsError::MissingDeployer {});
        }
        Ok(())
    }

    pub fn config_builder(&self, now: Timestamp) -> ConfigBuilder {
        let builder = ConfigBuilder::new(now);
        match &self.network.bech32_prefix {
            Some(prefix) => builder.bech32_prefix(prefix.clone()),
            None => builder,
        }
    }

    /// Wasm paths are relative to `base`, normally the settings file's directory.
    pub fn artifact(&self, base: &Path) -> Result<Artifact, ArtifactError> {
        let ArtifactSettings {
            contract_name,
            version,
            path,
        } = &self.artifact;
        match path {
            Some(path) => Artifact::load(contract_name.clone(), version, &base.join(path)),
            None => Artifact::builtin(contract_name.clone(), version),
        }
    }

    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget {
            label: self.deployer.label.clone(),
            admin: self.deployer.admin.clone(),
        }
    }
}
