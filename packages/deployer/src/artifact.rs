use std::fs;
use std::path::{Path, PathBuf};

use cosmwasm_std::HexBinary;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read wasm artifact {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Wasm artifact {path} is empty")]
    Empty { path: PathBuf },

    #[error("Invalid artifact version {version}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },
}

/// A compiled contract ready for upload.
///
/// `contract_name` and `version` are what the code writes into `cw2` on
/// instantiation. They are declared alongside the bytes because the chain only
/// learns them once the code runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    contract_name: String,
    version: semver::Version,
    checksum: HexBinary,
    wasm: Option<Vec<u8>>,
}

impl Artifact {
    pub fn from_wasm(
        contract_name: impl Into<String>,
        version: &str,
        wasm: Vec<u8>,
    ) -> Result<Self, ArtifactError> {
        Ok(Artifact {
            contract_name: contract_name.into(),
            version: parse_version(version)?,
            checksum: checksum(&wasm),
            wasm: Some(wasm),
        })
    }

    pub fn load(
        contract_name: impl Into<String>,
        version: &str,
        path: &Path,
    ) -> Result<Self, ArtifactError> {
        let wasm = fs::read(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if wasm.is_empty() {
            return Err(ArtifactError::Empty {
                path: path.to_path_buf(),
            });
        }
        Self::from_wasm(contract_name, version, wasm)
    }

    /// An artifact without bytes, resolved by name on chains that link
    /// contracts natively. Its checksum is derived from `name@version`.
    pub fn builtin(contract_name: impl Into<String>, version: &str) -> Result<Self, ArtifactError> {
        let contract_name = contract_name.into();
        let version = parse_version(version)?;
        let checksum = checksum(format!("{contract_name}@{version}").as_bytes());
        Ok(Artifact {
            contract_name,
            version,
            checksum,
            wasm: None,
        })
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn version(&self) -> &semver::Version {
        &self.version
    }

    pub fn checksum(&self) -> &HexBinary {
        &self.checksum
    }

    pub fn wasm(&self) -> Option<&[u8]> {
        self.wasm.as_deref()
    }
}

fn parse_version(version: &str) -> Result<semver::Version, ArtifactError> {
    version
        .parse()
        .map_err(|source| ArtifactError::InvalidVersion {
            version: version.to_string(),
            source,
        })
}

fn checksum(bytes: &[u8]) -> HexBinary {
    HexBinary::from(Sha256::digest(bytes).to_vec())
}
