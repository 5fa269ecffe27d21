use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use cosmwasm_std::{Binary, HexBinary, Timestamp};
use cw2::ContractVersion;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::error::{SubmissionTimeout, SubmitFailure};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Transaction rejected: {reason}")]
    Rejected { reason: String },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    #[error("Chain cannot store artifact {contract_name}")]
    UnsupportedArtifact { contract_name: String },

    #[error("Query failed: {reason}")]
    Query { reason: String },
}

/// A state-changing submission.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    StoreCode,
    Instantiate,
    Migrate,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::StoreCode => f.write_str("store_code"),
            Step::Instantiate => f.write_str("instantiate"),
            Step::Migrate => f.write_str("migrate"),
        }
    }
}

/// Inclusion of a submission in a block.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: String,
    pub height: u64,
    pub time: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredCode {
    pub code_id: u64,
    pub confirmation: Confirmation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instantiated {
    pub address: String,
    pub confirmation: Confirmation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractInfo {
    pub address: String,
    pub code_id: u64,
    pub admin: Option<String>,
    pub creator: String,
}

/// Everything the drivers need from a network.
///
/// Submissions resolve only once the transaction is included in a block. A
/// future that never resolves is a stalled submission; callers bound it with
/// [`submit`].
#[async_trait(?Send)]
pub trait Chain {
    /// Address that signs every submission.
    fn sender(&self) -> &str;

    async fn block_time(&self) -> Result<Timestamp, ChainError>;

    /// Code id of an already uploaded code with this checksum.
    async fn code_by_checksum(&self, checksum: &HexBinary) -> Result<Option<u64>, ChainError>;

    async fn store_code(&mut self, artifact: &Artifact) -> Result<StoredCode, ChainError>;

    async fn instantiate(
        &mut self,
        code_id: u64,
        msg: Binary,
        label: String,
        admin: Option<String>,
    ) -> Result<Instantiated, ChainError>;

    async fn migrate(
        &mut self,
        contract: &str,
        new_code_id: u64,
        msg: Binary,
    ) -> Result<Confirmation, ChainError>;

    async fn contract_info(&self, address: &str) -> Result<Option<ContractInfo>, ChainError>;

    async fn contract_by_label(&self, label: &str) -> Result<Option<String>, ChainError>;

    /// The `cw2` version a contract recorded about itself, if any.
    async fn contract_version(&self, address: &str)
        -> Result<Option<ContractVersion>, ChainError>;
}

/// Awaits a submission for at most `after`.
///
/// Expiry does not mean the transaction failed, only that its outcome is not
/// known yet.
pub async fn submit<T, F>(step: Step, after: Duration, submission: F) -> Result<T, SubmitFailure>
where
    F: Future<Output = Result<T, ChainError>>,
{
    match tokio::time::timeout(after, submission).await {
        Ok(Ok(confirmed)) => Ok(confirmed),
        Ok(Err(source)) => Err(SubmitFailure::Rejected { step, source }),
        Err(_elapsed) => Err(SubmitFailure::TimedOut(SubmissionTimeout { step, after })),
    }
}

/// Returns the code id for `artifact`, uploading it only when no code with the
/// same checksum exists yet.
pub(crate) async fn ensure_code<C, E>(
    chain: &mut C,
    artifact: &Artifact,
    after: Duration,
) -> Result<u64, E>
where
    C: Chain + ?Sized,
    E: From<ChainError> + From<SubmitFailure>,
{
    if let Some(code_id) = chain.code_by_checksum(artifact.checksum()).await? {
        debug!(code_id, checksum = %artifact.checksum(), "reusing uploaded code");
        return Ok(code_id);
    }
    let stored = submit(Step::StoreCode, after, chain.store_code(artifact)).await?;
    info!(
        code_id = stored.code_id,
        tx_hash = %stored.confirmation.tx_hash,
        height = stored.confirmation.height,
        "code stored"
    );
    Ok(stored.code_id)
}
