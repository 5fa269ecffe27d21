//! The actions the binary exposes, over any [`Chain`].

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use cosmwasm_std::{HexBinary, Timestamp};
use presale::msg::{Config, QueryMsg};
use presale_types::{InstantiateMsg, PresaleConfig};
use serde::Serialize;
use tracing::info;

use crate::chain::{Chain, ChainError};
use crate::deploy::DeploymentDriver;
use crate::error::Error;
use crate::record::{DeploymentRecord, UpgradeRecord};
use crate::sandbox::SandboxChain;
use crate::settings::Settings;
use crate::upgrade::UpgradeDriver;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Validation {
    pub now: Timestamp,
    pub config_hash: HexBinary,
    pub initializer: InstantiateMsg,
}

/// Outcome of a run against an in-process [`SandboxChain`], labelled so it
/// is never mistaken for a network deployment.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Sandboxed<T> {
    pub chain: &'static str,
    #[serde(flatten)]
    pub outcome: T,
}

impl<T> Sandboxed<T> {
    pub fn new(outcome: T) -> Self {
        Sandboxed {
            chain: SANDBOX,
            outcome,
        }
    }
}

pub const SANDBOX: &str = "sandbox";

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Rehearsal {
    pub deployment: DeploymentRecord,
    pub upgrade: UpgradeRecord,
    pub config_preserved: bool,
}

/// Samples the chain's clock once and builds the presale configuration
/// against it.
pub async fn build_config<C: Chain + ?Sized>(
    chain: &C,
    settings: &Settings,
) -> Result<PresaleConfig, Error> {
    let now = chain.block_time().await?;
    info!("Time is {now}");
    Ok(settings.config_builder(now).build(&settings.presale)?)
}

pub async fn validate<C: Chain + ?Sized>(
    chain: &C,
    settings: &Settings,
) -> Result<Validation, Error> {
    let now = chain.block_time().await?;
    validate_at(now, settings)
}

/// Builds the configuration against `now` without touching any chain.
pub fn validate_at(now: Timestamp, settings: &Settings) -> Result<Validation, Error> {
    info!("Time is {now}");
    let config = settings.config_builder(now).build(&settings.presale)?;
    Ok(Validation {
        now,
        config_hash: config.config_hash()?,
        initializer: config.initializer().clone(),
    })
}

pub async fn deploy<C: Chain + ?Sized>(
    chain: &mut C,
    settings: &Settings,
    base: &Path,
) -> Result<DeploymentRecord, Error> {
    let artifact = settings.artifact(base)?;
    let config = build_config(chain, settings).await?;
    let record = DeploymentDriver::new(chain, &artifact, settings.target())
        .with_confirmation_timeout(settings.network.confirmation_timeout)
        .deploy(&config)
        .await?;
    Ok(record)
}

pub async fn upgrade<C: Chain + ?Sized>(
    chain: &mut C,
    settings: &Settings,
    base: &Path,
    proxy_address: &str,
) -> Result<UpgradeRecord, Error> {
    let artifact = settings.artifact(base)?;
    let record = UpgradeDriver::new(chain, &artifact)
        .with_confirmation_timeout(settings.network.confirmation_timeout)
        .upgrade(proxy_address)
        .await?;
    Ok(record)
}

/// Deploys and then upgrades on a fresh sandbox, checking that the stored
/// configuration survives the code swap.
pub async fn rehearse(settings: &Settings, base: &Path) -> Result<Rehearsal, Error> {
    let mut chain = sandbox_chain(settings);

    let deployment = deploy(&mut chain, settings, base).await?;
    let before = stored_config(&chain, deployment.proxy_address())?;
    let upgrade = upgrade(&mut chain, settings, base, deployment.proxy_address()).await?;
    let after = stored_config(&chain, upgrade.proxy_address())?;

    Ok(Rehearsal {
        deployment,
        upgrade,
        config_preserved: before == after,
    })
}

/// Fresh sandbox for `settings`, its clock starting at the local wall clock.
pub fn sandbox_chain(settings: &Settings) -> SandboxChain {
    SandboxChain::new(settings.deployer.address.clone())
        .with_chain_id(settings.network.chain_id.clone())
        .with_block_time(wall_clock())
}

pub fn wall_clock() -> Timestamp {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Timestamp::from_nanos(elapsed.as_nanos() as u64)
}

fn stored_config(chain: &SandboxChain, address: &str) -> Result<Config, ChainError> {
    chain
        .app()
        .wrap()
        .query_wasm_smart(address, &QueryMsg::Config {})
        .map_err(|err| ChainError::Query {
            reason: err.to_string(),
        })
}
