#![cfg(test)]
use cosmwasm_std::{to_json_binary, Addr, Empty};
use cw_multi_test::Executor;
use presale::msg::ExecuteMsg;
use presale_deployer::{
    Artifact, Chain, DeploymentDriver, DeploymentRecord, DeploymentTarget, SandboxChain,
    UpgradeDriver, UpgradeError,
};
use presale_types::ConfigBuilder;

use crate::helpers::mock_messages::presale_mock_messages::return_presale_inputs;
use crate::helpers::mock_messages::settings_mock_messages::LABEL;
use crate::helpers::setup::setup;
use crate::helpers::utils::{
    foreign_contract, query_is_paused, query_presale_config, unversioned_presale_contract,
    FOREIGN_CONTRACT_NAME, UNVERSIONED_ARTIFACT_NAME, UNVERSIONED_VERSION,
};

async fn deploy(chain: &mut SandboxChain, artifact: &Artifact, target: DeploymentTarget) -> DeploymentRecord {
    let now = chain.block_time().await.unwrap();
    let config = ConfigBuilder::new(now)
        .build(&return_presale_inputs())
        .unwrap();
    DeploymentDriver::new(chain, artifact, target)
        .deploy(&config)
        .await
        .unwrap()
}

fn next_version(artifact: &Artifact) -> Artifact {
    let mut version = artifact.version().clone();
    version.minor += 1;
    Artifact::builtin(artifact.contract_name(), &version.to_string()).unwrap()
}

#[tokio::test]
async fn test_upgrade_keeps_address_and_state() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;
    let deployer = res.test_accounts.deployer;

    let deployment = deploy(&mut chain, &artifact, DeploymentTarget::new(LABEL)).await;
    let proxy = deployment.proxy_address().to_string();
    chain
        .app_mut()
        .execute_contract(
            Addr::unchecked(&deployer),
            Addr::unchecked(&proxy),
            &ExecuteMsg::Pause {},
            &[],
        )
        .unwrap();
    let before = query_presale_config(&chain, &proxy);

    let upgraded = next_version(&artifact);
    let record = UpgradeDriver::new(&mut chain, &upgraded)
        .upgrade(&proxy)
        .await
        .unwrap();

    assert_eq!(record.proxy_address(), proxy);
    assert_eq!(
        record.previous_implementation(),
        deployment.implementation().code_id
    );
    assert_ne!(
        record.new_implementation().code_id,
        deployment.implementation().code_id
    );
    assert_eq!(record.new_implementation().checksum, *upgraded.checksum());

    let info = chain.contract_info(&proxy).await.unwrap().unwrap();
    assert_eq!(info.code_id, record.new_implementation().code_id);
    assert_eq!(query_presale_config(&chain, &proxy), before);
    assert!(query_is_paused(&chain, &proxy));

    // the label still resolves to the same contract
    assert_eq!(
        chain.contract_by_label(LABEL).await.unwrap().as_deref(),
        Some(proxy.as_str())
    );
}

#[tokio::test]
async fn test_upgrade_to_same_code_reuses_upload() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;

    let deployment = deploy(&mut chain, &artifact, DeploymentTarget::new(LABEL)).await;
    let record = UpgradeDriver::new(&mut chain, &artifact)
        .upgrade(deployment.proxy_address())
        .await
        .unwrap();
    assert_eq!(record.new_implementation(), deployment.implementation());
}

#[tokio::test]
async fn test_unknown_proxy_is_refused() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;
    let stranger = res.test_accounts.stranger;

    let err = UpgradeDriver::new(&mut chain, &artifact)
        .upgrade(&stranger)
        .await
        .unwrap_err();
    match err {
        UpgradeError::ProxyNotFound { address } => assert_eq!(address, stranger),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(chain.code_by_checksum(artifact.checksum()).await.unwrap(), None);
}

#[tokio::test]
async fn test_only_admin_can_upgrade() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;
    let stranger = res.test_accounts.stranger;

    let deployment = deploy(
        &mut chain,
        &artifact,
        DeploymentTarget::new(LABEL).with_admin(stranger.clone()),
    )
    .await;
    let err = UpgradeDriver::new(&mut chain, &next_version(&artifact))
        .upgrade(deployment.proxy_address())
        .await
        .unwrap_err();
    match err {
        UpgradeError::NotAdmin { admin, sender, .. } => {
            assert_eq!(admin, Some(stranger));
            assert_eq!(sender, res.test_accounts.deployer);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_foreign_storage_layout_is_refused() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;
    let deployer = res.test_accounts.deployer;

    chain.register(FOREIGN_CONTRACT_NAME, foreign_contract);
    let foreign = Artifact::builtin(FOREIGN_CONTRACT_NAME, "1.0.0").unwrap();
    let stored = chain.store_code(&foreign).await.unwrap();
    let instantiated = chain
        .instantiate(
            stored.code_id,
            to_json_binary(&Empty {}).unwrap(),
            "other".to_string(),
            Some(deployer),
        )
        .await
        .unwrap();

    let err = UpgradeDriver::new(&mut chain, &artifact)
        .upgrade(&instantiated.address)
        .await
        .unwrap_err();
    match err {
        UpgradeError::IncompatibleStorageLayout {
            expected, found, ..
        } => {
            assert_eq!(expected, presale::contract::CONTRACT_NAME);
            assert_eq!(found.as_deref(), Some(FOREIGN_CONTRACT_NAME));
        }
        other => panic!("unexpected error {other:?}"),
    }
    let info = chain
        .contract_info(&instantiated.address)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info.code_id, stored.code_id);
}

#[tokio::test]
async fn test_downgrade_is_refused() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;

    let deployment = deploy(&mut chain, &artifact, DeploymentTarget::new(LABEL)).await;
    let older = Artifact::builtin(presale::contract::CONTRACT_NAME, "0.0.1").unwrap();
    let err = UpgradeDriver::new(&mut chain, &older)
        .upgrade(deployment.proxy_address())
        .await
        .unwrap_err();
    match err {
        UpgradeError::Downgrade { from, to } => {
            assert_eq!(from, artifact.version().clone());
            assert_eq!(to, semver::Version::new(0, 0, 1));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(chain.code_by_checksum(older.checksum()).await.unwrap(), None);
}

#[tokio::test]
async fn test_unparseable_stored_version_is_refused() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;
    let deployer = res.test_accounts.deployer;

    chain.register(UNVERSIONED_ARTIFACT_NAME, unversioned_presale_contract);
    let unversioned = Artifact::builtin(UNVERSIONED_ARTIFACT_NAME, "0.1.0").unwrap();
    let stored = chain.store_code(&unversioned).await.unwrap();
    let instantiated = chain
        .instantiate(
            stored.code_id,
            to_json_binary(&Empty {}).unwrap(),
            LABEL.to_string(),
            Some(deployer),
        )
        .await
        .unwrap();

    let err = UpgradeDriver::new(&mut chain, &artifact)
        .upgrade(&instantiated.address)
        .await
        .unwrap_err();
    match err {
        UpgradeError::InvalidStoredVersion { address, version } => {
            assert_eq!(address, instantiated.address);
            assert_eq!(version, UNVERSIONED_VERSION);
        }
        other => panic!("unexpected error {other:?}"),
    }
    // refused before any upload or migrate
    assert_eq!(chain.code_by_checksum(artifact.checksum()).await.unwrap(), None);
    let info = chain
        .contract_info(&instantiated.address)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info.code_id, stored.code_id);
}
