#![cfg(test)]
use std::time::Duration;

use presale_deployer::{
    Chain, DeploymentDriver, DeploymentError, DeploymentTarget, Error, Report, Step,
    UpgradeDriver, UpgradeError,
};
use presale_types::ConfigBuilder;

use crate::helpers::mock_messages::presale_mock_messages::return_presale_inputs;
use crate::helpers::mock_messages::settings_mock_messages::LABEL;
use crate::helpers::setup::setup;
use crate::helpers::utils::StalledChain;

const TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::test(start_paused = true)]
async fn test_stalled_instantiate_times_out() {
    let res = setup();
    let artifact = res.artifact;
    let mut chain = StalledChain {
        inner: res.chain,
        stall: Step::Instantiate,
    };

    let now = chain.block_time().await.unwrap();
    let config = ConfigBuilder::new(now)
        .build(&return_presale_inputs())
        .unwrap();
    let err = DeploymentDriver::new(&mut chain, &artifact, DeploymentTarget::new(LABEL))
        .with_confirmation_timeout(TIMEOUT)
        .deploy(&config)
        .await
        .unwrap_err();
    match &err {
        DeploymentError::Timeout(timeout) => {
            assert_eq!(timeout.step, Step::Instantiate);
            assert_eq!(timeout.after, TIMEOUT);
        }
        other => panic!("unexpected error {other:?}"),
    }
    // the upload went through before the stall
    assert!(chain
        .code_by_checksum(artifact.checksum())
        .await
        .unwrap()
        .is_some());

    let report = Report::from_result(&Err::<(), _>(Error::from(err)));
    assert_eq!(report.code(), 1);
    assert!(report.message().contains("outcome unknown"));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_migrate_times_out() {
    let res = setup();
    let artifact = res.artifact;
    let mut sandbox = res.chain;

    let now = sandbox.block_time().await.unwrap();
    let config = ConfigBuilder::new(now)
        .build(&return_presale_inputs())
        .unwrap();
    let deployment = DeploymentDriver::new(&mut sandbox, &artifact, DeploymentTarget::new(LABEL))
        .deploy(&config)
        .await
        .unwrap();

    let mut chain = StalledChain {
        inner: sandbox,
        stall: Step::Migrate,
    };
    let err = UpgradeDriver::new(&mut chain, &artifact)
        .with_confirmation_timeout(TIMEOUT)
        .upgrade(deployment.proxy_address())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UpgradeError::Timeout(ref timeout) if timeout.step == Step::Migrate
    ));
    assert!(Error::from(err).is_outcome_unknown());
}
