#![cfg(test)]
use std::path::Path;

use presale_deployer::{commands, Chain, Error};
use presale_types::{ConfigError, Violation, ViolationKind};

use crate::helpers::mock_messages::presale_mock_messages::schedule;
use crate::helpers::mock_messages::settings_mock_messages::{return_settings, LABEL};
use crate::helpers::setup::setup;
use crate::helpers::utils::query_presale_config;

fn violations_of(err: Error) -> Vec<Violation> {
    match err {
        Error::Config(ConfigError::MisalignedSchedule { violations }) => violations,
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_strictly_increasing_tiers_are_deployed() {
    let res = setup();
    let mut chain = res.chain;
    let mut settings = return_settings();
    settings.presale.price_tiers = schedule(&[(1000, 100), (5000, 90)]);

    let record = commands::deploy(&mut chain, &settings, Path::new("."))
        .await
        .unwrap();
    let stored = query_presale_config(&chain, record.proxy_address());
    assert_eq!(stored.price_tiers.thresholds.len(), 2);
}

#[tokio::test]
async fn test_equal_thresholds_are_rejected_before_submission() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;
    let mut settings = return_settings();
    settings.presale.price_tiers = schedule(&[(1000, 100), (1000, 90)]);

    let err = commands::deploy(&mut chain, &settings, Path::new("."))
        .await
        .unwrap_err();
    let violations = violations_of(err);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].schedule, "price_tiers");
    assert!(matches!(
        violations[0].kind,
        ViolationKind::NonIncreasingKey { index: 1, .. }
    ));

    assert_eq!(chain.code_by_checksum(artifact.checksum()).await.unwrap(), None);
    assert_eq!(chain.contract_by_label(LABEL).await.unwrap(), None);
}

#[tokio::test]
async fn test_short_bonus_rates_are_rejected_before_submission() {
    let res = setup();
    let mut chain = res.chain;
    let artifact = res.artifact;
    let mut settings = return_settings();
    settings.presale.bonus_schedule.values.pop();
    assert_eq!(settings.presale.bonus_schedule.keys.len(), 8);

    let err = commands::deploy(&mut chain, &settings, Path::new("."))
        .await
        .unwrap_err();
    let violations = violations_of(err);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].schedule, "bonus_schedule");
    assert_eq!(
        violations[0].kind,
        ViolationKind::LengthMismatch { keys: 8, values: 7 }
    );
    assert_eq!(chain.code_by_checksum(artifact.checksum()).await.unwrap(), None);
}

#[tokio::test]
async fn test_every_violation_is_reported() {
    let res = setup();
    let mut chain = res.chain;
    let mut settings = return_settings();
    settings.presale.price_tiers = schedule(&[(1000, 100), (1000, 90)]);
    settings.presale.bonus_schedule.values.pop();
    settings.presale.vesting_schedule = schedule(&[(6, 100), (8, 20_000)]);

    let err = commands::deploy(&mut chain, &settings, Path::new("."))
        .await
        .unwrap_err();
    let violations = violations_of(err);
    let schedules: Vec<&str> = violations.iter().map(|v| v.schedule.as_str()).collect();
    assert_eq!(
        schedules,
        vec!["price_tiers", "bonus_schedule", "vesting_schedule"]
    );
}

#[tokio::test]
async fn test_foreign_prefix_is_rejected() {
    let res = setup();
    let chain = res.chain;
    let mut settings = return_settings();
    settings.network.bech32_prefix = Some("cosmos".to_string());

    let err = commands::validate(&chain, &settings).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::WrongAddressPrefix { .. })
    ));
}

#[test]
fn test_shipped_rollout_settings_are_valid() {
    let settings =
        presale_deployer::Settings::from_toml_str(include_str!("../../../../deploy.toml")).unwrap();
    settings.check().unwrap();
    assert_eq!(settings.presale.bonus_schedule.keys.len(), 8);
    assert_eq!(settings.presale.vesting_schedule.values.len(), 8);

    let now = cosmwasm_std::Timestamp::from_seconds(1_700_000_000);
    let config = settings.config_builder(now).build(&settings.presale).unwrap();
    assert_eq!(config.start_time(), now.plus_seconds(360));
    assert_eq!(config.end_time(), now.plus_seconds(3_600_000));
    assert_eq!(
        config.price_tiers().collect::<Vec<_>>(),
        vec![(
            cosmwasm_std::Uint128::new(6_000_000_000),
            cosmwasm_std::Uint128::new(16_650_000_000_000_000)
        )]
    );
    assert_eq!(config.vesting_mode(), 3);
}
