use std::time::Duration;

use presale_deployer::settings::{
    ArtifactSettings, DeployerSettings, NetworkSettings, Settings,
};

use super::presale_mock_messages::{address, return_presale_inputs, BECH32_PREFIX};

pub const LABEL: &str = "presale";
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

pub fn deployer() -> String {
    address(3)
}

pub fn return_settings() -> Settings {
    Settings {
        network: NetworkSettings {
            name: "localnet".to_string(),
            chain_id: "omniflix-local-1".to_string(),
            bech32_prefix: Some(BECH32_PREFIX.to_string()),
            confirmation_timeout: CONFIRMATION_TIMEOUT,
        },
        deployer: DeployerSettings {
            address: deployer(),
            label: LABEL.to_string(),
            admin: None,
        },
        artifact: ArtifactSettings {
            contract_name: presale::contract::CONTRACT_NAME.to_string(),
            version: presale::contract::CONTRACT_VERSION.to_string(),
            path: None,
        },
        presale: return_presale_inputs(),
    }
}
