use std::collections::HashMap;

use async_trait::async_trait;
use cosmwasm_std::{
    from_json, Addr, Binary, BlockInfo, CosmosMsg, Empty, HexBinary, Timestamp, WasmMsg,
};
use cw2::ContractVersion;
use cw_multi_test::{next_block, App, AppResponse, Contract, ContractWrapper, Executor};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::artifact::Artifact;
use crate::chain::{Chain, ChainError, Confirmation, ContractInfo, Instantiated, Step, StoredCode};

/// Storage key `cw2` writes the contract version under.
const CONTRACT_INFO_KEY: &[u8] = b"contract_info";

pub type ContractFactory = fn() -> Box<dyn Contract<Empty>>;

pub fn presale_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        presale::contract::execute,
        presale::contract::instantiate,
        presale::contract::query,
    )
    .with_migrate(presale::contract::migrate);
    Box::new(contract)
}

/// In-process chain backed by `cw-multi-test`.
///
/// Wasm bytes are never executed. An artifact is linked to native contract code
/// through its contract name, the presale contract is registered up front.
pub struct SandboxChain {
    app: App,
    sender: Addr,
    factories: HashMap<String, ContractFactory>,
    codes: HashMap<String, u64>,
    labels: HashMap<String, String>,
    tx_count: u64,
}

impl SandboxChain {
    pub fn new(sender: impl Into<String>) -> Self {
        let mut factories: HashMap<String, ContractFactory> = HashMap::new();
        factories.insert(
            presale::contract::CONTRACT_NAME.to_string(),
            presale_contract as ContractFactory,
        );
        SandboxChain {
            app: App::default(),
            sender: Addr::unchecked(sender),
            factories,
            codes: HashMap::new(),
            labels: HashMap::new(),
            tx_count: 0,
        }
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        let chain_id = chain_id.into();
        self.app.update_block(|block| block.chain_id = chain_id.clone());
        self
    }

    pub fn with_block_time(mut self, time: Timestamp) -> Self {
        self.app.update_block(|block| block.time = time);
        self
    }

    /// Links artifacts named `contract_name` to `factory`.
    pub fn register(&mut self, contract_name: impl Into<String>, factory: ContractFactory) {
        self.factories.insert(contract_name.into(), factory);
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    fn execute(&mut self, step: Step, msg: WasmMsg) -> Result<(AppResponse, Confirmation), ChainError> {
        let block = self.app.block_info();
        let res = self
            .app
            .execute(self.sender.clone(), CosmosMsg::Wasm(msg))
            .map_err(|err| ChainError::Rejected {
                reason: format!("{err:#}"),
            })?;
        let confirmation = self.confirm(step, &block);
        self.app.update_block(next_block);
        Ok((res, confirmation))
    }

    fn confirm(&mut self, step: Step, block: &BlockInfo) -> Confirmation {
        self.tx_count += 1;
        let preimage = format!("{}/{}/{}/{}", block.chain_id, block.height, self.tx_count, step);
        let tx_hash = HexBinary::from(Sha256::digest(preimage).to_vec()).to_hex().to_uppercase();
        debug!(%step, height = block.height, %tx_hash, "sandbox transaction included");
        Confirmation {
            tx_hash,
            height: block.height,
            time: block.time,
        }
    }
}

#[async_trait(?Send)]
impl Chain for SandboxChain {
    fn sender(&self) -> &str {
        self.sender.as_str()
    }

    async fn block_time(&self) -> Result<Timestamp, ChainError> {
        Ok(self.app.block_info().time)
    }

    async fn code_by_checksum(&self, checksum: &HexBinary) -> Result<Option<u64>, ChainError> {
        Ok(self.codes.get(&checksum.to_hex()).copied())
    }

    async fn store_code(&mut self, artifact: &Artifact) -> Result<StoredCode, ChainError> {
        let factory = *self
            .factories
            .get(artifact.contract_name())
            .ok_or_else(|| ChainError::UnsupportedArtifact {
                contract_name: artifact.contract_name().to_string(),
            })?;
        let code_id = self.app.store_code(factory());
        self.codes.insert(artifact.checksum().to_hex(), code_id);

        let block = self.app.block_info();
        let confirmation = self.confirm(Step::StoreCode, &block);
        self.app.update_block(next_block);
        Ok(StoredCode {
            code_id,
            confirmation,
        })
    }

    async fn instantiate(
        &mut self,
        code_id: u64,
        msg: Binary,
        label: String,
        admin: Option<String>,
    ) -> Result<Instantiated, ChainError> {
        let (res, confirmation) = self.execute(
            Step::Instantiate,
            WasmMsg::Instantiate {
                admin,
                code_id,
                msg,
                funds: vec![],
                label: label.clone(),
            },
        )?;
        let address = res
            .events
            .iter()
            .find(|event| event.ty == "instantiate")
            .and_then(|event| {
                event
                    .attributes
                    .iter()
                    .find(|attr| attr.key == "_contract_address")
            })
            .map(|attr| attr.value.clone())
            .ok_or_else(|| ChainError::Rejected {
                reason: "instantiate event carries no contract address".to_string(),
            })?;
        self.labels.insert(label, address.clone());
        Ok(Instantiated {
            address,
            confirmation,
        })
    }

    async fn migrate(
        &mut self,
        contract: &str,
        new_code_id: u64,
        msg: Binary,
    ) -> Result<Confirmation, ChainError> {
        let (_, confirmation) = self.execute(
            Step::Migrate,
            WasmMsg::Migrate {
                contract_addr: contract.to_string(),
                new_code_id,
                msg,
            },
        )?;
        Ok(confirmation)
    }

    async fn contract_info(&self, address: &str) -> Result<Option<ContractInfo>, ChainError> {
        // nothing but a missing contract makes this lookup fail in the sandbox
        let Ok(info) = self.app.wrap().query_wasm_contract_info(address) else {
            return Ok(None);
        };
        Ok(Some(ContractInfo {
            address: address.to_string(),
            code_id: info.code_id,
            admin: info.admin,
            creator: info.creator,
        }))
    }

    async fn contract_by_label(&self, label: &str) -> Result<Option<String>, ChainError> {
        Ok(self.labels.get(label).cloned())
    }

    async fn contract_version(
        &self,
        address: &str,
    ) -> Result<Option<ContractVersion>, ChainError> {
        let raw = self
            .app
            .wrap()
            .query_wasm_raw(address, CONTRACT_INFO_KEY.to_vec())
            .map_err(|err| ChainError::Query {
                reason: err.to_string(),
            })?;
        raw.map(|bytes| from_json(bytes))
            .transpose()
            .map_err(|err| ChainError::Query {
                reason: err.to_string(),
            })
    }
}
