#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::{get_contract_version, set_contract_version};
use cw_utils::nonpayable;
use pauser::{PauseState, PAUSED_KEY, PAUSERS_KEY};
use semver::Version;

use crate::error::ContractError;
use crate::msg::{Config, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state::CONFIG;

// version info for migration info
pub const CONTRACT_NAME: &str = "crates.io:presale";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    // Initializer is single use
    if CONFIG.may_load(deps.storage)?.is_some() {
        return Err(ContractError::AlreadyInitialized {});
    }
    msg.check_integrity(env.block.time)?;
    let sale_token = deps.api.addr_validate(&msg.sale_token)?;
    let payment_token = deps.api.addr_validate(&msg.payment_token)?;
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        owner: info.sender,
        sale_token,
        payment_token,
        start_time: msg.start_time,
        end_time: msg.end_time,
        price_tiers: msg.price_tiers,
        bonus_schedule: msg.bonus_schedule,
        vesting_schedule: msg.vesting_schedule,
        vesting_mode: msg.vesting_mode,
        claim_delay: msg.claim_delay,
    };
    CONFIG.save(deps.storage, &config)?;

    let pause_state = PauseState::new(PAUSED_KEY, PAUSERS_KEY)?;
    pause_state.set_pausers(deps.storage, config.owner.clone(), vec![config.owner.clone()])?;

    let res = Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("start_time", config.start_time.to_string())
        .add_attribute("end_time", config.end_time.to_string());
    Ok(res)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Pause {} => execute_pause(deps, env, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, env, info),
        ExecuteMsg::SetPausers { pausers } => execute_set_pausers(deps, env, info, pausers),
    }
}

fn execute_pause(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let pause_state = PauseState::new(PAUSED_KEY, PAUSERS_KEY)?;
    pause_state.pause(deps.storage, &info.sender)?;
    Ok(Response::new().add_attribute("action", "pause"))
}

fn execute_unpause(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let pause_state = PauseState::new(PAUSED_KEY, PAUSERS_KEY)?;
    pause_state.unpause(deps.storage, &info.sender)?;
    Ok(Response::new().add_attribute("action", "unpause"))
}

fn execute_set_pausers(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pausers: Vec<String>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let validated = pausers
        .iter()
        .map(|pauser| deps.api.addr_validate(pauser))
        .collect::<StdResult<Vec<Addr>>>()?;
    let pause_state = PauseState::new(PAUSED_KEY, PAUSERS_KEY)?;
    pause_state.set_pausers(deps.storage, info.sender, validated)?;
    let res = Response::new()
        .add_attribute("action", "set_pausers")
        .add_attribute("pausers", pausers.join(","));
    Ok(res)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps, env)?),
        QueryMsg::IsPaused {} => to_json_binary(&query_is_paused(deps, env)?),
        QueryMsg::Pausers {} => to_json_binary(&query_pausers(deps, env)?),
    }
}

fn query_config(deps: Deps, _env: Env) -> StdResult<Config> {
    CONFIG.load(deps.storage)
}

fn query_is_paused(deps: Deps, _env: Env) -> Result<bool, ContractError> {
    let pause_state = PauseState::new(PAUSED_KEY, PAUSERS_KEY)?;
    Ok(pause_state.is_paused(deps.storage)?)
}

fn query_pausers(deps: Deps, _env: Env) -> Result<Vec<Addr>, ContractError> {
    let pause_state = PauseState::new(PAUSED_KEY, PAUSERS_KEY)?;
    Ok(pause_state.pausers(deps.storage)?)
}

/// Swaps code only. Stored configuration is carried over untouched and the
/// initializer is never re-run.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::IncompatibleStorageLayout {
            expected: CONTRACT_NAME.to_string(),
            found: stored.contract,
        });
    }
    let from = parse_version(&stored.version)?;
    let to = parse_version(CONTRACT_VERSION)?;
    if to < from {
        return Err(ContractError::CannotDowngrade {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    // Stored config must still decode with the new code
    CONFIG
        .load(deps.storage)
        .map_err(|_| ContractError::IncompatibleStorageLayout {
            expected: CONTRACT_NAME.to_string(),
            found: stored.contract.clone(),
        })?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    let res = Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", from.to_string())
        .add_attribute("to_version", to.to_string());
    Ok(res)
}

fn parse_version(version: &str) -> Result<Version, ContractError> {
    version.parse().map_err(|_| ContractError::InvalidVersion {
        version: version.to_string(),
    })
}
