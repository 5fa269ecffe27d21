use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Timestamp, Uint128};

use crate::error::ConfigError;
use crate::schedule::{
    Column, ScheduleValidator, BONUS_SCHEDULE, PRICE_TIERS, VESTING_SCHEDULE,
};

#[cw_serde]
#[derive(Eq)]
pub struct PriceTiers {
    pub thresholds: Vec<Uint128>,
    pub prices: Vec<Uint128>,
}

#[cw_serde]
#[derive(Eq)]
pub struct BonusSchedule {
    pub thresholds: Vec<Uint128>,
    pub rates_bps: Vec<u32>,
}

#[cw_serde]
#[derive(Eq)]
pub struct VestingSchedule {
    pub durations_months: Vec<u32>,
    pub release_rates_bps: Vec<u32>,
}

/// Arguments of the one-time initializer. Field order is part of the wire
/// format: reordering or dropping a field breaks every deployed consumer.
#[cw_serde]
#[derive(Eq)]
pub struct InstantiateMsg {
    pub sale_token: String,
    pub payment_token: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub price_tiers: PriceTiers,
    pub bonus_schedule: BonusSchedule,
    pub vesting_schedule: VestingSchedule,
    pub vesting_mode: u8,
    pub claim_delay: u32,
}

impl InstantiateMsg {
    /// Same checks run off-chain by the builder and on-chain by the initializer.
    pub fn check_integrity(&self, now: Timestamp) -> Result<(), ConfigError> {
        if self.start_time <= now {
            return Err(ConfigError::InvalidStartTime {
                start_time: self.start_time,
                now,
            });
        }
        if self.end_time <= self.start_time {
            return Err(ConfigError::InvalidEndTime {
                start_time: self.start_time,
                end_time: self.end_time,
            });
        }
        if self.sale_token == self.payment_token {
            return Err(ConfigError::IdenticalTokens {});
        }

        let mut validator = ScheduleValidator::new();
        validator.check_aligned(
            PRICE_TIERS,
            &self.price_tiers.thresholds,
            &self.price_tiers.prices,
            false,
        );
        validator.check_nonzero(
            PRICE_TIERS,
            Column::Values,
            self.price_tiers.prices.iter().map(|price| price.u128()).enumerate(),
        );
        validator.check_aligned(
            BONUS_SCHEDULE,
            &self.bonus_schedule.thresholds,
            &self.bonus_schedule.rates_bps,
            true,
        );
        validator.check_bps(BONUS_SCHEDULE, Column::Values, &self.bonus_schedule.rates_bps);
        validator.check_aligned(
            VESTING_SCHEDULE,
            &self.vesting_schedule.durations_months,
            &self.vesting_schedule.release_rates_bps,
            true,
        );
        validator.check_bps(
            VESTING_SCHEDULE,
            Column::Values,
            &self.vesting_schedule.release_rates_bps,
        );
        validator
            .finish()
            .map_err(|violations| ConfigError::MisalignedSchedule { violations })
    }
}

/// Code-only upgrade. Carries nothing that could touch stored state.
#[cw_serde]
pub struct MigrateMsg {}

/// Configuration as persisted by the presale contract.
#[cw_serde]
pub struct Config {
    pub owner: Addr,
    pub sale_token: Addr,
    pub payment_token: Addr,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub price_tiers: PriceTiers,
    pub bonus_schedule: BonusSchedule,
    pub vesting_schedule: VestingSchedule,
    pub vesting_mode: u8,
    pub claim_delay: u32,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(bool)]
    IsPaused {},
    #[returns(Vec<Addr>)]
    Pausers {},
}
