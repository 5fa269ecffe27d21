use bech32::FromBase32;
use cosmwasm_std::{to_json_vec, HexBinary, StdResult, Timestamp, Uint128};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;
use crate::msg::{BonusSchedule, InstantiateMsg, PriceTiers, VestingSchedule};
use crate::schedule::{
    NumericDomain, RawValue, SchedulePair, ScheduleValidator, BONUS_SCHEDULE, PRICE_TIERS,
    VESTING_SCHEDULE,
};

pub const SALE_TOKEN: &str = "sale_token";
pub const PAYMENT_TOKEN: &str = "payment_token";

const NANOS_PER_SECOND: u64 = 1_000_000_000;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSchedule {
    #[serde(default)]
    pub keys: Vec<RawValue>,
    #[serde(default)]
    pub values: Vec<RawValue>,
}

impl RawSchedule {
    pub fn new(keys: Vec<RawValue>, values: Vec<RawValue>) -> Self {
        RawSchedule { keys, values }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<RawValue>,
        V: Into<RawValue>,
    {
        let (keys, values) = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .unzip();
        RawSchedule { keys, values }
    }
}

/// Presale inputs before any validation, as read from a settings file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RawPresaleInputs {
    pub sale_token: String,
    pub payment_token: String,
    pub start_offset_seconds: u64,
    pub duration_seconds: u64,
    pub price_tiers: RawSchedule,
    #[serde(default)]
    pub bonus_schedule: RawSchedule,
    #[serde(default)]
    pub vesting_schedule: RawSchedule,
    #[serde(default)]
    pub vesting_mode: u8,
    #[serde(default)]
    pub claim_delay: u32,
}

/// Validated presale configuration. Only [`ConfigBuilder`] can produce one and
/// nothing can change it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresaleConfig {
    initializer: InstantiateMsg,
}

impl PresaleConfig {
    pub fn sale_token(&self) -> &str {
        &self.initializer.sale_token
    }

    pub fn payment_token(&self) -> &str {
        &self.initializer.payment_token
    }

    pub fn start_time(&self) -> Timestamp {
        self.initializer.start_time
    }

    pub fn end_time(&self) -> Timestamp {
        self.initializer.end_time
    }

    pub fn price_tiers(&self) -> impl Iterator<Item = (Uint128, Uint128)> + '_ {
        let tiers = &self.initializer.price_tiers;
        tiers
            .thresholds
            .iter()
            .copied()
            .zip(tiers.prices.iter().copied())
    }

    pub fn bonus_schedule(&self) -> &BonusSchedule {
        &self.initializer.bonus_schedule
    }

    pub fn vesting_schedule(&self) -> &VestingSchedule {
        &self.initializer.vesting_schedule
    }

    pub fn vesting_mode(&self) -> u8 {
        self.initializer.vesting_mode
    }

    pub fn claim_delay(&self) -> u32 {
        self.initializer.claim_delay
    }

    /// The initializer arguments in their wire order.
    pub fn initializer(&self) -> &InstantiateMsg {
        &self.initializer
    }

    /// sha256 of the initializer's JSON encoding.
    pub fn config_hash(&self) -> StdResult<HexBinary> {
        let encoded = to_json_vec(&self.initializer)?;
        Ok(HexBinary::from(Sha256::digest(encoded).to_vec()))
    }
}

/// Builds a [`PresaleConfig`] against a single sampled `now`.
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    now: Timestamp,
    bech32_prefix: Option<String>,
}

impl ConfigBuilder {
    pub fn new(now: Timestamp) -> Self {
        ConfigBuilder {
            now,
            bech32_prefix: None,
        }
    }

    /// Require token addresses to carry this human readable part.
    pub fn bech32_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bech32_prefix = Some(prefix.into());
        self
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn build(&self, inputs: &RawPresaleInputs) -> Result<PresaleConfig, ConfigError> {
        let sale_token = self.validate_address(SALE_TOKEN, &inputs.sale_token)?;
        let payment_token = self.validate_address(PAYMENT_TOKEN, &inputs.payment_token)?;
        if sale_token == payment_token {
            return Err(ConfigError::IdenticalTokens {});
        }
        let (start_time, end_time) =
            self.sale_window(inputs.start_offset_seconds, inputs.duration_seconds)?;

        let mut validator = ScheduleValidator::new();
        let price = validator.check_pair(&SchedulePair {
            name: PRICE_TIERS,
            keys: &inputs.price_tiers.keys,
            key_domain: NumericDomain::Uint128,
            values: &inputs.price_tiers.values,
            value_domain: NumericDomain::Uint128,
            allow_empty: false,
            values_nonzero: true,
        });
        let bonus = validator.check_pair(&SchedulePair {
            name: BONUS_SCHEDULE,
            keys: &inputs.bonus_schedule.keys,
            key_domain: NumericDomain::Uint128,
            values: &inputs.bonus_schedule.values,
            value_domain: NumericDomain::Bps,
            allow_empty: true,
            values_nonzero: false,
        });
        let vesting = validator.check_pair(&SchedulePair {
            name: VESTING_SCHEDULE,
            keys: &inputs.vesting_schedule.keys,
            key_domain: NumericDomain::U32,
            values: &inputs.vesting_schedule.values,
            value_domain: NumericDomain::Bps,
            allow_empty: true,
            values_nonzero: false,
        });
        validator
            .finish()
            .map_err(|violations| ConfigError::MisalignedSchedule { violations })?;

        // domains were checked above, narrowing cannot truncate
        let initializer = InstantiateMsg {
            sale_token,
            payment_token,
            start_time,
            end_time,
            price_tiers: PriceTiers {
                thresholds: price.keys.into_iter().map(Uint128::new).collect(),
                prices: price.values.into_iter().map(Uint128::new).collect(),
            },
            bonus_schedule: BonusSchedule {
                thresholds: bonus.keys.into_iter().map(Uint128::new).collect(),
                rates_bps: bonus.values.into_iter().map(|v| v as u32).collect(),
            },
            vesting_schedule: VestingSchedule {
                durations_months: vesting.keys.into_iter().map(|v| v as u32).collect(),
                release_rates_bps: vesting.values.into_iter().map(|v| v as u32).collect(),
            },
            vesting_mode: inputs.vesting_mode,
            claim_delay: inputs.claim_delay,
        };
        initializer.check_integrity(self.now)?;

        Ok(PresaleConfig { initializer })
    }

    fn sale_window(&self, offset: u64, duration: u64) -> Result<(Timestamp, Timestamp), ConfigError> {
        if offset == 0 {
            return Err(ConfigError::InvalidStartOffset {});
        }
        if duration == 0 {
            return Err(ConfigError::InvalidDuration {});
        }
        let start = self
            .now
            .seconds()
            .checked_add(offset)
            .ok_or(ConfigError::TimestampOverflow {})?;
        let end = start
            .checked_add(duration)
            .ok_or(ConfigError::TimestampOverflow {})?;
        Ok((to_timestamp(start)?, to_timestamp(end)?))
    }

    fn validate_address(&self, field: &str, value: &str) -> Result<String, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAddress {
            field: field.to_string(),
            reason,
        };
        let (hrp, data, _variant) = bech32::decode(value).map_err(|err| invalid(err.to_string()))?;
        if let Some(expected) = &self.bech32_prefix {
            if &hrp != expected {
                return Err(ConfigError::WrongAddressPrefix {
                    field: field.to_string(),
                    expected: expected.clone(),
                    found: hrp,
                });
            }
        }
        let payload = Vec::<u8>::from_base32(&data).map_err(|err| invalid(err.to_string()))?;
        if payload.iter().all(|byte| *byte == 0) {
            return Err(ConfigError::ZeroAddress {
                field: field.to_string(),
            });
        }
        // bech32 accepts all-uppercase input, chains only store lowercase
        Ok(value.to_lowercase())
    }
}

fn to_timestamp(seconds: u64) -> Result<Timestamp, ConfigError> {
    seconds
        .checked_mul(NANOS_PER_SECOND)
        .map(Timestamp::from_nanos)
        .ok_or(ConfigError::TimestampOverflow {})
}
