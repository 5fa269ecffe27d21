use std::fmt;

use cosmwasm_schema::cw_serde;
use serde::{Deserialize, Serialize};

pub const BPS_DENOMINATOR: u32 = 10_000;

pub const PRICE_TIERS: &str = "price_tiers";
pub const BONUS_SCHEDULE: &str = "bonus_schedule";
pub const VESTING_SCHEDULE: &str = "vesting_schedule";

/// A schedule entry as it arrives from a settings file. Amounts that do not
/// fit an `i64` have to be given as decimal strings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Text(String),
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(value) => write!(f, "{value}"),
            RawValue::Text(value) => write!(f, "{value}"),
        }
    }
}

enum ParseFailure {
    Negative,
    Overflow,
    Malformed,
}

impl RawValue {
    fn parse(&self) -> Result<u128, ParseFailure> {
        match self {
            RawValue::Int(value) => u128::try_from(*value).map_err(|_| ParseFailure::Negative),
            RawValue::Text(text) => {
                let text = text.trim();
                let (negative, digits) = match text.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, text),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseFailure::Malformed);
                }
                if negative {
                    // "-0" is still zero
                    return if digits.bytes().all(|b| b == b'0') {
                        Ok(0)
                    } else {
                        Err(ParseFailure::Negative)
                    };
                }
                // only digits left, so the sole failure mode is overflow
                digits.parse::<u128>().map_err(|_| ParseFailure::Overflow)
            }
        }
    }
}

/// Fixed-width integer domain a column is submitted as.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum NumericDomain {
    Uint128,
    U32,
    Bps,
}

impl NumericDomain {
    pub fn max(&self) -> u128 {
        match self {
            NumericDomain::Uint128 => u128::MAX,
            NumericDomain::U32 => u32::MAX as u128,
            NumericDomain::Bps => BPS_DENOMINATOR as u128,
        }
    }
}

impl fmt::Display for NumericDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericDomain::Uint128 => write!(f, "uint128"),
            NumericDomain::U32 => write!(f, "uint32"),
            NumericDomain::Bps => write!(f, "basis points (max {BPS_DENOMINATOR})"),
        }
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum Column {
    Keys,
    Values,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Keys => write!(f, "keys"),
            Column::Values => write!(f, "values"),
        }
    }
}

#[cw_serde]
#[derive(Eq)]
pub enum ViolationKind {
    Empty {},
    LengthMismatch {
        keys: u32,
        values: u32,
    },
    NonIncreasingKey {
        index: u32,
        previous: String,
        current: String,
    },
    Negative {
        column: Column,
        index: u32,
        value: String,
    },
    Overflow {
        column: Column,
        index: u32,
        value: String,
        domain: NumericDomain,
    },
    Malformed {
        column: Column,
        index: u32,
        value: String,
    },
    Zero {
        column: Column,
        index: u32,
    },
}

#[cw_serde]
#[derive(Eq)]
pub struct Violation {
    pub schedule: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.schedule)?;
        match &self.kind {
            ViolationKind::Empty {} => write!(f, "schedule is empty"),
            ViolationKind::LengthMismatch { keys, values } => {
                write!(f, "length mismatch ({keys} keys, {values} values)")
            }
            ViolationKind::NonIncreasingKey {
                index,
                previous,
                current,
            } => write!(
                f,
                "key {current} at index {index} does not increase over {previous}"
            ),
            ViolationKind::Negative {
                column,
                index,
                value,
            } => write!(f, "negative value {value} in {column} at index {index}"),
            ViolationKind::Overflow {
                column,
                index,
                value,
                domain,
            } => write!(
                f,
                "value {value} in {column} at index {index} does not fit {domain}"
            ),
            ViolationKind::Malformed {
                column,
                index,
                value,
            } => write!(f, "malformed value {value:?} in {column} at index {index}"),
            ViolationKind::Zero { column, index } => {
                write!(f, "zero value in {column} at index {index}")
            }
        }
    }
}

/// One named key/value column pair in its raw form.
#[derive(Debug, Clone, Copy)]
pub struct SchedulePair<'a> {
    pub name: &'a str,
    pub keys: &'a [RawValue],
    pub key_domain: NumericDomain,
    pub values: &'a [RawValue],
    pub value_domain: NumericDomain,
    pub allow_empty: bool,
    pub values_nonzero: bool,
}

/// Columns of a pair after parsing. Only meaningful when the validator that
/// produced it finished without violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPair {
    pub keys: Vec<u128>,
    pub values: Vec<u128>,
}

/// Collects every violation across any number of schedules instead of
/// stopping at the first one.
#[derive(Debug, Default)]
pub struct ScheduleValidator {
    violations: Vec<Violation>,
}

impl ScheduleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_pair(&mut self, pair: &SchedulePair) -> ParsedPair {
        self.check_shape(
            pair.name,
            pair.keys.len(),
            pair.values.len(),
            pair.allow_empty,
        );
        let keys = self.parse_column(pair.name, Column::Keys, pair.keys, pair.key_domain);
        let values = self.parse_column(pair.name, Column::Values, pair.values, pair.value_domain);
        self.check_increasing(pair.name, &keys);
        if pair.values_nonzero {
            let parsed = values
                .iter()
                .enumerate()
                .filter_map(|(index, value)| value.map(|value| (index, value)));
            self.check_nonzero(pair.name, Column::Values, parsed);
        }
        ParsedPair {
            keys: keys.into_iter().flatten().collect(),
            values: values.into_iter().flatten().collect(),
        }
    }

    /// Shape and ordering checks on columns that are already typed.
    pub fn check_aligned<K, V>(&mut self, name: &str, keys: &[K], values: &[V], allow_empty: bool)
    where
        K: PartialOrd + fmt::Display,
    {
        self.check_shape(name, keys.len(), values.len(), allow_empty);
        let keys = keys.iter().map(Some).collect::<Vec<_>>();
        self.check_increasing(name, &keys);
    }

    pub fn check_bps(&mut self, name: &str, column: Column, values: &[u32]) {
        for (index, value) in values.iter().enumerate() {
            if *value > BPS_DENOMINATOR {
                self.push(
                    name,
                    ViolationKind::Overflow {
                        column,
                        index: index as u32,
                        value: value.to_string(),
                        domain: NumericDomain::Bps,
                    },
                );
            }
        }
    }

    /// Flags zero entries. `values` yields each entry with its position in the column.
    pub fn check_nonzero(
        &mut self,
        name: &str,
        column: Column,
        values: impl Iterator<Item = (usize, u128)>,
    ) {
        for (index, value) in values {
            if value == 0 {
                self.push(
                    name,
                    ViolationKind::Zero {
                        column,
                        index: index as u32,
                    },
                );
            }
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn finish(self) -> Result<(), Vec<Violation>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }

    fn push(&mut self, schedule: &str, kind: ViolationKind) {
        self.violations.push(Violation {
            schedule: schedule.to_string(),
            kind,
        });
    }

    fn check_shape(&mut self, name: &str, keys: usize, values: usize, allow_empty: bool) {
        if !allow_empty && keys == 0 && values == 0 {
            self.push(name, ViolationKind::Empty {});
        }
        if keys != values {
            self.push(
                name,
                ViolationKind::LengthMismatch {
                    keys: keys as u32,
                    values: values as u32,
                },
            );
        }
    }

    fn check_increasing<K>(&mut self, name: &str, keys: &[Option<K>])
    where
        K: PartialOrd + fmt::Display,
    {
        for (index, window) in keys.windows(2).enumerate() {
            // unparsable entries are already reported
            if let [Some(previous), Some(current)] = window {
                if current <= previous {
                    self.push(
                        name,
                        ViolationKind::NonIncreasingKey {
                            index: index as u32 + 1,
                            previous: previous.to_string(),
                            current: current.to_string(),
                        },
                    );
                }
            }
        }
    }

    fn parse_column(
        &mut self,
        name: &str,
        column: Column,
        raw: &[RawValue],
        domain: NumericDomain,
    ) -> Vec<Option<u128>> {
        raw.iter()
            .enumerate()
            .map(|(index, value)| {
                let index = index as u32;
                let kind = match value.parse() {
                    Ok(parsed) if parsed <= domain.max() => return Some(parsed),
                    Ok(_) | Err(ParseFailure::Overflow) => ViolationKind::Overflow {
                        column,
                        index,
                        value: value.to_string(),
                        domain,
                    },
                    Err(ParseFailure::Negative) => ViolationKind::Negative {
                        column,
                        index,
                        value: value.to_string(),
                    },
                    Err(ParseFailure::Malformed) => ViolationKind::Malformed {
                        column,
                        index,
                        value: value.to_string(),
                    },
                };
                self.push(name, kind);
                None
            })
            .collect()
    }
}

/// Validates any number of named pairs and returns every violation found.
pub fn validate_schedules(pairs: &[SchedulePair]) -> Vec<Violation> {
    let mut validator = ScheduleValidator::new();
    for pair in pairs {
        validator.check_pair(pair);
    }
    validator.violations
}
