use cosmwasm_std::Timestamp;
use thiserror::Error;

use crate::schedule::Violation;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {field} address: {reason}")]
    InvalidAddress { field: String, reason: String },

    #[error("Invalid {field} address prefix: expected {expected}, found {found}")]
    WrongAddressPrefix {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Zero {field} address")]
    ZeroAddress { field: String },

    #[error("Sale token and payment token must differ")]
    IdenticalTokens {},

    #[error("Start offset must be positive")]
    InvalidStartOffset {},

    #[error("Sale duration must be positive")]
    InvalidDuration {},

    #[error("Timestamp overflow")]
    TimestampOverflow {},

    #[error("Invalid start time {start_time}: must be after {now}")]
    InvalidStartTime { start_time: Timestamp, now: Timestamp },

    #[error("Invalid end time {end_time}: must be after start time {start_time}")]
    InvalidEndTime {
        start_time: Timestamp,
        end_time: Timestamp,
    },

    #[error("Misaligned schedule ({} violations): {}", .violations.len(), join(.violations))]
    MisalignedSchedule { violations: Vec<Violation> },
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
