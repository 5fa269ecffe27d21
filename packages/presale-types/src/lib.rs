pub mod config;
pub mod error;
pub mod msg;
pub mod schedule;

pub use config::{ConfigBuilder, PresaleConfig, RawPresaleInputs, RawSchedule};
pub use error::ConfigError;
pub use msg::{InstantiateMsg, MigrateMsg, QueryMsg};
pub use schedule::{validate_schedules, RawValue, ScheduleValidator, Violation, ViolationKind};
