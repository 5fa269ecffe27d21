use std::error::Error as StdError;
use std::process::ExitCode;

use serde::Serialize;

use crate::error::Error;

/// Human-readable outcome of a driver run plus the process exit status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    message: String,
    code: u8,
}

impl Report {
    pub fn from_result<T: Serialize>(result: &Result<T, Error>) -> Self {
        match result {
            Ok(record) => {
                let message = serde_json::to_string_pretty(record).unwrap_or_else(|err| {
                    format!("succeeded, but the outcome could not be rendered: {err}")
                });
                Report { message, code: 0 }
            }
            Err(err) => Report {
                message: describe(err),
                code: 1,
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code)
    }
}

fn describe(err: &Error) -> String {
    let mut message = format!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    if err.is_outcome_unknown() {
        message.push_str(
            "\nnote: the outcome is unknown, the transaction may still be included. \
             Query the chain before retrying.",
        );
    }
    message
}
