//! Command line surface of the `presale-deployer` binary.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::warn;

use crate::commands::{self, Sandboxed};
use crate::error::Error;
use crate::report::Report;
use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file
    #[arg(short, long, default_value = "deploy.toml")]
    pub config: PathBuf,

    /// Run against a throwaway in-process chain instead of the configured network
    #[arg(long, global = true)]
    pub sandbox: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy the presale and run its initializer
    Deploy,

    /// Swap the code behind an existing presale
    Upgrade {
        /// Address of the deployed presale
        #[arg(long)]
        proxy: String,
    },

    /// Build and check the presale configuration without submitting anything
    Validate,

    /// Deploy then upgrade on a throwaway sandbox chain
    Rehearse,
}

/// Runs one command to completion. The report's code is the process exit status.
pub async fn run(cli: Cli) -> Report {
    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => return Report::from_result(&Err::<(), _>(Error::from(err))),
    };
    let base = cli
        .config
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    match (cli.command, cli.sandbox) {
        (Command::Rehearse, _) => sandboxed(commands::rehearse(&settings, &base).await),
        (Command::Validate, false) => {
            Report::from_result(&commands::validate_at(commands::wall_clock(), &settings))
        }
        (Command::Validate, true) => {
            let chain = commands::sandbox_chain(&settings);
            sandboxed(commands::validate(&chain, &settings).await)
        }
        (Command::Deploy, true) => {
            warn!("deploying to an in-process sandbox chain, nothing reaches the network");
            let mut chain = commands::sandbox_chain(&settings);
            sandboxed(commands::deploy(&mut chain, &settings, &base).await)
        }
        (Command::Upgrade { proxy }, true) => {
            warn!("upgrading on an in-process sandbox chain, nothing reaches the network");
            let mut chain = commands::sandbox_chain(&settings);
            sandboxed(commands::upgrade(&mut chain, &settings, &base, &proxy).await)
        }
        (Command::Deploy | Command::Upgrade { .. }, false) => {
            Report::from_result(&Err::<(), _>(Error::NoNetworkClient {
                network: settings.network.name.clone(),
            }))
        }
    }
}

fn sandboxed<T: Serialize>(result: Result<T, Error>) -> Report {
    Report::from_result(&result.map(Sandboxed::new))
}
