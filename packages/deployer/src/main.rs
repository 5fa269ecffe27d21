use std::process::ExitCode;

use clap::Parser;
use presale_deployer::cli::{run, Cli};
use presale_deployer::logging::setup_tracing_logger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = setup_tracing_logger() {
        eprintln!("failed to set up logging: {err}");
    }
    let report = run(Cli::parse()).await;
    if report.is_success() {
        println!("{}", report.message());
    } else {
        eprintln!("{}", report.message());
    }
    report.exit_code()
}
