mod artifacts;
mod command_line;
mod config;
mod deploy;
mod error;
mod record;
mod signer;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use command_line::CommandLine;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cmd = CommandLine::parse();
    match cmd.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("deployment failed: {e:#}");
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
