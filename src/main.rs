//! Binary front-end for the stuck-at fault engine

mod cmd;

use std::process::ExitCode;

use clap::Parser;
pub use stag::{Gate, GateType, NetId};

#[doc(hidden)]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = cmd::Cli::parse();

    let result = match cli.command {
        cmd::Commands::Simulate(a) => a.run(),
        cmd::Commands::Faults(a) => a.run(),
        cmd::Commands::Generate(a) => a.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}
