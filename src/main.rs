use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use denada::cli::DenadaArgs;

fn main() -> miette::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = DenadaArgs::parse();
    denada::cli::run(args)
}
