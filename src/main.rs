use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cache;
mod cli;
mod collect;
mod invoke;
mod params;
mod protocol;
mod report;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    let status = match args.command {
        Command::FromXslt(args) => workflow::run_from_xslt(&args)?,
        Command::FromXml(args) => workflow::run_from_xml(&args)?,
    };

    Ok(match status {
        workflow::RunStatus::Completed | workflow::RunStatus::Cancelled => ExitCode::SUCCESS,
        workflow::RunStatus::TransformFailed => ExitCode::FAILURE,
    })
}
