mod accumulate;
mod cli;
mod collect;
mod manifest;
mod program;
mod progress_bar;
mod registry;
mod report;
mod size_string;

use std::env;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    program::run(cli)?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ASSET_INVESTIGATOR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "asset_investigator=debug,info"
        } else {
            "asset_investigator=info,warn"
        })
    });

    let format = env::var("ASSET_INVESTIGATOR_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
