mod config;
mod data;
mod error;
mod graphics;
mod math;
mod modes;
mod scene;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use data::{args::Args, Program};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging();

    let config = args.resolve().context("failed to load configuration")?;

    for w in config.validate() {
        warn!("config: {w}");
    }

    let prog = Program::new(config).context("invalid configuration")?;

    modes::windowed_mode::winit_main(prog)
}
