use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cmd;

use cmd::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show(a) => a.run(),
        Commands::Simulate(a) => a.run(),
    }
}
