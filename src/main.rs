//! Sonify CLI - Image to Sound Renderer
//!
//! Command-line interface for the Sonify pipeline.

use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use sonify::cli::{commands, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Sonify v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => {
            debug!("Running {:?}", cmd);
            commands::run(cmd, cli.json).map_err(|e| {
                let hints = e.recovery_suggestions();
                let context = format!("[{}] {}", e.error_code(), hints.join("; "));
                anyhow::Error::new(e).context(context)
            })
        }
        None => {
            println!("Sonify v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}
