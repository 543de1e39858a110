use clap::Parser;
use miette::{Result, miette};
use ratatoskr::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_panic_hook();

    let args = Cli::parse();
    setup_logging(args.v)?;

    match args.action {
        Commands::Run(opts) => opts.run().await?,
        Commands::Replay(opts) => opts.replay().await?,
    }

    Ok(())
}

/// Logs at `info`, or `debug` when verbose, unless `RUST_LOG` says otherwise.
fn setup_logging(verbose: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| miette!("failed to set up logging: {error}"))?;

    Ok(())
}
