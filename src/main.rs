use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod diversity;
mod network;
mod ordination;
mod parsing;
mod pipeline;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("bindiv=debug,info")
    } else {
        EnvFilter::new("bindiv=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Summary(args) => {
            cli::summary::run(&args, cli.format, cli.verbose)?;
        }
        cli::Commands::Diversity(args) => {
            cli::diversity::run(&args, cli.format, cli.verbose)?;
        }
        cli::Commands::Rarefy(args) => {
            cli::rarefy::run(&args, cli.format, cli.verbose)?;
        }
        cli::Commands::Accumulate(args) => {
            cli::accumulate::run(&args, cli.format, cli.verbose)?;
        }
        cli::Commands::Ordinate(args) => {
            cli::ordinate::run(&args, cli.format, cli.verbose)?;
        }
        cli::Commands::Network(args) => {
            cli::network::run(&args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
