use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod coverage;
mod parsing;
mod report;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Progress goes to stderr; stdout carries only the report
    let filter = if cli.verbose {
        EnvFilter::new("hybsel_stats=debug,info")
    } else {
        EnvFilter::new("hybsel_stats=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Report(args) => {
            cli::report::run(args, cli.format)?;
        }
    }

    Ok(())
}
