use clap::Parser;

use summon::cli::{log_filter, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(cli.verbose >= 2)
        .init();

    tracing::debug!("summon started with verbosity level: {}", cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("fatal: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
