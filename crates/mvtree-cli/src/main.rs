//! mvtree CLI binary.
//!
//! Initializes logging via `tracing` (filtered by `RUST_LOG`, `warn` by
//! default), parses arguments with `clap`, and dispatches to the command
//! handlers.

mod cli;
mod commands;

use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse();
    commands::dispatch(args).await
}
