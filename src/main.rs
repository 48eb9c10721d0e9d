//! pagetrack CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pagetrack::cli::{self, Cli};

/// Initialize the tracing subscriber.
///
/// `--debug` sets `pagetrack=debug`; otherwise `RUST_LOG` applies, defaulting to `pagetrack=info`.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pagetrack=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagetrack=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("pagetrack starting with args: {:?}", cli);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
