//! Envseal - client-side encrypted secrets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envseal::cli::{self, output, Cli, LogFormat};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("ENVSEAL_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envseal=debug")
        } else {
            EnvFilter::new("envseal=warn")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    if let Err(e) = cli::execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = cli::hint(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
