//! Music Export - copy a Yandex Music playlist into an Apple Music library.
//!
//! Every playlist track is searched on Apple Music and the best match is
//! added to the user's library, a bounded number of tracks at a time.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod sync;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // Credentials may live in a .env next to the binary's working dir
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    // Initialize logging (stdout is reserved for command output)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("music_export=info")),
        )
        .init();

    cli::run_command(&args)
}
