//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `find`: single-track search and add
//! - `sync`: copy a whole playlist
//! - `setup`: config file and credential checks, saved reports

mod find;
mod setup;
mod sync;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config, Overrides, env_vars};

pub use find::cmd_find;
pub use setup::{cmd_check_config, cmd_init_config, cmd_show_report};
pub use sync::cmd_sync;

/// Copy a Yandex Music playlist into your Apple Music library
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Apple Music credentials
#[derive(Args, Debug, Default, Clone)]
pub struct AppleArgs {
    /// Apple Music developer token, including "Bearer "
    #[arg(long, env = env_vars::APPLE_AUTH_TOKEN, hide_env_values = true)]
    pub apple_token: Option<String>,
    /// Apple Music user token (needed to add to the library)
    #[arg(long, env = env_vars::APPLE_MEDIA_USER_TOKEN, hide_env_values = true)]
    pub apple_media_user_token: Option<String>,
}

/// Yandex Music credentials and playlist
#[derive(Args, Debug, Default, Clone)]
pub struct YandexArgs {
    /// Yandex Music OAuth token, including "OAuth "
    #[arg(long, env = env_vars::YANDEX_AUTH_TOKEN, hide_env_values = true)]
    pub yandex_token: Option<String>,
    /// Owner of the playlist
    #[arg(long, env = env_vars::YANDEX_USER_ID)]
    pub yandex_user_id: Option<String>,
    /// Playlist kind (the number in the playlist URL)
    #[arg(long, env = env_vars::YANDEX_PLAYLIST_ID)]
    pub yandex_playlist_id: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Find one track on Apple Music and add it to the library
    Find {
        /// Free-text search, e.g. "Кино Группа крови"
        #[arg(short, long)]
        name: String,
        /// Only show the match, don't add it
        #[arg(long)]
        no_add: bool,
        #[command(flatten)]
        apple: AppleArgs,
    },
    /// Copy every track of the playlist into the library
    Sync {
        /// Max tracks processed at once
        #[arg(short = 'j', long)]
        max_concurrency: Option<usize>,
        /// Stop after this many seconds, keeping what finished
        #[arg(long)]
        timeout: Option<u64>,
        /// Write a JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
        #[command(flatten)]
        apple: AppleArgs,
        #[command(flatten)]
        yandex: YandexArgs,
    },
    /// Show which settings are configured
    CheckConfig {
        #[command(flatten)]
        apple: AppleArgs,
        #[command(flatten)]
        yandex: YandexArgs,
    },
    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the summary of a saved JSON report
    ShowReport {
        /// Report written by `sync --report`
        path: PathBuf,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Find {
            name,
            no_add,
            apple,
        } => {
            let rt = Runtime::new()?;
            let config = load_config(cli, apple_overrides(apple));
            cmd_find(&rt, &config, name, *no_add)
        }
        Commands::Sync {
            max_concurrency,
            timeout,
            report,
            apple,
            yandex,
        } => {
            let rt = Runtime::new()?;
            let overrides = Overrides {
                max_concurrency: *max_concurrency,
                deadline_secs: *timeout,
                ..merge(apple_overrides(apple), yandex_overrides(yandex))
            };
            let config = load_config(cli, overrides);
            cmd_sync(&rt, &config, report.as_deref())
        }
        Commands::CheckConfig { apple, yandex } => {
            let config = load_config(cli, merge(apple_overrides(apple), yandex_overrides(yandex)));
            cmd_check_config(&config, config_file(cli).as_deref())
        }
        Commands::InitConfig { force } => cmd_init_config(config_file(cli).as_deref(), *force),
        Commands::ShowReport { path } => cmd_show_report(path),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// The config file this invocation uses
fn config_file(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(config::config_path)
}

fn load_config(cli: &Cli, overrides: Overrides) -> Config {
    let file_config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    file_config.with_overrides(overrides)
}

fn apple_overrides(args: &AppleArgs) -> Overrides {
    Overrides {
        apple_auth_token: args.apple_token.clone(),
        apple_media_user_token: args.apple_media_user_token.clone(),
        ..Default::default()
    }
}

fn yandex_overrides(args: &YandexArgs) -> Overrides {
    Overrides {
        yandex_auth_token: args.yandex_token.clone(),
        yandex_user_id: args.yandex_user_id.clone(),
        yandex_playlist_id: args.yandex_playlist_id.clone(),
        ..Default::default()
    }
}

fn merge(apple: Overrides, yandex: Overrides) -> Overrides {
    Overrides {
        yandex_auth_token: yandex.yandex_auth_token,
        yandex_user_id: yandex.yandex_user_id,
        yandex_playlist_id: yandex.yandex_playlist_id,
        ..apple
    }
}
