//! Config housekeeping and saved reports.

use std::path::Path;

use crate::config::{self, Config, ConfigError, env_vars};
use crate::sync::report;

/// Show which settings are configured
pub fn cmd_check_config(config: &Config, config_file: Option<&Path>) -> anyhow::Result<()> {
    println!("Checking configuration...\n");

    match config_file {
        Some(path) if path.exists() => println!("✓ Config file: {}", path.display()),
        Some(path) => println!("✗ Config file: {} (not found, using defaults)", path.display()),
        None => println!("✗ Config file: could not determine config directory"),
    }

    println!();
    println!("Credentials:");
    let mut missing = 0;
    for (name, value) in credential_status(config) {
        if value {
            println!("✓ {}: set", name);
        } else {
            println!("✗ {}: not set", name);
            missing += 1;
        }
    }

    println!();
    println!("Sync:");
    println!("  max_concurrency:  {}", config.sync.max_concurrency);
    println!("  request timeout:  {}s", config.request_timeout().as_secs());
    match config.deadline() {
        Some(deadline) => println!("  deadline:         {}s", deadline.as_secs()),
        None => println!("  deadline:         none"),
    }
    println!("  storefront:       {}", config.apple_music.storefront);

    // Surface the remaining validation rules too
    config.max_concurrency()?;
    if missing == 0 {
        config.apple_music(true)?;
        config.yandex_music()?;
        println!("\nReady to sync.");
    }

    Ok(())
}

fn credential_status(config: &Config) -> [(&'static str, bool); 5] {
    let set = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
    [
        (env_vars::APPLE_AUTH_TOKEN, set(&config.apple_music.auth_token)),
        (
            env_vars::APPLE_MEDIA_USER_TOKEN,
            set(&config.apple_music.media_user_token),
        ),
        (env_vars::YANDEX_AUTH_TOKEN, set(&config.yandex_music.auth_token)),
        (env_vars::YANDEX_USER_ID, set(&config.yandex_music.user_id)),
        (env_vars::YANDEX_PLAYLIST_ID, set(&config.yandex_music.playlist_id)),
    ]
}

/// Write a config file with default settings
pub fn cmd_init_config(config_file: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = config_file.ok_or(ConfigError::NoConfigDir)?;
    write_default_config(path, force)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config::save_to(&Config::default(), path)?;
    Ok(())
}

/// Print the summary of a saved JSON report
pub fn cmd_show_report(path: &Path) -> anyhow::Result<()> {
    let saved = report::read_json(path)?;
    print!("{}", report::render_text(&saved));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;

    #[test]
    fn test_credential_status() {
        let config = Config::default().with_overrides(Overrides {
            apple_auth_token: Some("Bearer x".to_string()),
            yandex_user_id: Some("me".to_string()),
            ..Default::default()
        });

        let status = credential_status(&config);

        let set: Vec<_> = status.iter().filter(|(_, v)| *v).map(|(n, _)| *n).collect();
        assert_eq!(set, vec!["APPLE_MUSIC_AUTH_TOKEN", "YANDEX_MUSIC_USER_ID"]);
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sync]\nmax_concurrency = 2\n").unwrap();

        assert!(write_default_config(&path, false).is_err());
        assert_eq!(config::load_from(&path).sync.max_concurrency, 2);

        write_default_config(&path, true).unwrap();
        assert_eq!(config::load_from(&path).sync.max_concurrency, 8);
    }

    #[test]
    fn test_init_config_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("music-export").join("config.toml");

        cmd_init_config(Some(path.as_path()), false).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_show_report_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cmd_show_report(&dir.path().join("missing.json")).is_err());
    }
}
