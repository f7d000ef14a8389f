//! Runtime configuration.
//!
//! Layers, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. TOML file given with `--config`
//! 3. `PW_*` environment variables
//! 4. Command-line flags
//!
//! ## File Format
//!
//! ```toml
//! validators = "validators.toml"
//!
//! [sync]
//! api_url = "https://rpc.example.org"
//! target_producer = "A1B2C3D4E5F60718293A4B5C6D7E8F9001122334"
//! poll_interval_ms = 6000
//! ```

use anyhow::{Context, Result};
use pw_02_block_sync::SyncConfig;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use crate::cli::Args;

/// Contents of the `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Validator directory path.
    pub validators: Option<PathBuf>,
    /// Sync settings.
    pub sync: SyncConfig,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeConfig {
    /// Sync settings.
    pub sync: SyncConfig,
    /// Validator directory path, if any.
    pub validators: Option<PathBuf>,
}

/// Resolve the configuration from every layer and validate it.
///
/// `env` looks up one environment variable; pass `|k| std::env::var(k).ok()`.
pub fn load_config<F>(args: &Args, env: F) -> Result<RuntimeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let file: FileConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            RuntimeConfig {
                sync: file.sync,
                validators: file.validators,
            }
        }
        None => RuntimeConfig::default(),
    };

    apply_env(&mut config, &env);
    apply_args(&mut config, args);

    config.sync.validate().context("Invalid configuration")?;
    Ok(config)
}

fn apply_env<F>(config: &mut RuntimeConfig, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let sync = &mut config.sync;

    if let Some(url) = env("PW_API_URL") {
        sync.api_url = url;
    }
    if let Some(target) = env("PW_TARGET_PRODUCER") {
        sync.target_producer = Some(target);
    }
    if let Some(prefix) = env("PW_ADDRESS_PREFIX") {
        sync.address_prefix = prefix;
    }
    if let Some(path) = env("PW_VALIDATORS") {
        config.validators = Some(PathBuf::from(path));
    }
    if let Some(ms) = parse_env(env, "PW_POLL_INTERVAL_MS") {
        sync.poll_interval_ms = ms;
    }
    if let Some(gap) = parse_env(env, "PW_MAX_BACKFILL_GAP") {
        sync.max_backfill_gap = gap;
    }
    if let Some(window) = parse_env(env, "PW_WINDOW") {
        sync.window_capacity = window;
    }
}

fn parse_env<F, T>(env: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}

fn apply_args(config: &mut RuntimeConfig, args: &Args) {
    let sync = &mut config.sync;

    if let Some(url) = &args.api_url {
        sync.api_url = url.clone();
    }
    if let Some(target) = &args.target {
        sync.target_producer = Some(target.clone());
    }
    if let Some(prefix) = &args.prefix {
        sync.address_prefix = prefix.clone();
    }
    if let Some(ms) = args.poll_interval_ms {
        sync.poll_interval_ms = ms;
    }
    if let Some(gap) = args.max_backfill_gap {
        sync.max_backfill_gap = gap;
    }
    if let Some(window) = args.window {
        sync.window_capacity = window;
    }
    if let Some(path) = &args.validators {
        config.validators = Some(path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = load_config(&Args::default(), no_env).unwrap();
        assert_eq!(config.sync, SyncConfig::default());
        assert!(config.validators.is_none());
    }

    #[test]
    fn test_layer_precedence() {
        let file = config_file(
            r#"
validators = "from-file.toml"

[sync]
api_url = "http://file"
poll_interval_ms = 1000
window_capacity = 30
"#,
        );
        let args = Args {
            config: Some(file.path().to_path_buf()),
            window: Some(40),
            ..Args::default()
        };
        let env = env_of(&[
            ("PW_API_URL", "http://env"),
            ("PW_WINDOW", "35"),
            ("PW_TARGET_PRODUCER", "ABCDEF"),
        ]);

        let config = load_config(&args, env).unwrap();
        assert_eq!(config.sync.api_url, "http://env");
        assert_eq!(config.sync.poll_interval_ms, 1000);
        assert_eq!(config.sync.window_capacity, 40);
        assert_eq!(config.sync.target_producer.as_deref(), Some("ABCDEF"));
        assert_eq!(config.sync.max_backfill_gap, 20);
        assert_eq!(config.validators, Some(PathBuf::from("from-file.toml")));
    }

    #[test]
    fn test_bad_env_number_ignored() {
        let env = env_of(&[("PW_POLL_INTERVAL_MS", "soon")]);
        let config = load_config(&Args::default(), env).unwrap();
        assert_eq!(config.sync.poll_interval_ms, 6000);
    }

    #[test]
    fn test_invalid_result_rejected() {
        let args = Args {
            window: Some(0),
            ..Args::default()
        };
        assert!(load_config(&args, no_env).is_err());
    }

    #[test]
    fn test_missing_and_malformed_file() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/proposer-watch.toml")),
            ..Args::default()
        };
        assert!(load_config(&args, no_env).is_err());

        let file = config_file("[sync]\nunknown_key = 1\n[other]\n");
        let args = Args {
            config: Some(file.path().to_path_buf()),
            ..Args::default()
        };
        assert!(load_config(&args, no_env).is_err());
    }

    #[test]
    fn test_mistyped_sync_key_rejected() {
        let file = config_file("[sync]\npoll_interval = 1000\n");
        let args = Args {
            config: Some(file.path().to_path_buf()),
            ..Args::default()
        };
        let err = load_config(&args, no_env).unwrap_err();
        assert!(format!("{err:#}").contains("poll_interval"));
    }
}
