//! Command-line flags.

use clap::Parser;
use std::path::PathBuf;

/// Follow a chain node and report block producer share
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "proposer-watch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Chain API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Validator directory file (TOML)
    #[arg(long)]
    pub validators: Option<PathBuf>,

    /// Producer token whose share is tracked
    #[arg(long)]
    pub target: Option<String>,

    /// Poll period in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Largest gap closed by backfill
    #[arg(long)]
    pub max_backfill_gap: Option<u64>,

    /// Number of recent blocks kept
    #[arg(long)]
    pub window: Option<usize>,

    /// Prefix for rendered producer addresses
    #[arg(long)]
    pub prefix: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "proposer-watch",
            "--api-url",
            "https://rest.example.org",
            "--target",
            "ABCDEF",
            "--window",
            "20",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(args.api_url.as_deref(), Some("https://rest.example.org"));
        assert_eq!(args.target.as_deref(), Some("ABCDEF"));
        assert_eq!(args.window, Some(20));
        assert!(args.json_logs);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(Args::try_parse_from(["proposer-watch", "--window", "many"]).is_err());
    }
}
