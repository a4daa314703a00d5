//! Configuration for the replay tool

use std::path::PathBuf;

use clap::Parser;

/// Mirror importer replay
///
/// Reads record items (one JSON document per line), runs them through the
/// importer and prints the resulting transactions and entity transactions.
#[derive(Parser, Debug)]
#[command(name = "mirror-replay")]
#[command(about = "Replay record items through the mirror importer", long_about = None)]
pub struct Config {
    /// NDJSON file of record items, in consensus order
    #[arg(long, env = "MIRROR_REPLAY_INPUT")]
    pub input: PathBuf,

    /// Importer properties file (TOML)
    ///
    /// Environment overrides use the `MIRROR_IMPORTER__` prefix, e.g.
    /// `MIRROR_IMPORTER__PERSIST__TOKENS=false`.
    #[arg(long, env = "MIRROR_REPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, env = "MIRROR_REPLAY_LOG_JSON")]
    pub log_json: bool,

    /// Only print the final summary
    #[arg(long)]
    pub summary_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let config = Config::parse_from([
            "mirror-replay",
            "--input",
            "items.ndjson",
            "--summary-only",
        ]);
        assert_eq!(config.input, PathBuf::from("items.ndjson"));
        assert!(config.summary_only);
        assert!(!config.log_json);
        assert!(config.config.is_none());
    }
}
