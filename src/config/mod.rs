use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use serde::Deserialize;

/// Command line flags. Anything given here wins over the environment.
#[derive(Debug, Default, Parser)]
#[command(name = "bizdesk", version, about = "Manage clients, projects and invoices")]
pub struct Cli {
    /// Path of the SQLite database file
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// File that receives diagnostic logs
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Create missing tables and exit
    #[arg(long)]
    pub init_only: bool,
}

/// Configuration for the application
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Database file, `DATABASE_PATH`
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Log destination, `LOG_FILE`
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("app.db")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("bizdesk.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if one exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Replace values given on the command line
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.database {
            self.database_path = path.clone();
        }
        if let Some(path) = &cli.log_file {
            self.log_file = path.clone();
        }
        self
    }
}

/// Load the environment and apply command line overrides
pub fn init(cli: &Cli) -> Result<Config> {
    let config = Config::load()?.with_cli(cli);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_unset() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database_path, PathBuf::from("app.db"));
    }

    #[test]
    fn reads_environment_names() {
        let config: Config = envy::from_iter(vars(&[
            ("DATABASE_PATH", "/var/lib/bizdesk/data.db"),
            ("LOG_FILE", "/tmp/bizdesk.log"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/bizdesk/data.db"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/bizdesk.log"));
    }

    #[test]
    fn cli_overrides_environment() {
        let cli = Cli::parse_from(["bizdesk", "--database", "other.db"]);
        let config = Config::default().with_cli(&cli);
        assert_eq!(config.database_path, PathBuf::from("other.db"));
        assert_eq!(config.log_file, PathBuf::from("bizdesk.log"));
        assert!(!cli.init_only);
    }
}
