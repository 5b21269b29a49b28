// Application configuration, loaded from environment variables and CLI flags.

use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite connection string).
    pub database_url: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory containing the CSV data sources. When set, the loader runs
    /// once at startup before the server starts serving.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:dqm.db?mode=rwc`)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `DQM_DATA_DIR` - Path to the CSV data directory (optional)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    /// - `--data <DIR>` - Override the CSV data directory
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:dqm.db?mode=rwc".to_string());

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(&args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(3000);

        let data_dir = Self::parse_cli_value(&args, "--data")
            .map(PathBuf::from)
            .or_else(|| std::env::var("DQM_DATA_DIR").ok().map(PathBuf::from));

        Config {
            database_url,
            port,
            data_dir,
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_value() {
        let args: Vec<String> = ["dqm-api", "--port", "8080", "--data", "csv"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            Config::parse_cli_value(&args, "--port"),
            Some("8080".to_string())
        );
        assert_eq!(
            Config::parse_cli_value(&args, "--data"),
            Some("csv".to_string())
        );
        assert_eq!(Config::parse_cli_value(&args, "--missing"), None);
    }
}
