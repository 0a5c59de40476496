//! Process configuration
//!
//! Business settings (company, paper, printers) live in the database. This
//! is only what the process needs before it can open the database.

use std::path::PathBuf;
use std::time::Duration;

/// Database file name inside the data directory
pub const DB_FILE: &str = "comptoir.redb";

/// Process configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | COMPTOIR_DATA_DIR | ./data | database location |
/// | COMPTOIR_EXPORT_DIR | ./receipts | PDF export directory |
/// | LOG_LEVEL | info | log filter |
/// | LOG_DIR | (unset) | daily rolling log files when set |
/// | LOG_JSON | false | JSON log lines |
/// | PRINT_TIMEOUT_SECS | 10 | printer and spooler timeout |
///
/// A `.env` file in the working directory is loaded first.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub log_json: bool,
    pub print_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            data_dir: std::env::var("COMPTOIR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            export_dir: std::env::var("COMPTOIR_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("receipts")),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR")
                .ok()
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            print_timeout_secs: std::env::var("PRINT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(10),
        }
    }

    /// Use a single directory for data and exports
    ///
    /// Used by tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join("data"),
            export_dir: root.join("receipts"),
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            print_timeout_secs: 10,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn print_timeout(&self) -> Duration {
        Duration::from_secs(self.print_timeout_secs)
    }

    /// Create the data and export directories
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.export_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
