/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/commerce | Working directory (database, logs) |
/// | LOG_LEVEL | info | Tracing filter level |
/// | LOG_DIR | (none) | Optional directory for rolling log files |
/// | ENVIRONMENT | development | development / staging / production |
/// | RETURN_WINDOW_DAYS | 7 | Calendar days after delivery a return is accepted |
/// | MAX_ID_ATTEMPTS | 16 | Identifier collision retries before giving up |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/commerce LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and log files
    pub work_dir: String,
    /// Tracing filter level
    pub log_level: String,
    /// Optional log file directory (daily rolling)
    pub log_dir: Option<String>,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Return window in calendar days after delivery
    pub return_window_days: i64,
    /// Identifier generation retries before DuplicateIdentifier
    pub max_id_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/commerce".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            return_window_days: std::env::var("RETURN_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            max_id_attempts: std::env::var("MAX_ID_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16),
        }
    }

    /// Path of the embedded database file
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("commerce.redb")
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/commerce".into(),
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
            return_window_days: 7,
            max_id_attempts: 16,
        }
    }
}
