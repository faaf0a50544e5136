//! CRM configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target a local single-node setup.
//!
//! - `CRM_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://copperline.db?mode=rwc`)
//! - `CRM_REPORT_LOG` - weekly report log path
//!   (default: `/tmp/crm_report_log.txt`)
//! - `CRM_CLEANUP_LOG` - customer cleanup log path
//!   (default: `/tmp/customer_cleanup_log.txt`)
//! - `CRM_HEARTBEAT_LOG` - heartbeat log path
//!   (default: `/tmp/crm_heartbeat_log.txt`)
//! - `CRM_LOW_STOCK_LOG` - low-stock restock log path
//!   (default: `/tmp/low_stock_updates_log.txt`)
//! - `CRM_REMINDERS_LOG` - order reminders log path
//!   (default: `/tmp/order_reminders_log.txt`)

use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://copperline.db?mode=rwc";
const DEFAULT_REPORT_LOG: &str = "/tmp/crm_report_log.txt";
const DEFAULT_CLEANUP_LOG: &str = "/tmp/customer_cleanup_log.txt";
const DEFAULT_HEARTBEAT_LOG: &str = "/tmp/crm_heartbeat_log.txt";
const DEFAULT_LOW_STOCK_LOG: &str = "/tmp/low_stock_updates_log.txt";
const DEFAULT_REMINDERS_LOG: &str = "/tmp/order_reminders_log.txt";

/// Failure modes when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CRM application configuration.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    /// `SQLite` database connection URL
    pub database_url: String,
    /// Weekly report log sink path
    pub report_log: PathBuf,
    /// Customer cleanup log sink path
    pub cleanup_log: PathBuf,
    /// Heartbeat log sink path
    pub heartbeat_log: PathBuf,
    /// Low-stock restock log sink path
    pub low_stock_log: PathBuf,
    /// Order reminders log sink path
    pub reminders_log: PathBuf,
}

impl CrmConfig {
    /// Read configuration from the environment, after sourcing a `.env`
    /// file when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value
    /// (currently: set but empty).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: get_nonempty_or_default("CRM_DATABASE_URL", DEFAULT_DATABASE_URL)?,
            report_log: get_path_or_default("CRM_REPORT_LOG", DEFAULT_REPORT_LOG)?,
            cleanup_log: get_path_or_default("CRM_CLEANUP_LOG", DEFAULT_CLEANUP_LOG)?,
            heartbeat_log: get_path_or_default("CRM_HEARTBEAT_LOG", DEFAULT_HEARTBEAT_LOG)?,
            low_stock_log: get_path_or_default("CRM_LOW_STOCK_LOG", DEFAULT_LOW_STOCK_LOG)?,
            reminders_log: get_path_or_default("CRM_REMINDERS_LOG", DEFAULT_REMINDERS_LOG)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default, rejecting set-but-empty values.
fn get_nonempty_or_default(key: &str, default: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}

/// Get a path-valued environment variable with a default.
fn get_path_or_default(key: &str, default: &str) -> Result<PathBuf, ConfigError> {
    get_nonempty_or_default(key, default).map(PathBuf::from)
}
