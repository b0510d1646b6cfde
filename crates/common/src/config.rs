//! Application configuration.

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Media and database storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Admin access configuration.
    pub admin: AdminConfig,
    /// Feed behaviour.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging output.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Secret used to sign session cookies.
    pub secret: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the database file and the uploads directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Maximum accepted request body size for uploads.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Admin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Shared PIN granting member management.
    pub pin: String,
}

/// Feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// IANA time zone used to decide what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// How many trailing days the calendar highlights.
    #[serde(default = "default_calendar_days")]
    pub calendar_days: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human readable ones.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8888
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// 16MB.
const fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_timezone() -> String {
    "UTC".to_string()
}

const fn default_calendar_days() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            calendar_days: default_calendar_days(),
        }
    }
}

impl FeedConfig {
    /// Parse the configured time zone.
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("invalid feed.timezone: {e}")))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("FAMFEED")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `FAMFEED_ENV`)
    /// 4. Environment variables such as `FAMFEED_ADMIN__PIN` (`__` separates
    ///    the section from the key)
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let env = std::env::var("FAMFEED_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(environment())
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::from_sources(path.as_ref(), environment())
    }

    fn from_sources(path: &Path, env: config::Environment) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(env)
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.secret.trim().is_empty() {
            return Err(AppError::Config("server.secret must not be empty".to_string()));
        }
        if self.admin.pin.trim().is_empty() {
            return Err(AppError::Config("admin.pin must not be empty".to_string()));
        }
        self.feed.tz()?;
        Ok(())
    }

    /// Path of the SQLite database file inside a data directory.
    #[must_use]
    pub fn database_path(data_dir: &Path) -> PathBuf {
        data_dir.join("famfeed.db")
    }

    /// Path of the uploads directory inside a data directory.
    #[must_use]
    pub fn uploads_path(data_dir: &Path) -> PathBuf {
        data_dir.join("uploads")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_file_applies_defaults() {
        let file = write_config(
            r#"
[server]
secret = "family-secret"

[admin]
pin = "1234"
"#,
        );

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8888);
        assert_eq!(config.storage.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.feed.calendar_days, 30);
        assert_eq!(config.feed.tz().unwrap(), chrono_tz::UTC);
        assert!(!config.log.json);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_config(
            r#"
[server]
port = 8888
secret = "family-secret"

[admin]
pin = "1234"
"#,
        );
        let vars: config::Map<String, String> = [
            ("FAMFEED_ADMIN__PIN", "9999"),
            ("FAMFEED_SERVER__PORT", "9000"),
            ("FAMFEED_SERVER__SECRET", "from-env"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_sources(file.path(), environment().source(Some(vars))).unwrap();
        assert_eq!(config.admin.pin, "9999");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.secret, "from-env");
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let file = write_config(
            r#"
[server]
secret = "family-secret"

[admin]
pin = "1234"

[feed]
timezone = "Mars/Olympus"
"#,
        );

        assert!(matches!(
            Config::from_file(file.path()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_empty_pin_is_rejected() {
        let file = write_config(
            r#"
[server]
secret = "family-secret"

[admin]
pin = "  "
"#,
        );

        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_data_paths() {
        let dir = Path::new("/var/lib/famfeed");
        assert_eq!(
            Config::database_path(dir),
            PathBuf::from("/var/lib/famfeed/famfeed.db")
        );
        assert_eq!(
            Config::uploads_path(dir),
            PathBuf::from("/var/lib/famfeed/uploads")
        );
    }
}
