// --- File: crates/bienestar_config/src/lib.rs ---
//! Configuration for the Bienestar scheduling service.
//!
//! Values are layered from `config/default`, `config/{RUN_ENV}` and environment
//! variables prefixed with `BIENESTAR` (separator `__`), e.g.
//! `BIENESTAR__SCHEDULING__SLOT_INCREMENT_MINUTES=60`.

use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;
pub use models::*;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "BIENESTAR";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Loads the configuration from `<root>/config` plus the environment.
///
/// The root defaults to the current working directory and can be moved with
/// `BIENESTAR_CONFIG_DIR`.
pub fn load_config() -> Result<AppConfig, ConfigLoadError> {
    ensure_dotenv_loaded();

    let root = env::var("BIENESTAR_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    load_config_from(&root)
}

/// Loads configuration files from the given directory, then applies the environment.
pub fn load_config_from(dir: &Path) -> Result<AppConfig, ConfigLoadError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());

    let default_path = dir.join("default");
    let env_path = dir.join(&run_env);
    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(CONFIG_SEPARATOR));

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    /// Checks cross-field constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let increment = self.scheduling.slot_increment_minutes;
        if increment == 0 || increment > 24 * 60 {
            return Err(ConfigLoadError::Invalid(format!(
                "scheduling.slot_increment_minutes must be between 1 and 1440, got {}",
                increment
            )));
        }
        if chrono_tz::Tz::from_str(&self.scheduling.time_zone).is_err() {
            return Err(ConfigLoadError::Invalid(format!(
                "scheduling.time_zone '{}' is not a known IANA zone",
                self.scheduling.time_zone
            )));
        }
        if self.scheduling.max_range_days == 0 {
            return Err(ConfigLoadError::Invalid(
                "scheduling.max_range_days must be positive".to_string(),
            ));
        }
        if self.use_firestore {
            let firestore = self.firestore.as_ref().ok_or_else(|| {
                ConfigLoadError::Invalid(
                    "use_firestore is set but the [firestore] section is missing".to_string(),
                )
            })?;
            if firestore.project_id.is_none() {
                return Err(ConfigLoadError::Invalid(
                    "firestore.project_id is required when use_firestore is set".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Parsed scheduling time zone. Falls back to UTC for a config that skipped validation.
    pub fn time_zone(&self) -> chrono_tz::Tz {
        chrono_tz::Tz::from_str(&self.scheduling.time_zone).unwrap_or_else(|_| {
            warn!(
                "Unknown time zone '{}', falling back to UTC",
                self.scheduling.time_zone
            );
            chrono_tz::UTC
        })
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// `DOTENV_OVERRIDE` selects a different file; otherwise the first command line
/// argument is used when it starts with `.env`, falling back to `.env`.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheduling.slot_increment_minutes, 30);
        assert_eq!(config.time_zone(), chrono_tz::UTC);
    }

    #[test]
    fn test_zero_increment_is_rejected() {
        let mut config = AppConfig::default();
        config.scheduling.slot_increment_minutes = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_time_zone_is_rejected() {
        let mut config = AppConfig::default();
        config.scheduling.time_zone = "Mars/Olympus_Mons".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_firestore_flag_requires_section() {
        let mut config = AppConfig::default();
        config.use_firestore = true;
        assert!(config.validate().is_err());

        config.firestore = Some(FirestoreConfig {
            project_id: Some("bienestar-test".to_string()),
            ..Default::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 9090

[scheduling]
slot_increment_minutes = 60
time_zone = "America/Bogota"
"#,
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.scheduling.slot_increment_minutes, 60);
        assert_eq!(config.scheduling.max_range_days, 31);
        assert_eq!(config.time_zone(), chrono_tz::America::Bogota);
        assert!(!config.use_firestore);
    }
}
