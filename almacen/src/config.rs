use crate::common::DEFAULT_MAX_CONCURRENT_REQUESTS;
use crate::errors::{AlmacenError, AlmacenResult, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Service configuration, read from a JSON file.
///
/// ```json
/// {
///     "address": "0.0.0.0:8080",
///     "db_path": "/var/lib/almacen",
///     "max_concurrent_requests": 100
/// }
/// ```
///
/// `address` is required. Without `db_path` the in-memory backend is used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlmacenConfig {
    pub address: String,
    #[serde(default)]
    pub db_path: Option<String>,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

impl AlmacenConfig {
    /// Decodes and validates a configuration from any reader.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::ConfigError`] if the input is not valid JSON,
    /// lacks `address`, or carries an empty `address`, `db_path` or a zero
    /// request limit.
    pub fn from_reader<R: Read>(reader: R) -> AlmacenResult<AlmacenConfig> {
        let config: AlmacenConfig = serde_json::from_reader(reader).map_err(|err| {
            log::error!("Failed to decode configuration: {}", err);
            AlmacenError::new_with_cause(
                "Invalid configuration",
                ErrorKind::ConfigError,
                AlmacenError::from(err),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Returns `true` if a durable backend is configured.
    pub fn is_persistent(&self) -> bool {
        self.db_path.is_some()
    }

    fn validate(&self) -> AlmacenResult<()> {
        if self.address.trim().is_empty() {
            log::error!("Configuration has an empty address");
            return Err(AlmacenError::new(
                "Configuration address must not be empty",
                ErrorKind::ConfigError,
            ));
        }
        if let Some(path) = &self.db_path {
            if path.trim().is_empty() {
                log::error!("Configuration has an empty db_path");
                return Err(AlmacenError::new(
                    "Configuration db_path must not be empty when present",
                    ErrorKind::ConfigError,
                ));
            }
        }
        if self.max_concurrent_requests == 0 {
            log::error!("Configuration allows zero concurrent requests");
            return Err(AlmacenError::new(
                "Configuration max_concurrent_requests must be positive",
                ErrorKind::ConfigError,
            ));
        }
        Ok(())
    }
}

/// Loads the configuration file at `path`.
///
/// # Errors
///
/// Fails with [`ErrorKind::ConfigError`] if the file cannot be opened or its
/// content is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> AlmacenResult<AlmacenConfig> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        log::error!("Failed to open configuration {}: {}", path.display(), err);
        AlmacenError::new_with_cause(
            &format!("Cannot read configuration {}", path.display()),
            ErrorKind::ConfigError,
            AlmacenError::from(err),
        )
    })?;
    AlmacenConfig::from_reader(BufReader::new(file))
}
