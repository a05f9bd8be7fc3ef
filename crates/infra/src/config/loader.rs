//! Configuration loader
//!
//! Loads adapter configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment when present
//! 2. If any `IAS_ADAPTER_*` variable is set, configuration comes from the
//!    environment (unset variables keep their defaults)
//! 3. Otherwise searches multiple paths for config files (JSON or TOML)
//! 4. Without any file the defaults are used
//!
//! ## Environment Variables
//! - `IAS_ADAPTER_PORT`: Listen port
//! - `IAS_ADAPTER_DATABASE_URL`: Postgres connection string
//! - `IAS_ADAPTER_DATABASE_POOL_SIZE`: Maximum pooled Postgres connections
//! - `IAS_ADAPTER_IAS_TIMEOUT_SECS`: IAS request timeout
//! - `IAS_ADAPTER_IAS_CERT_PATH`: PEM client certificate for IAS
//! - `IAS_ADAPTER_IAS_KEY_PATH`: PEM private key for IAS
//! - `IAS_ADAPTER_UCL_TIMEOUT_SECS`: Status callback timeout
//! - `IAS_ADAPTER_PROCESSING_TIMEOUT_SECS`: Per-notification processing timeout
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./config.{json,toml}` and `./ias-adapter.{json,toml}`
//! 2. The same names in the parent directory
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ias_adapter_domain::{Config, IasAdapterError, Result};

const PORT: &str = "IAS_ADAPTER_PORT";
const DATABASE_URL: &str = "IAS_ADAPTER_DATABASE_URL";
const DATABASE_POOL_SIZE: &str = "IAS_ADAPTER_DATABASE_POOL_SIZE";
const IAS_TIMEOUT_SECS: &str = "IAS_ADAPTER_IAS_TIMEOUT_SECS";
const IAS_CERT_PATH: &str = "IAS_ADAPTER_IAS_CERT_PATH";
const IAS_KEY_PATH: &str = "IAS_ADAPTER_IAS_KEY_PATH";
const UCL_TIMEOUT_SECS: &str = "IAS_ADAPTER_UCL_TIMEOUT_SECS";
const PROCESSING_TIMEOUT_SECS: &str = "IAS_ADAPTER_PROCESSING_TIMEOUT_SECS";

/// Every variable [`load_from_env`] understands.
pub const ENV_VARS: [&str; 8] = [
    PORT,
    DATABASE_URL,
    DATABASE_POOL_SIZE,
    IAS_TIMEOUT_SECS,
    IAS_CERT_PATH,
    IAS_KEY_PATH,
    UCL_TIMEOUT_SECS,
    PROCESSING_TIMEOUT_SECS,
];

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "ias-adapter.json", "ias-adapter.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `IasAdapterError::Config` if a present source is invalid.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }

    if env_configured() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }
    tracing::debug!("No configuration in environment, trying file");

    match search_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// At least one `IAS_ADAPTER_*` variable must be set; the rest fall back to
/// their defaults.
///
/// # Errors
/// Returns `IasAdapterError::Config` if no variable is set or a value is
/// invalid.
pub fn load_from_env() -> Result<Config> {
    if !env_configured() {
        return Err(IasAdapterError::Config(
            "No IAS_ADAPTER_* environment variables set".to_string(),
        ));
    }

    let mut config = Config::default();

    if let Some(port) = env_parse(PORT)? {
        config.server.port = port;
    }
    config.database.url = env_string(DATABASE_URL);
    if let Some(pool_size) = env_parse(DATABASE_POOL_SIZE)? {
        config.database.pool_size = pool_size;
    }
    if let Some(timeout) = env_parse(IAS_TIMEOUT_SECS)? {
        config.ias.timeout_secs = timeout;
    }
    config.ias.cert_path = env_string(IAS_CERT_PATH);
    config.ias.key_path = env_string(IAS_KEY_PATH);
    if let Some(timeout) = env_parse(UCL_TIMEOUT_SECS)? {
        config.ucl.timeout_secs = timeout;
    }
    if let Some(timeout) = env_parse(PROCESSING_TIMEOUT_SECS)? {
        config.processing.timeout_secs = timeout;
    }

    Ok(config)
}

/// Whether any `IAS_ADAPTER_*` variable is set.
fn env_configured() -> bool {
    ENV_VARS.iter().any(|key| std::env::var_os(key).is_some())
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `IasAdapterError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(IasAdapterError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => search_config_paths().ok_or_else(|| {
            IasAdapterError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| IasAdapterError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| IasAdapterError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IasAdapterError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(IasAdapterError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn search_config_paths() -> Option<PathBuf> {
    let mut directories = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        directories.push(cwd.clone());
        directories.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            directories.push(exe_dir.to_path_buf());
        }
    }

    directories
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Non-empty value of an environment variable.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable.
///
/// # Errors
/// Returns `IasAdapterError::Config` if the variable is set but invalid.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| {
                IasAdapterError::Config(format!("Invalid value for {key}: {e}"))
            })
        })
        .transpose()
}
