//! Configuration structures
//!
//! Loaded by `ias_adapter_infra::config`. Every section has defaults so a
//! partial file is enough.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DATABASE_POOL_SIZE, DEFAULT_IAS_TIMEOUT_SECS, DEFAULT_PORT,
    DEFAULT_PROCESSING_TIMEOUT_SECS, DEFAULT_UCL_TIMEOUT_SECS,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ias: IasConfig,
    #[serde(default)]
    pub ucl: UclConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// Ledger storage. Without a URL the in-memory ledger is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Maximum number of pooled Postgres connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: None, pool_size: DEFAULT_DATABASE_POOL_SIZE }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IasConfig {
    #[serde(default = "default_ias_timeout")]
    pub timeout_secs: u64,
    /// PEM client certificate presented to IAS.
    #[serde(default)]
    pub cert_path: Option<String>,
    /// PEM private key matching `cert_path`.
    #[serde(default)]
    pub key_path: Option<String>,
}

impl Default for IasConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_IAS_TIMEOUT_SECS, cert_path: None, key_path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UclConfig {
    #[serde(default = "default_ucl_timeout")]
    pub timeout_secs: u64,
}

impl Default for UclConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_UCL_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Upper bound for handling one notification, IAS and storage calls included.
    #[serde(default = "default_processing_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_PROCESSING_TIMEOUT_SECS }
    }
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_pool_size() -> usize {
    DEFAULT_DATABASE_POOL_SIZE
}

const fn default_ias_timeout() -> u64 {
    DEFAULT_IAS_TIMEOUT_SECS
}

const fn default_ucl_timeout() -> u64 {
    DEFAULT_UCL_TIMEOUT_SECS
}

const fn default_processing_timeout() -> u64 {
    DEFAULT_PROCESSING_TIMEOUT_SECS
}
