//! Static configuration loaded once at startup.
//! These settings affect server binding or external endpoints and require a
//! restart to change.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Static configuration loaded from `config.*` and `DEPOT`-prefixed
/// environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageConfig,

    #[serde(default = "default_object_store")]
    pub object_store: ObjectStoreConfig,

    #[serde(default = "default_limits")]
    pub limits: LimitsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Local storage configuration (metadata database location)
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// S3-compatible object store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreConfig {
    /// Endpoint URL, e.g. `http://minio:9000`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default)]
    pub access_key: String,

    #[serde(default)]
    pub secret_key: String,

    /// Region is required by the SDK even though MinIO ignores it
    #[serde(default = "default_region")]
    pub region: String,

    /// Startup bootstrap: attempts before giving up on the bucket check
    #[serde(default = "default_bootstrap_retries")]
    pub bootstrap_retries: u32,

    /// Startup bootstrap: fixed delay between attempts, in seconds
    #[serde(default = "default_bootstrap_delay_secs")]
    pub bootstrap_delay_secs: u64,
}

impl ObjectStoreConfig {
    pub fn bootstrap_delay(&self) -> Duration {
        Duration::from_secs(self.bootstrap_delay_secs)
    }
}

/// Request limits
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted upload size in bytes. The declared Content-Length is
    /// checked against this, and the request body limit is set to the same
    /// value so the body actually read can never exceed it.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl LimitsConfig {
    /// Upload limit in MiB, for error messages
    pub fn max_upload_mib(&self) -> f64 {
        self.max_upload_bytes as f64 / (1024.0 * 1024.0)
    }
}

// ==================== Default Value Functions ====================

pub(crate) fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_storage() -> StorageConfig {
    StorageConfig {
        data_dir: default_data_dir(),
    }
}

pub(crate) fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

pub(crate) fn default_object_store() -> ObjectStoreConfig {
    ObjectStoreConfig {
        endpoint: default_endpoint(),
        bucket: default_bucket(),
        access_key: String::new(),
        secret_key: String::new(),
        region: default_region(),
        bootstrap_retries: default_bootstrap_retries(),
        bootstrap_delay_secs: default_bootstrap_delay_secs(),
    }
}

pub(crate) fn default_endpoint() -> String {
    "http://minio:9000".to_string()
}

pub(crate) fn default_bucket() -> String {
    "documents".to_string()
}

pub(crate) fn default_region() -> String {
    "us-east-1".to_string()
}

pub(crate) fn default_bootstrap_retries() -> u32 {
    5
}

pub(crate) fn default_bootstrap_delay_secs() -> u64 {
    2
}

pub(crate) fn default_limits() -> LimitsConfig {
    LimitsConfig {
        max_upload_bytes: default_max_upload_bytes(),
    }
}

pub(crate) fn default_max_upload_bytes() -> u64 {
    25 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_input() {
        let config: StaticConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.object_store.bucket, "documents");
        assert_eq!(config.object_store.bootstrap_retries, 5);
        assert_eq!(config.limits.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn test_partial_sections_fill_in() {
        let config: StaticConfig = serde_json::from_str(
            r#"{"object_store": {"endpoint": "http://localhost:9000", "access_key": "minioadmin", "secret_key": "minioadmin"}}"#,
        )
        .unwrap();
        assert_eq!(config.object_store.endpoint, "http://localhost:9000");
        assert_eq!(config.object_store.access_key, "minioadmin");
        // Unspecified fields still take defaults
        assert_eq!(config.object_store.bucket, "documents");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_max_upload_mib_formatting() {
        let limits = LimitsConfig {
            max_upload_bytes: 25 * 1024 * 1024,
        };
        assert_eq!(format!("{:.1}", limits.max_upload_mib()), "25.0");
    }
}
