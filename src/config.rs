//! SDK configuration.
//!
//! Hosts pass the configuration as a JSON blob to `vpnlist_init_with_config`.
//! Every field is optional; omitted fields take the defaults below.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://vpn-api.example.com";

/// Cache TTL in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECONDS: i64 = 3600;

/// HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Base URL of the VPN API, without trailing slash.
    pub api_base_url: String,
    /// Age after which the on-disk server list is considered stale.
    pub cache_ttl_seconds: i64,
    /// Directory for the server list cache. Defaults to the platform's local
    /// data directory.
    pub cache_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            cache_dir: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SdkConfig {
    /// Parse and validate a JSON configuration blob.
    pub fn from_json(raw: &str) -> Result<Self, SdkError> {
        let mut config: SdkConfig = serde_json::from_str(raw)
            .map_err(|e| SdkError::Config(format!("Invalid config JSON: {}", e)))?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SdkError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(SdkError::Config(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        if self.cache_ttl_seconds < 0 {
            return Err(SdkError::Config(
                "cache_ttl_seconds must not be negative".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(SdkError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved cache directory, if one can be determined on this platform.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join("vpnlist")))
    }

    pub fn logicals_url(&self) -> String {
        format!("{}/vpn/logicals", self.api_base_url)
    }
}
