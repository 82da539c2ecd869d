//! Server list loading
//!
//! Fetches the logical server list from the VPN API and keeps a copy on disk.
//! When the API is unreachable the SDK falls back to the cached copy, even if
//! it is stale.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SdkConfig;
use crate::error::SdkError;
use crate::logging::LogCategory;
use crate::models::Server;

const CACHE_FILE_NAME: &str = "servers.json";

/// API response structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerListResponse {
    #[serde(rename = "LogicalServers", default)]
    pub logical_servers: Vec<Server>,
}

impl ServerListResponse {
    pub fn from_json(raw: &str) -> Result<Self, SdkError> {
        serde_json::from_str(raw)
            .map_err(|e| SdkError::Parse(format!("Invalid server list JSON: {}", e)))
    }
}

/// Cached server list with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedServerList {
    pub data: ServerListResponse,
    pub cached_at: DateTime<Utc>,
}

impl CachedServerList {
    /// Check if the cache is younger than `ttl_seconds`
    pub fn is_fresh(&self, ttl_seconds: i64) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age.num_seconds() < ttl_seconds
    }
}

/// Source of the server list data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerListSource {
    /// Nothing loaded yet
    Loading,
    /// Fetched from API
    Api,
    /// Loaded from fresh local cache
    Cache,
    /// Loaded from stale cache (API failed)
    StaleCache,
    /// Handed to the SDK directly by the host application
    Provided,
}

impl std::fmt::Display for ServerListSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerListSource::Loading => write!(f, "Loading..."),
            ServerListSource::Api => write!(f, "API"),
            ServerListSource::Cache => write!(f, "Cache"),
            ServerListSource::StaleCache => write!(f, "Stale Cache"),
            ServerListSource::Provided => write!(f, "Provided"),
        }
    }
}

fn cache_path(config: &SdkConfig) -> Option<PathBuf> {
    config.cache_dir().map(|d| d.join(CACHE_FILE_NAME))
}

fn read_cache_file(path: &Path) -> Option<CachedServerList> {
    if !path.exists() {
        log::debug!(
            target: LogCategory::Api.target(),
            "Server cache file does not exist: {:?}",
            path
        );
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<CachedServerList>(&content) {
            Ok(cached) => {
                log::info!(
                    target: LogCategory::Api.target(),
                    "Loaded server cache from {:?}, age: {} seconds",
                    path,
                    Utc::now()
                        .signed_duration_since(cached.cached_at)
                        .num_seconds()
                );
                Some(cached)
            }
            Err(e) => {
                log::warn!(
                    target: LogCategory::Api.target(),
                    "Failed to parse server cache: {}",
                    e
                );
                None
            }
        },
        Err(e) => {
            log::warn!(
                target: LogCategory::Api.target(),
                "Failed to read server cache file: {}",
                e
            );
            None
        }
    }
}

/// Load cached server list from disk
pub fn load_cached_servers(config: &SdkConfig) -> Option<CachedServerList> {
    read_cache_file(&cache_path(config)?)
}

/// Save server list to disk cache
pub fn save_servers_to_cache(config: &SdkConfig, data: &ServerListResponse) -> Result<(), SdkError> {
    let cached = CachedServerList {
        data: data.clone(),
        cached_at: Utc::now(),
    };
    write_cache(config, &cached)
}

fn write_cache(config: &SdkConfig, cached: &CachedServerList) -> Result<(), SdkError> {
    let path = cache_path(config)
        .ok_or_else(|| SdkError::Storage("Could not determine cache directory".to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| SdkError::Storage(format!("Failed to create {:?}: {}", parent, e)))?;
    }

    let content = serde_json::to_string_pretty(cached)?;
    std::fs::write(&path, content)
        .map_err(|e| SdkError::Storage(format!("Failed to write {:?}: {}", path, e)))?;
    log::info!(target: LogCategory::Api.target(), "Saved server list to cache: {:?}", path);

    Ok(())
}

/// Fetch server list from API
pub async fn fetch_server_list(config: &SdkConfig) -> Result<ServerListResponse, SdkError> {
    let url = config.logicals_url();
    log::info!(target: LogCategory::Api.target(), "Fetching server list from API: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| SdkError::Network(format!("Failed to create HTTP client: {}", e)))?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| SdkError::Network(format!("Failed to fetch server list: {}", e)))?;

    if !response.status().is_success() {
        return Err(SdkError::Network(format!(
            "API returned error status: {}",
            response.status()
        )));
    }

    let data: ServerListResponse = response
        .json()
        .await
        .map_err(|e| SdkError::Parse(format!("Failed to parse server list JSON: {}", e)))?;

    log::info!(
        target: LogCategory::Api.target(),
        "Fetched {} logical servers from API",
        data.logical_servers.len()
    );

    if let Err(e) = save_servers_to_cache(config, &data) {
        log::warn!(target: LogCategory::Api.target(), "Failed to save server list to cache: {}", e);
    }

    Ok(data)
}

/// Load server list from API or cache.
///
/// Strategy:
/// 1. Try to load fresh cache
/// 2. If cache is stale or missing, fetch from API
/// 3. If API fails and cache exists (even stale), use cache
/// 4. If all else fails, return Error
pub async fn load_server_list(
    config: &SdkConfig,
) -> Result<(Vec<Server>, ServerListSource), SdkError> {
    if let Some(cached) = load_cached_servers(config) {
        if cached.is_fresh(config.cache_ttl_seconds) {
            log::info!(target: LogCategory::Api.target(), "Using fresh cached server list");
            return Ok((cached.data.logical_servers, ServerListSource::Cache));
        }

        log::info!(
            target: LogCategory::Api.target(),
            "Cache is stale, attempting to refresh from API"
        );
        return match fetch_server_list(config).await {
            Ok(data) => Ok((data.logical_servers, ServerListSource::Api)),
            Err(e) => {
                log::warn!(
                    target: LogCategory::Api.target(),
                    "Failed to fetch from API, using stale cache: {}",
                    e
                );
                Ok((cached.data.logical_servers, ServerListSource::StaleCache))
            }
        };
    }

    log::info!(target: LogCategory::Api.target(), "No cache found, fetching from API");
    match fetch_server_list(config).await {
        Ok(data) => Ok((data.logical_servers, ServerListSource::Api)),
        Err(e) => Err(SdkError::Network(format!(
            "Could not load server list: {}. Please check your internet connection.",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::server;
    use crate::models::ServerTier;

    fn config_in(dir: &Path) -> SdkConfig {
        SdkConfig {
            // Nothing listens on the discard port, so API calls fail fast.
            api_base_url: "http://127.0.0.1:9".to_string(),
            cache_dir: Some(dir.to_path_buf()),
            request_timeout_secs: 2,
            ..SdkConfig::default()
        }
    }

    fn sample() -> ServerListResponse {
        ServerListResponse {
            logical_servers: vec![
                server("SE#1", "SE", ServerTier::Free, 1.0),
                server("SE#2", "SE", ServerTier::Plus, 2.0),
            ],
        }
    }

    #[test]
    fn cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(load_cached_servers(&config).is_none());

        save_servers_to_cache(&config, &sample()).unwrap();
        let cached = load_cached_servers(&config).expect("cache written");
        assert_eq!(cached.data.logical_servers, sample().logical_servers);
        assert!(cached.is_fresh(60));
        assert!(!cached.is_fresh(0));
    }

    #[test]
    fn corrupt_cache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(dir.path().join(CACHE_FILE_NAME), "not json").unwrap();
        assert!(load_cached_servers(&config).is_none());
    }

    #[tokio::test]
    async fn fresh_cache_skips_the_api() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        save_servers_to_cache(&config, &sample()).unwrap();

        let (servers, source) = load_server_list(&config).await.unwrap();
        assert_eq!(source, ServerListSource::Cache);
        assert_eq!(servers.len(), 2);
    }

    #[tokio::test]
    async fn stale_cache_is_used_when_api_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let stale = CachedServerList {
            data: sample(),
            cached_at: Utc::now() - chrono::Duration::hours(5),
        };
        write_cache(&config, &stale).unwrap();

        let (servers, source) = load_server_list(&config).await.unwrap();
        assert_eq!(source, ServerListSource::StaleCache);
        assert_eq!(servers[0].server_name, "SE#1");
    }

    #[tokio::test]
    async fn no_cache_and_no_api_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let err = load_server_list(&config).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ERROR_NETWORK);
    }

    #[test]
    fn parses_logical_servers_payload() {
        let parsed = ServerListResponse::from_json(
            r#"{"LogicalServers":[{"ID":"1","Name":"US-NY#1","EntryCountry":"US",
                "ExitCountry":"US","Tier":2,"Score":3.5,"City":"New York"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.logical_servers[0].tier, ServerTier::Plus);
        assert!(ServerListResponse::from_json("{\"LogicalServers\":5}").is_err());
    }
}
