use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::network::Network;
use crate::registry::{Registry, RegistryEntry};

pub const DEFAULT_PRICE_API_URL: &str = "https://api.dexscreener.com";

/// Runtime settings for the lookup service.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-network RPC endpoint overrides; networks not listed use their public default.
    pub rpc_urls: BTreeMap<Network, String>,

    /// Base URL of the DexScreener-compatible price API.
    pub price_api_url: String,

    /// Timeout applied to every outbound HTTP request.
    pub request_timeout_secs: u64,

    /// Extra attempts for transient RPC failures.
    pub max_retries: u32,

    /// Backoff before the first retry; doubled on each further retry.
    pub retry_backoff_ms: u64,

    /// Default tracing filter (trace, debug, info, warn, error), overridden by `RUST_LOG`.
    pub log_level: String,

    /// Registry entries added on top of the built-in table.
    pub extra_entries: Vec<RegistryEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_urls: BTreeMap::new(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            request_timeout_secs: 10,
            max_retries: 3,
            retry_backoff_ms: 250,
            log_level: "info".to_string(),
            extra_entries: Vec::new(),
        }
    }
}

impl Config {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be positive".to_string()));
        }
        Url::parse(&self.price_api_url)
            .map_err(|e| Error::Config(format!("price_api_url: {e}")))?;
        for (network, url) in &self.rpc_urls {
            Url::parse(url).map_err(|e| Error::Config(format!("rpc url for {network}: {e}")))?;
        }
        Ok(())
    }

    /// RPC endpoint for a network, falling back to its public default.
    pub fn rpc_url(&self, network: Network) -> &str {
        self.rpc_urls
            .get(&network)
            .map(String::as_str)
            .unwrap_or_else(|| network.default_rpc_url())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// The built-in registry extended with `extra_entries`.
    pub fn registry(&self) -> Result<Registry, Error> {
        let mut registry = Registry::builtin();
        registry.extend(self.extra_entries.iter().cloned())?;
        Ok(registry)
    }

    /// HTTP client shared by the RPC and price clients.
    pub fn http_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .user_agent(concat!("venft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("http client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.price_api_url, DEFAULT_PRICE_API_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.rpc_url(Network::Base), "https://mainnet.base.org");
    }

    #[test]
    fn test_rpc_override() {
        let config = Config::from_json(
            r#"{ "rpc_urls": { "fantom": "https://fantom.example.org/rpc" }, "max_retries": 0 }"#,
        )
        .unwrap();
        assert_eq!(config.rpc_url(Network::Fantom), "https://fantom.example.org/rpc");
        assert_eq!(config.rpc_url(Network::Mantle), "https://rpc.mantle.xyz");
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_json(r#"{ "request_timeout_secs": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "price_api_url": "not a url" }"#).is_err());
        assert!(Config::from_json(r#"{ "rpc_urls": { "base": "::" } }"#).is_err());
        assert!(Config::from_json(r#"{ "rpc_urls": { "ethereum": "https://x" } }"#).is_err());
    }

    #[test]
    fn test_extra_entries_extend_registry() {
        let config = Config::from_json(
            r#"{
                "extra_entries": [{
                    "key": "veTest",
                    "network": "base",
                    "address": "0x0000000000000000000000000000000000000001",
                    "shape": "struct",
                    "underlying": "0x0000000000000000000000000000000000000002"
                }]
            }"#,
        )
        .unwrap();
        let registry = config.registry().unwrap();
        assert!(registry.get("veTest").is_some());
        assert!(registry.get("veFVM").is_some());
    }

    #[test]
    fn test_extra_entry_cannot_shadow_builtin() {
        let config = Config::from_json(
            r#"{
                "extra_entries": [{
                    "key": "veFVM",
                    "network": "fantom",
                    "address": "0x0000000000000000000000000000000000000001",
                    "shape": "tuple",
                    "underlying": "0x0000000000000000000000000000000000000002"
                }]
            }"#,
        )
        .unwrap();
        assert!(config.registry().is_err());
    }
}
