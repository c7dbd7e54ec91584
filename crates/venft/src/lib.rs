pub mod config;
pub mod contracts;
pub mod display;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod multicall;
pub mod network;
pub mod price;
pub mod query;
pub mod registry;
pub mod rpc;
pub mod session;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

use error::Error;

// Re-exports for convenience
pub use alloy::primitives::Address;
pub use config::Config;
pub use contracts::LockShape;
pub use lookup::{LookupResult, LookupService};
pub use network::Network;
pub use price::PriceSource;
pub use query::LookupQuery;
pub use registry::{Registry, RegistryEntry};
pub use rpc::ChainReader;
pub use session::{LookupSession, LookupState};

/// Resolve a lock position using the HTTP clients configured by `config`.
///
/// This is the main entry point for one-shot lookups. Incomplete input or an
/// unknown key yields `Ok(None)`.
pub async fn lookup(
    config: &Config,
    key: Option<&str>,
    id: Option<&str>,
) -> Result<Option<LookupResult>, Error> {
    LookupService::from_config(config)?.resolve(key, id).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::display::ResultView;
    use crate::price::StaticPriceSource;
    use crate::testing::FakeChain;

    #[tokio::test]
    async fn test_query_to_view() {
        let registry = Registry::builtin();
        let mut prices = StaticPriceSource::new();
        prices.insert(registry.get("veAero").unwrap().underlying, 1.2);
        let service = LookupService::new(registry, Arc::new(FakeChain::new()), Arc::new(prices));

        let query =
            LookupQuery::parse_url("https://venft.example.org/?venft=veAero&id=1001").unwrap();
        let result = service.resolve_query(&query).await.unwrap().unwrap();
        let view = ResultView::new(query.venft().unwrap(), &result);

        assert_eq!(view.title, "veAero ID");
        assert_eq!(view.id, "1001");
        assert_eq!(view.locked_label, "Aero Locked");
        assert_eq!(view.locked, "5");
        assert_eq!(view.balance, "1");
        assert_eq!(view.usd_value, Some(6.0));
        assert_eq!(view.unlock, "Tue, 01 Jan 2030 00:00:00 GMT");
    }

    #[tokio::test]
    async fn test_lookup_incomplete_input_needs_no_network() {
        let config = Config::default();
        assert!(lookup(&config, Some("veFVM"), None).await.unwrap().is_none());
        assert!(lookup(&config, Some("veUnknown"), Some("1")).await.unwrap().is_none());
    }

    #[test]
    fn test_result_serializes_checksummed_owner() {
        let result = LookupResult {
            id: "42".to_string(),
            balance: "1".to_string(),
            amount: "5".to_string(),
            end: 1_893_456_000,
            owner: "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap(),
            price: 2.5,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["owner"], "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(json["end"], 1_893_456_000u64);
        assert_eq!(json["price"], 2.5);
    }
}
