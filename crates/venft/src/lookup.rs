//! Resolution of a `(registry key, token id)` pair into a normalized lock record.
//!
//! A lookup is two chain round trips and one price request:
//!
//! 1. `balanceOfNFT`, `decimals` and `ownerOf` batched through Multicall3, so
//!    all three observe the same block.
//! 2. `locked(id)` against the veNFT contract, decoded per [`LockShape`].
//! 3. The USD price of the underlying token, fetched concurrently with step 2.
//!
//! Chain failures fail the whole lookup. Price failures only zero the price.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

use crate::config::Config;
use crate::contracts::{self, BaseReads, LockShape, LockedPosition};
use crate::error::Error;
use crate::multicall;
use crate::network::MULTICALL3;
use crate::price::{self, DexScreenerClient, PriceSource};
use crate::query::LookupQuery;
use crate::registry::{Registry, RegistryEntry};
use crate::rpc::{ChainReader, HttpRpcClient};
use crate::units::{format_signed_units, format_units};

/// Normalized view of one lock position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// The requested id, echoed as given.
    pub id: String,
    /// Current voting power, decimal-formatted.
    pub balance: String,
    /// Locked underlying amount, decimal-formatted.
    pub amount: String,
    /// Unlock time in unix seconds; `0` means no expiry.
    pub end: u64,
    #[serde(serialize_with = "checksummed")]
    pub owner: Address,
    /// USD price of the underlying token, `0.0` when unavailable.
    pub price: f64,
}

fn checksummed<S: Serializer>(owner: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&owner.to_checksum(None))
}

pub struct LookupService {
    registry: Registry,
    reader: Arc<dyn ChainReader>,
    prices: Arc<dyn PriceSource>,
}

impl LookupService {
    pub fn new(
        registry: Registry,
        reader: Arc<dyn ChainReader>,
        prices: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            registry,
            reader,
            prices,
        }
    }

    /// Service backed by the HTTP RPC and DexScreener clients.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let reader = Arc::new(HttpRpcClient::new(config)?);
        let prices = Arc::new(DexScreenerClient::new(config)?);
        Ok(Self::new(config.registry()?, reader, prices))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve a lock position.
    ///
    /// Returns `Ok(None)` when either part is missing or empty, or when the
    /// key is not in the registry; no chain traffic happens in those cases.
    /// A malformed id is [`Error::InvalidId`].
    pub async fn resolve(
        &self,
        key: Option<&str>,
        id: Option<&str>,
    ) -> Result<Option<LookupResult>, Error> {
        let (Some(key), Some(id)) = (key, id) else {
            return Ok(None);
        };
        if key.is_empty() || id.is_empty() {
            return Ok(None);
        }
        let Some(entry) = self.registry.get(key) else {
            debug!(key, "unknown veNFT key");
            return Ok(None);
        };

        let token_id = parse_token_id(id)?;
        debug!(
            key,
            id,
            network = %entry.network,
            contract = %entry.address,
            "resolving lock position"
        );

        let base = self.read_base(entry, token_id).await?;
        let (locked, price) = tokio::join!(
            self.read_locked(entry, token_id),
            price::price_or_zero(self.prices.as_ref(), entry.underlying),
        );
        let locked = locked?;

        let result = LookupResult {
            id: id.to_string(),
            balance: format_units(&base.balance, base.decimals),
            amount: format_signed_units(&locked.amount, base.decimals),
            end: locked.end,
            owner: base.owner,
            price,
        };
        info!(key, id, owner = %result.owner, amount = %result.amount, "resolved lock position");
        Ok(Some(result))
    }

    pub async fn resolve_query(
        &self,
        query: &LookupQuery,
    ) -> Result<Option<LookupResult>, Error> {
        self.resolve(query.venft(), query.id()).await
    }

    async fn read_base(&self, entry: &RegistryEntry, token_id: U256) -> Result<BaseReads, Error> {
        let calls = contracts::base_calls(entry.address, token_id);
        let expected = calls.len();
        let calldata = multicall::encode_aggregate3(calls);
        let data = self.reader.eth_call(entry.network, MULTICALL3, calldata).await?;
        let returns =
            multicall::require_all_success(multicall::decode_aggregate3(&data)?, expected)?;
        Ok(contracts::decode_base(&returns)?)
    }

    async fn read_locked(
        &self,
        entry: &RegistryEntry,
        token_id: U256,
    ) -> Result<LockedPosition, Error> {
        let shape: LockShape = entry.shape;
        let calldata = shape.locked_calldata(token_id);
        let data = self.reader.eth_call(entry.network, entry.address, calldata).await?;
        Ok(shape.decode_locked(&data)?)
    }
}

/// Parse a decimal token id. Only ASCII digits are accepted, up to `2^256 - 1`.
pub fn parse_token_id(id: &str) -> Result<U256, Error> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidId(id.to_string()));
    }
    U256::from_str_radix(id, 10).map_err(|_| Error::InvalidId(id.to_string()))
}
