use std::collections::HashMap;
use std::time::Duration;

use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::Http;
use alloy::transports::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, RpcError};
use crate::network::Network;

/// Read-only contract call access, one `eth_call` per invocation.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute a call against the latest block and return its raw return data.
    async fn eth_call(
        &self,
        network: Network,
        to: Address,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, RpcError>;
}

struct Endpoint {
    url: Url,
    provider: RootProvider,
}

/// JSON-RPC client over HTTP with bounded retry for transient failures.
pub struct HttpRpcClient {
    endpoints: HashMap<Network, Endpoint>,
    max_retries: u32,
    backoff: Duration,
}

impl HttpRpcClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let endpoints = Network::ALL
            .into_iter()
            .map(|n| {
                let url = Url::parse(config.rpc_url(n))
                    .map_err(|e| Error::Config(format!("rpc url for {n}: {e}")))?;
                Ok((n, url))
            })
            .collect::<Result<HashMap<_, _>, Error>>()?;
        Ok(Self::with_client(
            config.http_client()?,
            endpoints,
            config.max_retries,
            config.retry_backoff(),
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoints: HashMap<Network, Url>,
        max_retries: u32,
        backoff: Duration,
    ) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|(network, url)| {
                let transport = Http::with_client(client.clone(), url.clone());
                let provider = RootProvider::new(RpcClient::new(transport, false));
                (network, Endpoint { url, provider })
            })
            .collect();
        Self {
            endpoints,
            max_retries,
            backoff,
        }
    }

    pub fn endpoint(&self, network: Network) -> Option<&Url> {
        self.endpoints.get(&network).map(|e| &e.url)
    }

    async fn call_once(
        provider: &RootProvider,
        to: Address,
        data: &Bytes,
    ) -> Result<Vec<u8>, RpcError> {
        let tx = TransactionRequest::default().to(to).input(data.clone().into());
        provider
            .call(tx)
            .block(BlockId::latest())
            .await
            .map(|result| result.to_vec())
            .map_err(classify)
    }
}

#[async_trait]
impl ChainReader for HttpRpcClient {
    async fn eth_call(
        &self,
        network: Network,
        to: Address,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, RpcError> {
        let endpoint = self
            .endpoints
            .get(&network)
            .ok_or_else(|| RpcError::NoEndpoint(network.to_string()))?;
        let data = Bytes::from(data);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match Self::call_once(&endpoint.provider, to, &data).await {
                Ok(result) => {
                    if attempt > 1 {
                        info!(network = %network, attempt, "eth_call succeeded after retry");
                    }
                    debug!(network = %network, to = %to, bytes = result.len(), "eth_call");
                    return Ok(result);
                }
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    let delay = self.backoff.saturating_mul(2u32.saturating_pow(attempt - 1));
                    warn!(
                        network = %network,
                        attempt,
                        error = %e,
                        ?delay,
                        "eth_call attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(network = %network, to = %to, attempt, error = %e, "eth_call failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Map a transport failure onto [`RpcError`], keeping HTTP status codes and
/// JSON-RPC error objects apart so only the former can be retried.
fn classify(err: TransportError) -> RpcError {
    match err {
        TransportError::ErrorResp(payload) => RpcError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        TransportError::Transport(TransportErrorKind::HttpError(e)) => RpcError::Status(e.status),
        TransportError::Transport(kind) => RpcError::Transport(kind.to_string()),
        other => RpcError::InvalidResponse(other.to_string()),
    }
}
