use thiserror::Error;

/// Unified error type for the veNFT lookup library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("invalid token id: {0:?}")]
    InvalidId(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Errors decoding contract return data.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid ABI encoding: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    #[error("expected {expected} results, got {actual}")]
    ResultCount { expected: usize, actual: usize },

    #[error("value out of range: {0}")]
    OutOfRange(String),
}

/// Errors talking to a JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("http status {0}")]
    Status(u16),

    #[error("json-rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("batched call #{index} failed")]
    CallFailed { index: usize },

    #[error("no rpc endpoint configured for {0}")]
    NoEndpoint(String),
}

impl RpcError {
    /// Whether retrying the same request may succeed.
    ///
    /// JSON-RPC error objects (reverts, bad params) are deterministic and
    /// are never retried.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Transport(_) => true,
            RpcError::Status(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors from the external price source. Never surfaced to lookup callers.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("http status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no trading pairs for token")]
    NoPairs,
}

/// Errors building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate registry key: {0}")]
    DuplicateKey(String),

    #[error("parse error: {0}")]
    Parse(String),
}
