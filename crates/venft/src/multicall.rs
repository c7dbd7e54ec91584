//! Multicall3 `aggregate3` batching.
//!
//! Several read calls travel in one `eth_call` and execute against the same
//! block, so their results are mutually consistent.

use alloy::primitives::{Address, Bytes};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::error::{DecodeError, Error, RpcError};

sol! {
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls)
            external
            payable
            returns (Result[] memory returnData);
    }
}

pub use IMulticall3::{Call3, Result as CallResult};

/// A batched call that reverts the whole batch when it fails.
pub fn call3(target: Address, data: Vec<u8>) -> Call3 {
    Call3 {
        target,
        allowFailure: false,
        callData: data.into(),
    }
}

pub fn encode_aggregate3(calls: Vec<Call3>) -> Vec<u8> {
    IMulticall3::aggregate3Call { calls }.abi_encode()
}

/// Decode the `(bool,bytes)[]` returned by `aggregate3`.
pub fn decode_aggregate3(data: &[u8]) -> Result<Vec<CallResult>, DecodeError> {
    Ok(IMulticall3::aggregate3Call::abi_decode_returns(data)?)
}

/// Return data of every call, failing on the first unsuccessful entry or
/// on a result count that does not match the request.
pub fn require_all_success(
    results: Vec<CallResult>,
    expected: usize,
) -> Result<Vec<Bytes>, Error> {
    if results.len() != expected {
        return Err(RpcError::InvalidResponse(format!(
            "multicall returned {} results for {expected} calls",
            results.len()
        ))
        .into());
    }
    results
        .into_iter()
        .enumerate()
        .map(|(index, r)| {
            if r.success {
                Ok(r.returnData)
            } else {
                Err(RpcError::CallFailed { index }.into())
            }
        })
        .collect()
}
