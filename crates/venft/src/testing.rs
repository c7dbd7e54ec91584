//! In-memory chain fixtures shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::contracts::{IVelodromeEscrow, IVotingEscrow, LockShape};
use crate::error::RpcError;
use crate::multicall::{CallResult, IMulticall3};
use crate::network::{Network, MULTICALL3};
use crate::registry::Registry;
use crate::rpc::ChainReader;

pub(crate) const OWNER: Address = address!("abc0000000000000000000000000000000000def");

/// Answers veNFT reads for every built-in deployment with the same fixture values.
pub(crate) struct FakeChain {
    pub balance: U256,
    pub decimals: u8,
    pub owner: Address,
    pub locked_amount: i128,
    pub locked_end: u64,
    pub fail_batch: bool,
    pub fail_locked: bool,
    /// `(n, notify)`: the n-th call (zero-based) waits for a notification before answering.
    pub gate: Option<(usize, Arc<Notify>)>,
    pub calls: AtomicUsize,
    pub token_ids: Mutex<Vec<U256>>,
}

impl FakeChain {
    /// balance 1e18 at 18 decimals, locked 5e18 until 1893456000.
    pub fn new() -> Self {
        Self {
            balance: U256::from(10u64.pow(18)),
            decimals: 18,
            owner: OWNER,
            locked_amount: 5 * 10i128.pow(18),
            locked_end: 1_893_456_000,
            fail_batch: false,
            fail_locked: false,
            gate: None,
            calls: AtomicUsize::new(0),
            token_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reverted() -> RpcError {
        RpcError::Rpc {
            code: 3,
            message: "execution reverted".to_string(),
        }
    }

    fn answer_batch(&self, data: &[u8]) -> Result<Vec<u8>, RpcError> {
        let batch = IMulticall3::aggregate3Call::abi_decode(data).map_err(|_| Self::reverted())?;

        let mut results = Vec::with_capacity(batch.calls.len());
        for call in batch.calls {
            let data = &call.callData[..];
            let selector = data.get(..4).ok_or_else(Self::reverted)?;
            let ret = if selector == IVotingEscrow::balanceOfNFTCall::SELECTOR {
                let id = IVotingEscrow::balanceOfNFTCall::abi_decode(data)
                    .map_err(|_| Self::reverted())?;
                self.record_token_id(id.tokenId);
                self.balance.abi_encode()
            } else if selector == IVotingEscrow::decimalsCall::SELECTOR {
                <alloy::sol_types::sol_data::Uint<8> as alloy::sol_types::SolType>::abi_encode(&self.decimals)
            } else if selector == IVotingEscrow::ownerOfCall::SELECTOR {
                self.owner.abi_encode()
            } else {
                return Err(Self::reverted());
            };
            results.push(CallResult {
                success: true,
                returnData: ret.into(),
            });
        }
        Ok(results.abi_encode())
    }

    fn answer_locked(&self, shape: LockShape) -> Vec<u8> {
        let end = U256::from(self.locked_end);
        match shape {
            LockShape::Tuple => (self.locked_amount, end).abi_encode_params(),
            LockShape::Struct => IVelodromeEscrow::LockedBalance {
                amount: self.locked_amount,
                end,
                isPermanent: false,
            }
            .abi_encode(),
        }
    }

    fn record_token_id(&self, id: U256) {
        if let Ok(mut ids) = self.token_ids.lock() {
            ids.push(id);
        }
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn eth_call(
        &self,
        _network: Network,
        to: Address,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, RpcError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((gated, notify)) = &self.gate {
            if *gated == n {
                notify.notified().await;
            }
        }

        if to == MULTICALL3 {
            if self.fail_batch {
                return Err(Self::reverted());
            }
            return self.answer_batch(&data);
        }

        if self.fail_locked {
            return Err(Self::reverted());
        }
        let shape = Registry::builtin()
            .entries()
            .iter()
            .find(|e| e.address == to)
            .map(|e| e.shape)
            .ok_or_else(Self::reverted)?;
        Ok(self.answer_locked(shape))
    }
}
