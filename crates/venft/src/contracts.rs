use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::multicall::{call3, Call3};

sol! {
    /// Read interface shared by every veNFT escrow.
    interface IVotingEscrow {
        function balanceOfNFT(uint256 tokenId) external view returns (uint256);
        function decimals() external view returns (uint8);
        function ownerOf(uint256 tokenId) external view returns (address);
    }

    /// Solidly-style escrow: `locked` returns two unnamed values.
    interface ISolidlyEscrow {
        function locked(uint256 tokenId) external view returns (int128, uint256);
    }

    /// Velodrome v2-style escrow: `locked` returns a `LockedBalance` struct.
    interface IVelodromeEscrow {
        struct LockedBalance {
            int128 amount;
            uint256 end;
            bool isPermanent;
        }

        function locked(uint256 tokenId) external view returns (LockedBalance memory);
    }
}

/// How a deployment's `locked(uint256)` reports a lock position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockShape {
    /// Solidly-style escrow: amount at position 0, end at position 1.
    Tuple,
    /// Velodrome v2-style escrow: one `LockedBalance` struct read by field name.
    Struct,
}

/// A lock position normalized across shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedPosition {
    pub amount: BigInt,
    /// Unix timestamp; zero for permanent locks or empty positions.
    pub end: u64,
}

impl LockShape {
    /// `locked(tokenId)` calldata. Both shapes share the selector.
    pub fn locked_calldata(self, token_id: U256) -> Vec<u8> {
        match self {
            LockShape::Tuple => ISolidlyEscrow::lockedCall { tokenId: token_id }.abi_encode(),
            LockShape::Struct => IVelodromeEscrow::lockedCall { tokenId: token_id }.abi_encode(),
        }
    }

    /// Decode `locked(uint256)` return data into an (amount, end) pair.
    pub fn decode_locked(self, data: &[u8]) -> Result<LockedPosition, DecodeError> {
        let (amount, end) = match self {
            LockShape::Tuple => {
                let ret = ISolidlyEscrow::lockedCall::abi_decode_returns(data)?;
                (ret._0, ret._1)
            }
            LockShape::Struct => {
                let lock = IVelodromeEscrow::lockedCall::abi_decode_returns(data)?;
                (lock.amount, lock.end)
            }
        };

        let end = u64::try_from(end)
            .map_err(|_| DecodeError::OutOfRange(format!("lock end {end} exceeds u64")))?;
        Ok(LockedPosition {
            amount: BigInt::from(amount),
            end,
        })
    }
}

/// Values fetched in the batched base read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseReads {
    pub balance: BigUint,
    pub decimals: u8,
    pub owner: Address,
}

/// `balanceOfNFT`, `decimals` and `ownerOf`, in that order.
pub fn base_calls(contract: Address, token_id: U256) -> Vec<Call3> {
    vec![
        call3(
            contract,
            IVotingEscrow::balanceOfNFTCall { tokenId: token_id }.abi_encode(),
        ),
        call3(contract, IVotingEscrow::decimalsCall {}.abi_encode()),
        call3(contract, IVotingEscrow::ownerOfCall { tokenId: token_id }.abi_encode()),
    ]
}

/// Decode the return data of [`base_calls`].
pub fn decode_base(returns: &[Bytes]) -> Result<BaseReads, DecodeError> {
    let [balance, decimals, owner] = returns else {
        return Err(DecodeError::ResultCount {
            expected: 3,
            actual: returns.len(),
        });
    };

    let balance = IVotingEscrow::balanceOfNFTCall::abi_decode_returns(balance)?;
    Ok(BaseReads {
        balance: BigUint::from_bytes_be(&balance.to_be_bytes::<32>()),
        decimals: IVotingEscrow::decimalsCall::abi_decode_returns(decimals)?,
        owner: IVotingEscrow::ownerOfCall::abi_decode_returns(owner)?,
    })
}
