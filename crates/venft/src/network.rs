use std::fmt;
use std::str::FromStr;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Multicall3 deployment address, identical on every supported network.
pub const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

/// EVM networks hosting known veNFT deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Fantom,
    Base,
    Optimism,
    Arbitrum,
    Avalanche,
    Mantle,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Fantom,
        Network::Base,
        Network::Optimism,
        Network::Arbitrum,
        Network::Avalanche,
        Network::Mantle,
    ];

    pub fn chain_id(self) -> u64 {
        match self {
            Network::Fantom => 250,
            Network::Base => 8453,
            Network::Optimism => 10,
            Network::Arbitrum => 42161,
            Network::Avalanche => 43114,
            Network::Mantle => 5000,
        }
    }

    /// Human-readable name, used to group registry keys for display.
    pub fn display_name(self) -> &'static str {
        match self {
            Network::Fantom => "Fantom",
            Network::Base => "Base",
            Network::Optimism => "OP Mainnet",
            Network::Arbitrum => "Arbitrum One",
            Network::Avalanche => "Avalanche",
            Network::Mantle => "Mantle",
        }
    }

    /// Public RPC endpoint used when the config does not override it.
    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Fantom => "https://rpc.ankr.com/fantom",
            Network::Base => "https://mainnet.base.org",
            Network::Optimism => "https://mainnet.optimism.io",
            Network::Arbitrum => "https://arb1.arbitrum.io/rpc",
            Network::Avalanche => "https://api.avax.network/ext/bc/C/rpc",
            Network::Mantle => "https://rpc.mantle.xyz",
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Network> {
        Network::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fantom" | "ftm" => Ok(Network::Fantom),
            "base" => Ok(Network::Base),
            "optimism" | "op" => Ok(Network::Optimism),
            "arbitrum" | "arb" => Ok(Network::Arbitrum),
            "avalanche" | "avax" => Ok(Network::Avalanche),
            "mantle" => Ok(Network::Mantle),
            other => other
                .parse::<u64>()
                .ok()
                .and_then(Network::from_chain_id)
                .ok_or_else(|| format!("unknown network: {s}")),
        }
    }
}
