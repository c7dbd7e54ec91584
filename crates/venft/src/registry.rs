use std::collections::{HashMap, HashSet};

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::contracts::LockShape;
use crate::error::RegistryError;
use crate::network::Network;

/// Static descriptor of one veNFT deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub key: String,
    pub network: Network,
    /// The lock-position (veNFT) contract.
    pub address: Address,
    pub shape: LockShape,
    /// Underlying token, used only for the USD price lookup.
    pub underlying: Address,
}

struct Builtin {
    key: &'static str,
    network: Network,
    address: Address,
    shape: LockShape,
    underlying: Address,
}

const fn builtin(
    key: &'static str,
    network: Network,
    address: Address,
    shape: LockShape,
    underlying: Address,
) -> Builtin {
    Builtin {
        key,
        network,
        address,
        shape,
        underlying,
    }
}

const BUILTIN: [Builtin; 11] = [
    builtin(
        "veFVM",
        Network::Fantom,
        address!("ae459ee7377fb9f67518047bba5482c2f0963236"),
        LockShape::Tuple,
        address!("07BB65fAaC502d4996532F834A1B7ba5dC32Ff96"),
    ),
    builtin(
        "veBVM",
        Network::Base,
        address!("91F85d68B413dE823684c891db515B0390a02512"),
        LockShape::Tuple,
        address!("d386a121991E51Eab5e3433Bf5B1cF4C8884b47a"),
    ),
    builtin(
        "veVelo",
        Network::Optimism,
        address!("FAf8FD17D9840595845582fCB047DF13f006787d"),
        LockShape::Struct,
        address!("9560e827aF36c94D2Ac33a39bCE1Fe78631088Db"),
    ),
    builtin(
        "veAero",
        Network::Base,
        address!("ebf418fe2512e7e6bd9b87a8f0f294acdc67e6b4"),
        LockShape::Struct,
        address!("940181a94A35A4569E4529A3CDfB74e38FD98631"),
    ),
    builtin(
        "veRAM",
        Network::Arbitrum,
        address!("aaa343032aa79ee9a6897dab03bef967c3289a06"),
        LockShape::Tuple,
        address!("AAA6C1E32C55A7Bfa8066A6FAE9b42650F262418"),
    ),
    builtin(
        "veEqual",
        Network::Fantom,
        address!("8313f3551c4d3984ffbadfb42f780d0c8763ce94"),
        LockShape::Tuple,
        address!("3Fd3A0c85B70754eFc07aC9Ac0cbBDCe664865A6"),
    ),
    builtin(
        "vePhar",
        Network::Avalanche,
        address!("AAAEa1fB9f3DE3F70E89f37B69Ab11B47eb9Ce6F"),
        LockShape::Tuple,
        address!("AAAB9D12A30504559b0C5a9A5977fEE4A6081c6b"),
    ),
    builtin(
        "veCleo",
        Network::Mantle,
        address!("AAAEa1fB9f3DE3F70E89f37B69Ab11B47eb9Ce6F"),
        LockShape::Tuple,
        address!("C1E0C8C30F251A07a894609616580ad2CEb547F2"),
    ),
    builtin(
        "veScale",
        Network::Base,
        address!("28c9c71c776a1203000b56c0cca48bef1cd51c53"),
        LockShape::Tuple,
        address!("54016a4848a38f257B6E96331F7404073Fd9c32C"),
    ),
    builtin(
        "veHRA",
        Network::Arbitrum,
        address!("44ccA4FB1737F6A5DEb2AC1Bc1F3D4075bBF9db4"),
        LockShape::Tuple,
        address!("E594b57E7F11ec1E8Af9f003F74Fa52B7aefdc9F"),
    ),
    builtin(
        "veCHR",
        Network::Arbitrum,
        address!("9A01857f33aa382b1d5bb96C3180347862432B0d"),
        LockShape::Tuple,
        address!("15b2fb8f08E4Ac1Ce019EADAe02eE92AeDF06851"),
    ),
];

/// Read-only table of known deployments, keyed by short name.
///
/// Entries keep their insertion order, which is the order they are listed in.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// The hand-curated deployment table.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for b in &BUILTIN {
            registry.index.insert(b.key.to_string(), registry.entries.len());
            registry.entries.push(RegistryEntry {
                key: b.key.to_string(),
                network: b.network,
                address: b.address,
                shape: b.shape,
                underlying: b.underlying,
            });
        }
        registry
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = RegistryEntry>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        registry.extend(entries)?;
        Ok(registry)
    }

    /// Parse a registry from a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<RegistryEntry> =
            serde_json::from_str(json).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::from_entries(entries)
    }

    /// Add entries; a key that is already present is rejected.
    ///
    /// All keys are checked before any entry is added, so a rejected batch
    /// leaves the registry unchanged.
    pub fn extend(
        &mut self,
        entries: impl IntoIterator<Item = RegistryEntry>,
    ) -> Result<(), RegistryError> {
        let entries: Vec<RegistryEntry> = entries.into_iter().collect();
        let mut batch = HashSet::new();
        for entry in &entries {
            if self.index.contains_key(&entry.key) || !batch.insert(entry.key.as_str()) {
                return Err(RegistryError::DuplicateKey(entry.key.clone()));
            }
        }
        for entry in entries {
            self.index.insert(entry.key.clone(), self.entries.len());
            self.entries.push(entry);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys grouped by network display name, both in first-seen order.
    pub fn grouped_by_network(&self) -> Vec<(&'static str, Vec<&str>)> {
        let mut groups: Vec<(&'static str, Vec<&str>)> = Vec::new();
        for entry in &self.entries {
            let name = entry.network.display_name();
            match groups.iter_mut().find(|(n, _)| *n == name) {
                Some((_, keys)) => keys.push(entry.key.as_str()),
                None => groups.push((name, vec![entry.key.as_str()])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), 11);

        let velo = registry.get("veVelo").unwrap();
        assert_eq!(velo.network, Network::Optimism);
        assert_eq!(velo.shape, LockShape::Struct);
        assert_eq!(velo.address.to_checksum(None), "0xFAf8FD17D9840595845582fCB047DF13f006787d");

        assert_eq!(registry.get("veFVM").unwrap().shape, LockShape::Tuple);
        assert!(registry.get("vefvm").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_builtin_keys_unique() {
        let registry = Registry::builtin();
        let rebuilt = Registry::from_entries(registry.entries().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), registry.len());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let entry = Registry::builtin().get("veAero").cloned().unwrap();
        let result = Registry::from_entries(vec![entry.clone(), entry]);
        assert!(matches!(result, Err(RegistryError::DuplicateKey(k)) if k == "veAero"));
    }

    #[test]
    fn test_rejected_extend_leaves_registry_unchanged() {
        let mut registry = Registry::builtin();
        let fresh = RegistryEntry {
            key: "veTest".to_string(),
            network: Network::Mantle,
            address: Address::repeat_byte(0x01),
            shape: LockShape::Tuple,
            underlying: Address::repeat_byte(0x02),
        };
        let clash = registry.get("veAero").cloned().unwrap();

        let result = registry.extend(vec![fresh.clone(), clash]);
        assert!(matches!(result, Err(RegistryError::DuplicateKey(k)) if k == "veAero"));
        assert_eq!(registry.len(), 11);
        assert!(registry.get("veTest").is_none());

        let result = registry.extend(vec![fresh.clone(), fresh]);
        assert!(matches!(result, Err(RegistryError::DuplicateKey(k)) if k == "veTest"));
        assert!(registry.get("veTest").is_none());
    }

    #[test]
    fn test_grouped_by_network_preserves_order() {
        let registry = Registry::builtin();
        let groups = registry.grouped_by_network();
        let names: Vec<_> = groups.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["Fantom", "Base", "OP Mainnet", "Arbitrum One", "Avalanche", "Mantle"]
        );
        assert_eq!(groups[0].1, vec!["veFVM", "veEqual"]);
        assert_eq!(groups[1].1, vec!["veBVM", "veAero", "veScale"]);
        assert_eq!(groups[3].1, vec!["veRAM", "veHRA", "veCHR"]);
    }

    #[test]
    fn test_from_json() {
        let registry = Registry::from_json(
            r#"[{
                "key": "veTest",
                "network": "mantle",
                "address": "0x0000000000000000000000000000000000000001",
                "shape": "tuple",
                "underlying": "0x0000000000000000000000000000000000000002"
            }]"#,
        )
        .unwrap();
        assert_eq!(registry.get("veTest").unwrap().network, Network::Mantle);
        assert!(Registry::from_json(r#"[{"key": "x"}]"#).is_err());
    }
}
