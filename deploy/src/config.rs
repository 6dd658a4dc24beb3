use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::DeployError, utils};

pub const DEFAULT_CONFIG_FILE: &str = "deploy.config.json";
pub const DEFAULT_NETWORK: &str = "hardhat";
pub const DEFAULT_SOLIDITY: &str = "0.8.0";
pub const DEFAULT_CHAIN_ID: u64 = 1337;
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub solidity: String,

    #[serde(default = "default_network")]
    pub default_network: String,

    pub networks: BTreeMap<String, NetworkConfig>,

    #[serde(default)]
    pub paths: Paths,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,

    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Hex private keys. When empty the node's own accounts are used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,

    #[serde(default)]
    pub legacy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paths {
    pub artifacts: PathBuf,
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            url: default_rpc_url(),
            accounts: Vec::new(),
            legacy: false,
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            solidity: DEFAULT_SOLIDITY.to_string(),
            default_network: default_network(),
            networks: BTreeMap::from([(DEFAULT_NETWORK.to_string(), NetworkConfig::default())]),
            paths: Paths::default(),
        }
    }
}

impl ProjectConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`ProjectConfig::load`], falling back to the built-in project
    /// when `path` does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!(
                "config {} not found, using built-in {} network",
                path.display(),
                DEFAULT_NETWORK
            );
            Ok(Self::default())
        }
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig, DeployError> {
        self.networks
            .get(name)
            .ok_or_else(|| DeployError::UnknownNetwork {
                name: name.to_string(),
                available: self
                    .networks
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn validate(&self) -> Result<(), DeployError> {
        if !is_compiler_version(&self.solidity) {
            return Err(DeployError::InvalidConfig(format!(
                "solidity version `{}` is not MAJOR.MINOR.PATCH",
                self.solidity
            )));
        }
        if self.networks.is_empty() {
            return Err(DeployError::InvalidConfig("no networks configured".into()));
        }
        self.network(&self.default_network)?;

        for (name, network) in &self.networks {
            if network.chain_id == 0 {
                return Err(DeployError::InvalidConfig(format!(
                    "network `{name}` has chain id 0"
                )));
            }
            for (index, account) in network.accounts.iter().enumerate() {
                if utils::decode_private_key(account).is_err() {
                    return Err(DeployError::InvalidConfig(format!(
                        "network `{name}` account #{index} is not a 32 byte hex private key"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_compiler_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builtin_project_targets_hardhat_1337() {
        let config = ProjectConfig::default();
        assert_eq!(config.solidity, "0.8.0");
        assert_eq!(config.default_network, "hardhat");
        let network = config.network("hardhat").unwrap();
        assert_eq!(network.chain_id, 1337);
        assert_eq!(network.url, DEFAULT_RPC_URL);
        assert!(network.accounts.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_fills_defaults() {
        let file = write_config(r#"{"solidity": "0.8.0", "networks": {"hardhat": {"chainId": 1337}}}"#);
        let config = ProjectConfig::load(file.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn load_reads_every_field() {
        let file = write_config(&format!(
            r#"{{
                "solidity": "0.8.19",
                "defaultNetwork": "sepolia",
                "networks": {{
                    "hardhat": {{"chainId": 1337}},
                    "sepolia": {{
                        "chainId": 11155111,
                        "url": "https://rpc.sepolia.org",
                        "accounts": ["{HARDHAT_KEY}"],
                        "legacy": true
                    }}
                }},
                "paths": {{"artifacts": "build/artifacts"}}
            }}"#
        ));
        let config = ProjectConfig::load(file.path()).unwrap();
        assert_eq!(config.default_network, "sepolia");
        assert_eq!(config.paths.artifacts, PathBuf::from("build/artifacts"));
        let sepolia = config.network("sepolia").unwrap();
        assert_eq!(sepolia.chain_id, 11155111);
        assert_eq!(sepolia.url, "https://rpc.sepolia.org");
        assert_eq!(sepolia.accounts, vec![HARDHAT_KEY.to_string()]);
        assert!(sepolia.legacy);
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::load_or_default(dir.path().join("missing.json")).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectConfig::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn rejects_malformed_compiler_version() {
        for version in ["0.8", "^0.8.0", "0.8.x", ""] {
            let config = ProjectConfig {
                solidity: version.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(DeployError::InvalidConfig(_))),
                "{version}"
            );
        }
    }

    #[test]
    fn rejects_unknown_default_network() {
        let file = write_config(
            r#"{"solidity": "0.8.0", "defaultNetwork": "mainnet", "networks": {"hardhat": {"chainId": 1337}}}"#,
        );
        let err = ProjectConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::UnknownNetwork { name, .. }) if name == "mainnet"
        ));
    }

    #[test]
    fn rejects_zero_chain_id() {
        let file = write_config(r#"{"solidity": "0.8.0", "networks": {"hardhat": {"chainId": 0}}}"#);
        let err = ProjectConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_bad_account_key() {
        let mut config = ProjectConfig::default();
        config
            .networks
            .get_mut("hardhat")
            .unwrap()
            .accounts
            .push("0x1234".into());
        assert!(matches!(
            config.validate(),
            Err(DeployError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_network_lists_available() {
        let config = ProjectConfig::default();
        let err = config.network("goerli").unwrap_err();
        assert_eq!(
            err.to_string(),
            "network `goerli` is not configured (available: hardhat)"
        );
    }
}
