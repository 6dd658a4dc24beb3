use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

/// Outcome of one contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub contract_name: String,
    pub network: String,
    pub chain_id: u64,
    pub deployer: Address,
    pub address: Address,
    pub transaction_hash: H256,
    pub block_number: Option<u64>,
}

impl Deployment {
    /// Writes the record to `<dir>/<network>/<contract>.json`, replacing any
    /// earlier deployment of the same contract on that network.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let network_dir = dir.as_ref().join(&self.network);
        fs::create_dir_all(&network_dir)
            .with_context(|| format!("failed to create {}", network_dir.display()))?;

        let path = network_dir.join(format!("{}.json", self.contract_name));
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("deployment saved to {}", path.display());
        Ok(path)
    }
}
