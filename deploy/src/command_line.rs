use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;

use crate::{
    config::{NetworkConfig, ProjectConfig, DEFAULT_CONFIG_FILE},
    deploy::Deploy,
};

pub const DEFAULT_CONTRACT: &str = "LandTransaction";

#[derive(Debug, Parser)]
#[clap(version, about = "Deploy a compiled contract to a configured network")]
pub struct CommandLine {
    /// Project config [default: deploy.config.json, or the built-in hardhat
    /// network when that file is absent]
    #[clap(short, long)]
    config: Option<PathBuf>,

    #[clap(short, long)]
    network: Option<String>,

    #[clap(long, default_value = DEFAULT_CONTRACT)]
    contract: String,

    #[clap(short, long)]
    rpc: Option<String>,

    #[clap(long, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    sk: Option<String>,

    #[clap(long)]
    artifacts: Option<PathBuf>,

    /// Write the deployment record under this directory.
    #[clap(long)]
    deployments: Option<PathBuf>,

    #[clap(long, default_value_t = 1000)]
    poll_interval_ms: u64,
}

impl CommandLine {
    pub async fn execute(self) -> Result<()> {
        let config = self.project_config()?;
        let (network_name, network) = self.network(&config)?;

        let deploy = Deploy::new(
            &network_name,
            network,
            Duration::from_millis(self.poll_interval_ms),
        )
        .await?;
        let deployment = deploy
            .run(&config.paths.artifacts, &self.contract, &config.solidity)
            .await?;

        if let Some(dir) = &self.deployments {
            deployment.save(dir)?;
        }
        Ok(())
    }

    fn project_config(&self) -> Result<ProjectConfig> {
        let mut config = match &self.config {
            Some(path) => ProjectConfig::load(path)?,
            None => ProjectConfig::load_or_default(DEFAULT_CONFIG_FILE)?,
        };
        if let Some(artifacts) = &self.artifacts {
            config.paths.artifacts = artifacts.clone();
        }
        Ok(config)
    }

    /// The selected network with `--rpc` and `--sk` applied.
    fn network(&self, config: &ProjectConfig) -> Result<(String, NetworkConfig)> {
        let name = self
            .network
            .clone()
            .unwrap_or_else(|| config.default_network.clone());
        let mut network = config.network(&name)?.clone();

        if let Some(rpc) = &self.rpc {
            network.url = rpc.clone();
        }
        if let Some(sk) = &self.sk {
            network.accounts = vec![sk.clone()];
        }
        log::info!("selected network {} (chain id {})", name, network.chain_id);
        Ok((name, network))
    }
}
