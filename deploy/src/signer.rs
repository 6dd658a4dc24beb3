use anyhow::Result;
use ethers::{
    providers::Middleware,
    signers::{LocalWallet, Signer},
    types::Address,
};

use crate::{config::NetworkConfig, error::DeployError, utils};

/// The account that pays for and authorizes the deployment.
#[derive(Debug, Clone)]
pub enum DeploySigner {
    /// A key from the network's `accounts`, signed locally.
    Local(LocalWallet),
    /// An account unlocked on the node, signed remotely.
    Node(Address),
}

impl DeploySigner {
    pub fn address(&self) -> Address {
        match self {
            DeploySigner::Local(wallet) => wallet.address(),
            DeploySigner::Node(address) => *address,
        }
    }
}

/// Picks the first available signer: the first configured key, otherwise the
/// first account the node reports.
pub async fn first_available<M>(client: &M, network: &NetworkConfig) -> Result<DeploySigner>
where
    M: Middleware + 'static,
{
    if let Some(sk) = network.accounts.first() {
        let wallet = utils::decode_private_key(sk)?.with_chain_id(network.chain_id);
        log::info!("using configured account {:?}", wallet.address());
        return Ok(DeploySigner::Local(wallet));
    }

    let accounts = client.get_accounts().await?;
    log::debug!("node reports {} accounts", accounts.len());
    match accounts.first() {
        Some(address) => {
            log::info!("using node account {:?}", address);
            Ok(DeploySigner::Node(*address))
        }
        None => Err(DeployError::NoSigner.into()),
    }
}
