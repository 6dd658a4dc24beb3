use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Result;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    types::{Address, U64},
};

use crate::{
    artifacts::ContractArtifact,
    config::NetworkConfig,
    error::DeployError,
    record::Deployment,
    signer::{self, DeploySigner},
    utils,
};

pub struct Deploy<P = Provider<Http>> {
    network_name: String,
    network: NetworkConfig,
    provider: P,
    poll_interval: Duration,
}

impl Deploy {
    /// Connects to the network's RPC endpoint and checks that it serves the
    /// configured chain.
    pub async fn new(
        network_name: &str,
        network: NetworkConfig,
        poll_interval: Duration,
    ) -> Result<Self> {
        let provider = Provider::<Http>::try_from(network.url.as_str())?;
        Self::with_provider(network_name, network, provider, poll_interval).await
    }
}

impl<P> Deploy<P>
where
    P: Middleware + Clone + 'static,
{
    pub async fn with_provider(
        network_name: &str,
        network: NetworkConfig,
        provider: P,
        poll_interval: Duration,
    ) -> Result<Self> {
        verify_chain_id(&provider, network.chain_id).await?;
        log::info!(
            "connected to network {} (chain id {}) at {}",
            network_name,
            network.chain_id,
            network.url
        );

        Ok(Self {
            network_name: network_name.to_string(),
            network,
            provider,
            poll_interval,
        })
    }

    /// Deploys `contract_name` from `artifacts_dir` with the first available
    /// signer and prints the deployed address.
    pub async fn run(
        &self,
        artifacts_dir: &Path,
        contract_name: &str,
        solidity: &str,
    ) -> Result<Deployment> {
        let signer = signer::first_available(&self.provider, &self.network).await?;
        println!(
            "Deploying contracts with the account: {:?}",
            signer.address()
        );

        let artifact = ContractArtifact::find(artifacts_dir, contract_name)?;
        artifact.check_compiler(solidity);

        // Node accounts sign on the node through `eth_sendTransaction`.
        let deployer = signer.address();
        let deployment = match signer {
            DeploySigner::Local(wallet) => {
                let client = Arc::new(SignerMiddleware::new(self.provider.clone(), wallet));
                self.deploy_contract(client, deployer, &artifact).await?
            }
            DeploySigner::Node(_) => {
                let client = Arc::new(self.provider.clone());
                self.deploy_contract(client, deployer, &artifact).await?
            }
        };

        println!(
            "{} deployed to: {:?}",
            deployment.contract_name, deployment.address
        );
        Ok(deployment)
    }

    async fn deploy_contract<M>(
        &self,
        client: Arc<M>,
        deployer: Address,
        artifact: &ContractArtifact,
    ) -> Result<Deployment>
    where
        M: Middleware + 'static,
    {
        let mut contract_deployer = artifact.factory(client.clone())?.deploy(())?;
        if self.network.legacy {
            contract_deployer = contract_deployer.legacy();
        }
        let mut tx = contract_deployer.tx;
        tx.set_from(deployer);

        let transaction_hash = utils::send_transaction(client.as_ref(), tx).await?;
        let receipt =
            utils::wait_transaction_receipt(client.as_ref(), transaction_hash, self.poll_interval)
                .await?;

        if receipt.status == Some(U64::zero()) {
            return Err(DeployError::Reverted(transaction_hash).into());
        }
        let address = receipt
            .contract_address
            .ok_or(DeployError::MissingContractAddress(transaction_hash))?;

        Ok(Deployment {
            contract_name: artifact.contract_name.clone(),
            network: self.network_name.clone(),
            chain_id: self.network.chain_id,
            deployer,
            address,
            transaction_hash,
            block_number: receipt.block_number.map(|number| number.as_u64()),
        })
    }
}

/// Fails unless the node's `eth_chainId` equals `expected`.
pub async fn verify_chain_id<M>(client: &M, expected: u64) -> Result<()>
where
    M: Middleware + 'static,
{
    let actual = client.get_chainid().await?.as_u64();
    if actual != expected {
        return Err(DeployError::ChainIdMismatch { expected, actual }.into());
    }
    Ok(())
}
