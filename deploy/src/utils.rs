use std::time::Duration;

use anyhow::{anyhow, Result};
use ethers::{
    providers::Middleware,
    signers::LocalWallet,
    types::{transaction::eip2718::TypedTransaction, TransactionReceipt, H256},
    utils::hex,
};

pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(value.strip_prefix("0x").unwrap_or(value))?)
}

pub fn decode_private_key(sk: &str) -> Result<LocalWallet> {
    let bytes = decode_hex(sk)?;
    if bytes.len() != 32 {
        return Err(anyhow!("private key must be 32 bytes, got {}", bytes.len()));
    }
    Ok(LocalWallet::from_bytes(&bytes)?)
}

pub async fn send_transaction<M>(client: &M, mut tx: TypedTransaction) -> Result<H256>
where
    M: Middleware + 'static,
{
    client.fill_transaction(&mut tx, None).await?;
    log::debug!(
        "sending transaction from:{:?} nonce:{:?} gas:{:?}",
        tx.from(),
        tx.nonce(),
        tx.gas()
    );

    let transaction_hash = client.send_transaction(tx, None).await?.tx_hash();
    log::info!("transaction hash:{:?}", transaction_hash);
    Ok(transaction_hash)
}

/// Polls until the node returns a receipt for `transaction_hash`.
pub async fn wait_transaction_receipt<M>(
    client: &M,
    transaction_hash: H256,
    interval: Duration,
) -> Result<TransactionReceipt>
where
    M: Middleware + 'static,
{
    loop {
        if let Some(receipt) = client.get_transaction_receipt(transaction_hash).await? {
            log::info!(
                "transaction {:?} included in block {:?}",
                transaction_hash,
                receipt.block_number
            );
            return Ok(receipt);
        }
        tokio::time::sleep(interval).await;
    }
}
