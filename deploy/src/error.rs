use std::path::PathBuf;

use ethers::types::H256;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("network `{name}` is not configured (available: {available})")]
    UnknownNetwork { name: String, available: String },

    #[error("chain id mismatch: configured {expected}, but connected to a chain with id {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("no signer available on the selected network")]
    NoSigner,

    #[error("artifact for contract `{name}` not found in {}", dir.display())]
    ArtifactNotFound { name: String, dir: PathBuf },

    #[error("multiple artifacts match `{name}`: {}", candidates.join(", "))]
    AmbiguousArtifact {
        name: String,
        candidates: Vec<String>,
    },

    #[error("contract `{0}` is abstract and can't be deployed")]
    AbstractContract(String),

    #[error("deployment transaction {0:?} reverted")]
    Reverted(H256),

    #[error("receipt of transaction {0:?} has no contract address")]
    MissingContractAddress(H256),
}
