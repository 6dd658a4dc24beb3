//! Lookup of compiled contract artifacts.
//!
//! Artifacts follow the Hardhat layout: one `<Name>.json` per contract under
//! `<artifacts>/<source path>/`, next to a `<Name>.dbg.json` that points at
//! the build info of the compilation that produced it.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use ethers::{
    abi::Abi,
    contract::ContractFactory,
    providers::Middleware,
    types::Bytes,
};
use serde::Deserialize;

use crate::error::DeployError;

const ARTIFACT_EXTENSION: &str = ".json";
const DBG_EXTENSION: &str = ".dbg.json";
const BUILD_INFO_DIR: &str = "build-info";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,

    #[serde(skip)]
    pub path: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_version: String,
}

impl ContractArtifact {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        let mut artifact: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse artifact {}", path.display()))?;
        artifact.path = path.to_path_buf();
        Ok(artifact)
    }

    /// Resolves `name` to exactly one artifact under `dir`. `name` is either a
    /// bare contract name or a fully qualified `source:Contract` name.
    pub fn find(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let (source_name, contract_name) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        };

        let file_name = format!("{contract_name}{ARTIFACT_EXTENSION}");
        let mut paths = Vec::new();
        if dir.is_dir() {
            collect_files(dir, &file_name, &mut paths)?;
        }

        let mut matches = Vec::new();
        for path in paths {
            let artifact = Self::load(&path)?;
            if artifact.contract_name == contract_name
                && source_name.map_or(true, |source| artifact.source_name == source)
            {
                matches.push(artifact);
            }
        }

        match matches.len() {
            0 => Err(DeployError::ArtifactNotFound {
                name: name.to_string(),
                dir: dir.to_path_buf(),
            }
            .into()),
            1 => {
                let artifact = matches.remove(0);
                log::info!(
                    "resolved {} to {}",
                    artifact.fully_qualified_name(),
                    artifact.path.display()
                );
                Ok(artifact)
            }
            _ => {
                let mut candidates: Vec<String> =
                    matches.iter().map(Self::fully_qualified_name).collect();
                candidates.sort();
                Err(DeployError::AmbiguousArtifact {
                    name: name.to_string(),
                    candidates,
                }
                .into())
            }
        }
    }

    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    pub fn factory<M: Middleware>(&self, client: Arc<M>) -> Result<ContractFactory<M>, DeployError> {
        if self.bytecode.is_empty() {
            return Err(DeployError::AbstractContract(self.contract_name.clone()));
        }
        Ok(ContractFactory::new(
            self.abi.clone(),
            self.bytecode.clone(),
            client,
        ))
    }

    /// Compiler version recorded in the build info of this artifact, if the
    /// debug file and build info are present.
    pub fn solc_version(&self) -> Option<String> {
        let path = self.path.to_str()?;
        let dbg_path = PathBuf::from(format!(
            "{}{DBG_EXTENSION}",
            path.strip_suffix(ARTIFACT_EXTENSION)?
        ));
        let dbg: DebugFile = serde_json::from_str(&fs::read_to_string(&dbg_path).ok()?).ok()?;
        let build_info_path = dbg_path.parent()?.join(dbg.build_info);
        let build_info: BuildInfo =
            serde_json::from_str(&fs::read_to_string(build_info_path).ok()?).ok()?;
        Some(build_info.solc_version)
    }

    /// Warns when the artifact was built by a compiler other than `solidity`.
    pub fn check_compiler(&self, solidity: &str) {
        match self.solc_version() {
            Some(version) if version != solidity => log::warn!(
                "{} was compiled with solc {}, but the project is configured for {}",
                self.contract_name,
                version,
                solidity
            ),
            Some(_) => {}
            None => log::debug!("no build info for {}", self.contract_name),
        }
    }
}

fn collect_files(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if path.file_name().map_or(false, |name| name == BUILD_INFO_DIR) {
                continue;
            }
            collect_files(&path, file_name, out)?;
        } else if path.file_name().map_or(false, |name| name == file_name) {
            out.push(path);
        }
    }
    Ok(())
}
