//! Name-keyed registry of contract interfaces and deployment bytecode.
//!
//! Populated once at process start. Every contract name maps to an ABI and a
//! binary, either as `<dir>/<Name>.abi` / `<dir>/<Name>.bin` files or as
//! inline text. Parsed ABIs are cached and shared between handles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ac_01_web3_transport::abi::parse_abi;
use ac_01_web3_transport::JsonAbi;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::errors::SourceError;

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Inline(String),
}

impl Source {
    fn load(&self) -> Result<String, SourceError> {
        match self {
            Source::Inline(contents) => Ok(contents.clone()),
            Source::File(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                trace!(source = %path.display(), bytes = contents.len(), "Source loaded");
                Ok(contents)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ContractSources {
    abis: HashMap<String, Source>,
    binaries: HashMap<String, Source>,
    parsed: RwLock<HashMap<String, Arc<JsonAbi>>>,
}

impl ContractSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map each name to `<dir>/<Name>.abi` and `<dir>/<Name>.bin`.
    ///
    /// Files are only read on first use.
    pub fn from_directory<S: AsRef<str>>(dir: impl AsRef<Path>, names: &[S]) -> Self {
        let mut sources = Self::new();
        for name in names {
            let name = name.as_ref();
            let dir = dir.as_ref();
            sources.register_files(
                name,
                dir.join(format!("{}.abi", name)),
                dir.join(format!("{}.bin", name)),
            );
        }
        sources
    }

    pub fn register_files(&mut self, name: &str, abi: PathBuf, binary: PathBuf) -> &mut Self {
        debug!(contract = name, abi = %abi.display(), binary = %binary.display(), "Mapped contract sources");
        self.abis.insert(name.to_string(), Source::File(abi));
        self.binaries.insert(name.to_string(), Source::File(binary));
        self.parsed.write().remove(name);
        self
    }

    pub fn register_inline(
        &mut self,
        name: &str,
        abi: impl Into<String>,
        binary: impl Into<String>,
    ) -> &mut Self {
        self.abis.insert(name.to_string(), Source::Inline(abi.into()));
        self.binaries
            .insert(name.to_string(), Source::Inline(binary.into()));
        self.parsed.write().remove(name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.abis.contains_key(name)
    }

    /// Parsed interface for `name`.
    pub fn abi(&self, name: &str) -> Result<Arc<JsonAbi>, SourceError> {
        if let Some(abi) = self.parsed.read().get(name) {
            return Ok(abi.clone());
        }
        let source = self
            .abis
            .get(name)
            .ok_or_else(|| SourceError::UnmappedAbi(name.to_string()))?;
        let abi = parse_abi(&source.load()?).map_err(|source| SourceError::InvalidAbi {
            contract: name.to_string(),
            source,
        })?;
        let abi = Arc::new(abi);
        self.parsed.write().insert(name.to_string(), abi.clone());
        debug!(contract = name, "Contract ABI loaded");
        Ok(abi)
    }

    /// Deployment bytecode for `name`, hex decoded.
    pub fn binary(&self, name: &str) -> Result<Vec<u8>, SourceError> {
        let source = self
            .binaries
            .get(name)
            .ok_or_else(|| SourceError::UnmappedBinary(name.to_string()))?;
        let text = source.load()?;
        let text = text.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        hex::decode(digits).map_err(|e| SourceError::InvalidBinary {
            contract: name.to_string(),
            reason: e.to_string(),
        })
    }
}
