//! Durable record of delivered alerts

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Ledger file name inside the state directory
pub const LEDGER_FILE: &str = "signals_sent.json";

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Ledger encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sent-alert ledger backed by a JSON object of `key -> message`.
///
/// Every insert rewrites the file through a temp file and a rename, so a
/// crash leaves either the old or the new ledger on disk.
#[derive(Debug)]
pub struct SentLedger {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl SentLedger {
    /// Open the ledger in `state_dir`, creating the directory if needed.
    ///
    /// A missing or unreadable JSON file starts an empty ledger.
    pub async fn open(state_dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let dir = state_dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| LedgerError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        let path = dir.join(LEDGER_FILE);

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt ledger, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(LedgerError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened sent ledger");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a key and write the ledger to disk.
    ///
    /// The key stays recorded in memory even when the write fails; the next
    /// successful write includes it.
    pub async fn insert_and_persist(&mut self, key: &str, message: &str) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), message.to_string());
        self.persist().await
    }

    async fn persist(&self) -> Result<(), LedgerError> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|source| LedgerError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| LedgerError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }
}
