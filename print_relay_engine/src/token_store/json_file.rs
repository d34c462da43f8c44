use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::*;
use tempfile::NamedTempFile;

use crate::token_store::{StoredTokens, TokenRecord, TokenStore, TokenStoreError};

/// Keeps the token document in a single JSON file.
///
/// Writes go to a temporary file next to the target, which is then renamed over it, so a reader sees either the old
/// record or the new one. The temporary file is created owner-read/write only (0600 on unix), and the rename keeps
/// those permissions.
#[derive(Debug, Clone)]
pub struct JsonTokenStore {
    path: PathBuf,
}

impl JsonTokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl TokenStore for JsonTokenStore {
    fn load(&self) -> Result<Option<TokenRecord>, TokenStoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("🔑️ No token file at {}. Not authorized yet.", self.path.display());
                return Ok(None);
            },
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(None);
        }
        let stored = serde_json::from_str::<StoredTokens>(&data)
            .map_err(|e| TokenStoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        let record = stored.into_record();
        if record.is_none() {
            warn!("🔑️ {} holds an incomplete token record. Treating it as absent.", self.path.display());
        }
        Ok(record)
    }

    fn save(&self, record: &TokenRecord) -> Result<(), TokenStoreError> {
        let doc = serde_json::to_string_pretty(&StoredTokens::from(record))
            .map_err(|e| TokenStoreError::Corrupt(e.to_string()))?;
        let mut file = NamedTempFile::new_in(self.directory())?;
        file.write_all(doc.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| TokenStoreError::Io(e.error))?;
        debug!("🔑️ Tokens for merchant {} saved to {}", record.merchant_id, self.path.display());
        Ok(())
    }
}
