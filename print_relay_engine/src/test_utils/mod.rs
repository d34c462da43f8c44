//! Helpers for crates that test against the engine.
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use crate::token_store::{StoredTokens, TokenRecord, TokenStore, TokenStoreError};

/// An in-memory [`TokenStore`] that counts writes.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<StoredTokens>,
    saves: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: &TokenRecord) -> Self {
        Self { tokens: Mutex::new(StoredTokens::from(record)), saves: AtomicUsize::new(0) }
    }

    /// Seed the store with an arbitrary, possibly incomplete, document.
    pub fn with_document(doc: StoredTokens) -> Self {
        Self { tokens: Mutex::new(doc), saves: AtomicUsize::new(0) }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<TokenRecord>, TokenStoreError> {
        let tokens = self.tokens.lock().map_err(|e| TokenStoreError::Corrupt(e.to_string()))?;
        Ok(tokens.clone().into_record())
    }

    fn save(&self, record: &TokenRecord) -> Result<(), TokenStoreError> {
        let mut tokens = self.tokens.lock().map_err(|e| TokenStoreError::Corrupt(e.to_string()))?;
        *tokens = StoredTokens::from(record);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
