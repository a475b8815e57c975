//! crates/doc_simplifier_core/src/cache.rs
//!
//! Time-bounded memoization of generative results.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::{sha256_hex, AiResult, Credential, OutputKind};

/// Identifies one generative call: what was asked, about which text, with which key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: OutputKind,
    pub text_digest: String,
    pub credential_fingerprint: String,
}

impl CacheKey {
    pub fn new(kind: OutputKind, text: &str, credential: &Credential) -> Self {
        Self {
            kind,
            text_digest: sha256_hex(text.as_bytes()),
            credential_fingerprint: credential.fingerprint(),
        }
    }
}

struct CacheEntry {
    result: AiResult,
    inserted_at: Instant,
}

/// Stores results, failures included, until they are older than `ttl`.
pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a fresh entry. A stale entry is evicted and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<AiResult> {
        let mut entries = self.entries.lock();
        let found = entries
            .get(key)
            .map(|entry| (entry.inserted_at.elapsed() < self.ttl, entry.result.clone()));
        match found {
            Some((true, result)) => Some(result),
            Some((false, _)) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Last writer wins. Expired entries are swept on every insert.
    pub fn insert(&self, key: CacheKey, result: AiResult) {
        let mut entries = self.entries.lock();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}
