use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use warden_core::{BlacklistEntry, TokenBlacklist, TokenBlacklistError};

/// In-process revocation set. Entries stay until pruned.
#[derive(Debug, Default, Clone)]
pub struct HashSetTokenBlacklist {
    entries: Arc<DashMap<String, BlacklistEntry>>,
}

impl HashSetTokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, token: &str) -> Option<BlacklistEntry> {
        self.entries.get(token).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries blacklisted before `cutoff`; returns how many went.
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.blacklisted_at >= cutoff);
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait::async_trait]
impl TokenBlacklist for HashSetTokenBlacklist {
    async fn add(&self, token: &str) -> Result<(), TokenBlacklistError> {
        self.entries
            .entry(token.to_string())
            .or_insert_with(|| BlacklistEntry {
                token: token.to_string(),
                blacklisted_at: Utc::now(),
            });
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, TokenBlacklistError> {
        Ok(self.entries.contains_key(token))
    }
}
