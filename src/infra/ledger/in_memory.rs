// In-memory implementation of LedgerStore, used by the tests.
//
// The bot itself always runs on SQLite; nothing here survives a restart.

use crate::core::ledger::{LedgerEntry, LedgerError, LedgerStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// Composite key: users can be in multiple guilds.
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
struct GuildUserKey {
    guild_id: u64,
    user_id: u64,
}

/// DashMap shards its locks, so the entry API gives us a per-key critical
/// section without wrapping the whole map in a Mutex.
#[allow(dead_code)]
pub struct InMemoryLedgerStore {
    entries: DashMap<GuildUserKey, LedgerEntry>,
}

#[allow(dead_code)]
impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn increment(
        &self,
        guild_id: u64,
        user_id: u64,
        amount: u64,
    ) -> Result<LedgerEntry, LedgerError> {
        let key = GuildUserKey { guild_id, user_id };

        let mut entry = self
            .entries
            .entry(key)
            .or_insert_with(|| LedgerEntry::new(guild_id, user_id));
        entry.experience_points = entry.experience_points.saturating_add(amount);

        Ok(*entry)
    }

    async fn get_entry(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        let key = GuildUserKey { guild_id, user_id };
        Ok(self.entries.get(&key).map(|entry| *entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryLedgerStore::new();

        assert!(store.get_entry(456, 123).await.unwrap().is_none());

        let entry = store.increment(456, 123, 5).await.unwrap();
        assert_eq!(entry.experience_points, 5);
        assert_eq!(entry.level, 1);

        let entry = store.increment(456, 123, 5).await.unwrap();
        assert_eq!(entry.experience_points, 10);

        let stored = store.get_entry(456, 123).await.unwrap().unwrap();
        assert_eq!(stored, entry);
    }

    #[tokio::test]
    async fn increment_saturates_instead_of_wrapping() {
        let store = InMemoryLedgerStore::new();

        store.increment(1, 1, u64::MAX - 1).await.unwrap();
        let entry = store.increment(1, 1, 5).await.unwrap();

        assert_eq!(entry.experience_points, u64::MAX);
    }
}
