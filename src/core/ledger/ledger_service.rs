// This is the ledger module - it owns the XP bookkeeping for guild members.
// Like the rest of core/, it has NO Discord-specific code (no serenity, no poise imports).
// Everything is keyed by primitive u64 ids so the Discord layer only has to unwrap them.

use async_trait::async_trait;
use thiserror::Error;

/// XP granted for every qualifying (non-bot, in-guild) message.
pub const XP_PER_MESSAGE: u64 = 5;

/// Level a member starts at. Levels are never recomputed from XP.
pub const STARTING_LEVEL: u32 = 1;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A member's accumulated standing within one guild.
///
/// The pair `(guild_id, user_id)` is the identity: a member in two guilds has
/// two independent entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub guild_id: u64,
    pub user_id: u64,
    /// Only ever incremented.
    pub experience_points: u64,
    /// Set to `STARTING_LEVEL` on creation and left alone afterwards.
    pub level: u32,
}

impl LedgerEntry {
    /// A brand new entry, before any XP has been credited.
    pub fn new(guild_id: u64, user_id: u64) -> Self {
        Self {
            guild_id,
            user_id,
            experience_points: 0,
            level: STARTING_LEVEL,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid user or guild ID")]
    InvalidId,
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting ledger entries.
///
/// Implementations must make `increment` atomic per key: two concurrent calls for
/// the same `(guild_id, user_id)` both land.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create the entry if it is missing, then add `amount` to its XP.
    /// Returns the entry as it is after the write.
    async fn increment(
        &self,
        guild_id: u64,
        user_id: u64,
        amount: u64,
    ) -> Result<LedgerEntry, LedgerError>;

    /// Look up an entry. `None` means the member never earned XP in this guild.
    async fn get_entry(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<LedgerEntry>, LedgerError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// The service the Discord layer talks to.
///
/// Generic over the store so tests can run against `InMemoryLedgerStore` while
/// production uses SQLite.
pub struct LedgerService<S: LedgerStore> {
    store: S,
    xp_per_message: u64,
}

impl<S: LedgerStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            xp_per_message: XP_PER_MESSAGE,
        }
    }

    fn validate_ids(guild_id: u64, user_id: u64) -> Result<(), LedgerError> {
        if guild_id == 0 || user_id == 0 {
            Err(LedgerError::InvalidId)
        } else {
            Ok(())
        }
    }

    /// Credit one qualifying message to a member.
    ///
    /// The write is committed before this returns. Callers should log and drop
    /// errors rather than fail the whole event.
    pub async fn record_activity(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<LedgerEntry, LedgerError> {
        Self::validate_ids(guild_id, user_id)?;

        let entry = self
            .store
            .increment(guild_id, user_id, self.xp_per_message)
            .await?;

        tracing::debug!(
            guild_id,
            user_id,
            xp = entry.experience_points,
            "Recorded member activity"
        );

        Ok(entry)
    }

    /// Read-only lookup used by `$rank`.
    pub async fn get_entry(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        Self::validate_ids(guild_id, user_id)?;
        self.store.get_entry(guild_id, user_id).await
    }
}

/// Whether a message should count towards the ledger at all.
///
/// Bots never earn XP and direct messages have no guild to credit.
pub fn should_record(author_is_bot: bool, guild_id: Option<u64>) -> Option<u64> {
    if author_is_bot {
        return None;
    }
    guild_id
}

/// The `$rank` reply body.
pub fn format_rank(member_name: &str, entry: &LedgerEntry) -> String {
    format!(
        "📊 {} | Level {} | XP {}",
        member_name, entry.level, entry.experience_points
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::ledger::InMemoryLedgerStore;
    use std::sync::Arc;

    fn make_service() -> LedgerService<InMemoryLedgerStore> {
        LedgerService::new(InMemoryLedgerStore::new())
    }

    #[tokio::test]
    async fn first_message_creates_entry_with_five_xp() {
        let service = make_service();

        assert_eq!(service.get_entry(10, 20).await.unwrap(), None);

        service.record_activity(10, 20).await.unwrap();

        let entry = service.get_entry(10, 20).await.unwrap().unwrap();
        assert_eq!(entry.experience_points, 5);
        assert_eq!(entry.level, 1);
    }

    #[tokio::test]
    async fn repeated_messages_accumulate_linearly() {
        let service = make_service();

        for _ in 0..7 {
            service.record_activity(10, 20).await.unwrap();
        }

        let entry = service.get_entry(10, 20).await.unwrap().unwrap();
        assert_eq!(entry.experience_points, 35);
        // Level is never derived from XP.
        assert_eq!(entry.level, STARTING_LEVEL);
    }

    #[tokio::test]
    async fn interleaved_members_do_not_affect_each_other() {
        let service = Arc::new(make_service());

        let mut handles = Vec::new();
        for user_id in 1..=4u64 {
            for _ in 0..25 {
                let service = Arc::clone(&service);
                handles.push(tokio::spawn(async move {
                    service.record_activity(99, user_id).await.unwrap();
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for user_id in 1..=4u64 {
            let entry = service.get_entry(99, user_id).await.unwrap().unwrap();
            assert_eq!(entry.experience_points, 125);
        }
    }

    #[tokio::test]
    async fn entries_are_scoped_per_guild() {
        let service = make_service();

        service.record_activity(1, 42).await.unwrap();
        service.record_activity(1, 42).await.unwrap();
        service.record_activity(2, 42).await.unwrap();

        let first = service.get_entry(1, 42).await.unwrap().unwrap();
        let second = service.get_entry(2, 42).await.unwrap().unwrap();
        assert_eq!(first.experience_points, 10);
        assert_eq!(second.experience_points, 5);
    }

    #[tokio::test]
    async fn zero_ids_are_rejected() {
        let service = make_service();

        assert!(matches!(
            service.record_activity(0, 5).await,
            Err(LedgerError::InvalidId)
        ));
        assert!(matches!(
            service.get_entry(5, 0).await,
            Err(LedgerError::InvalidId)
        ));
    }

    #[test]
    fn bot_messages_never_qualify() {
        assert_eq!(should_record(true, Some(7)), None);
        assert_eq!(should_record(false, None), None);
        assert_eq!(should_record(false, Some(7)), Some(7));
    }

    #[tokio::test]
    async fn rank_after_three_messages() {
        let service = make_service();
        for _ in 0..3 {
            service.record_activity(3, 4).await.unwrap();
        }

        let entry = service.get_entry(3, 4).await.unwrap().unwrap();
        let reply = format_rank("someone", &entry);
        assert!(reply.contains("Level 1"));
        assert!(reply.contains("XP 15"));
    }

    #[test]
    fn ledger_error_messages_are_descriptive() {
        let storage_error = LedgerError::Storage("disk full".into());
        assert!(storage_error.to_string().contains("disk full"));
        assert_eq!(LedgerError::InvalidId.to_string(), "Invalid user or guild ID");
    }
}
