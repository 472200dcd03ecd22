use crate::core::ledger::{LedgerEntry, LedgerError, LedgerStore, STARTING_LEVEL};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::str::FromStr;

pub struct SqliteLedgerStore {
    pool: Pool<Sqlite>,
}

impl SqliteLedgerStore {
    /// Open (or create) the ledger database.
    ///
    /// Accepts either a plain file path or a `sqlite:` URL.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            if let Some(parent) = Path::new(database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            format!("sqlite://{}", database_url)
        };

        let options = SqliteConnectOptions::from_str(&conn_str)?.create_if_missing(true);

        // SQLite only allows one writer at a time anyway. A single pooled
        // connection serializes increments to the same key and keeps
        // `sqlite::memory:` pointing at one database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        // Column names match the levels.db files the bot has always written.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                guild_id INTEGER,
                user_id INTEGER,
                xp INTEGER,
                level INTEGER,
                PRIMARY KEY (guild_id, user_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn increment(
        &self,
        guild_id: u64,
        user_id: u64,
        amount: u64,
    ) -> Result<LedgerEntry, LedgerError> {
        // One upsert statement: create-if-missing and increment happen atomically.
        let row = sqlx::query(
            r#"
            INSERT INTO users (guild_id, user_id, xp, level)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(guild_id, user_id) DO UPDATE SET
            xp = COALESCE(xp, 0) + excluded.xp
            RETURNING guild_id, user_id, xp, level
            "#,
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .bind(amount as i64)
        .bind(STARTING_LEVEL as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(e.to_string()))?;

        row_to_entry(&row)
    }

    async fn get_entry(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        let row = sqlx::query(
            "SELECT guild_id, user_id, xp, level FROM users WHERE guild_id = ? AND user_id = ?",
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(e.to_string()))?;

        row.as_ref().map(row_to_entry).transpose()
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<LedgerEntry, LedgerError> {
    // Rows written by older versions may carry NULLs, treat them as fresh values.
    let xp: Option<i64> = row
        .try_get("xp")
        .map_err(|e| LedgerError::Storage(e.to_string()))?;
    let level: Option<i64> = row
        .try_get("level")
        .map_err(|e| LedgerError::Storage(e.to_string()))?;

    Ok(LedgerEntry {
        guild_id: row.get::<i64, _>("guild_id") as u64,
        user_id: row.get::<i64, _>("user_id") as u64,
        experience_points: xp.unwrap_or(0).max(0) as u64,
        level: level.map(|l| l as u32).unwrap_or(STARTING_LEVEL),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn temp_store() -> (tempfile::TempDir, SqliteLedgerStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.db");
        let store = SqliteLedgerStore::new(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn missing_entry_is_none() {
        let (_dir, store) = temp_store().await;
        assert!(store.get_entry(1, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn increment_creates_then_accumulates() {
        let (_dir, store) = temp_store().await;

        let first = store.increment(1, 2, 5).await.unwrap();
        assert_eq!(first.experience_points, 5);
        assert_eq!(first.level, 1);

        let second = store.increment(1, 2, 5).await.unwrap();
        assert_eq!(second.experience_points, 10);

        let stored = store.get_entry(1, 2).await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("levels.db");
        let path = path.to_str().unwrap().to_string();

        {
            let store = SqliteLedgerStore::new(&path).await.unwrap();
            store.increment(7, 8, 5).await.unwrap();
            store.increment(7, 8, 5).await.unwrap();
        }

        let reopened = SqliteLedgerStore::new(&path).await.unwrap();
        let entry = reopened.get_entry(7, 8).await.unwrap().unwrap();
        assert_eq!(entry.experience_points, 10);
    }

    #[tokio::test]
    async fn concurrent_increments_all_land() {
        let (_dir, store) = temp_store().await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for user_id in [1u64, 2] {
            for _ in 0..20 {
                let store = Arc::clone(&store);
                handles.push(tokio::spawn(async move {
                    store.increment(50, user_id, 5).await.unwrap();
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for user_id in [1u64, 2] {
            let entry = store.get_entry(50, user_id).await.unwrap().unwrap();
            assert_eq!(entry.experience_points, 100);
        }
    }

    #[tokio::test]
    async fn in_memory_url_is_supported() {
        let store = SqliteLedgerStore::new("sqlite::memory:").await.unwrap();
        store.increment(3, 3, 5).await.unwrap();
        let entry = store.get_entry(3, 3).await.unwrap().unwrap();
        assert_eq!(entry.experience_points, 5);
    }

    #[tokio::test]
    async fn legacy_rows_with_nulls_read_as_defaults() {
        let (_dir, store) = temp_store().await;
        sqlx::query("INSERT INTO users (guild_id, user_id, xp, level) VALUES (9, 9, NULL, NULL)")
            .execute(&store.pool)
            .await
            .unwrap();

        let entry = store.get_entry(9, 9).await.unwrap().unwrap();
        assert_eq!(entry.experience_points, 0);
        assert_eq!(entry.level, 1);
    }
}
