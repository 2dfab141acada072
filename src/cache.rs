//! Per-user transaction-history cache.
//!
//! Services receive the cache as an injected port so the backend can be
//! swapped: Redis in production, in-memory in tests. All implementations fail
//! open — a cache backend error degrades to a store read, never a request
//! failure. Mutating operations invalidate synchronously; the TTL only bounds
//! staleness for keys nothing has written to.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::Transaction;
use crate::domain::TransactionKind;

fn history_key(kind: TransactionKind, user_id: Uuid) -> String {
    format!("trans:{}:{}", kind.as_str(), user_id)
}

#[async_trait]
pub trait HistoryCache: Send + Sync {
    async fn get(&self, kind: TransactionKind, user_id: Uuid) -> Option<Vec<Transaction>>;

    async fn set(&self, kind: TransactionKind, user_id: Uuid, rows: &[Transaction]);

    /// Drops both history legs for every given user.
    async fn invalidate(&self, user_ids: &[Uuid]);
}

// --- Redis implementation ---

pub struct RedisHistoryCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisHistoryCache {
    pub fn new(redis_url: &str, ttl_secs: u64) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            ttl_secs,
        })
    }

    async fn fetch(&self, key: &str) -> anyhow::Result<Option<Vec<Transaction>>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key).await?;

        match cached {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, key: &str, rows: &[Transaction]) -> anyhow::Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(rows)?;
        let _: () = conn.set_ex(key, payload, self.ttl_secs).await?;
        Ok(())
    }

    async fn purge(&self, user_ids: &[Uuid]) -> anyhow::Result<()> {
        let keys: Vec<String> = user_ids
            .iter()
            .flat_map(|user_id| {
                [
                    history_key(TransactionKind::Lend, *user_id),
                    history_key(TransactionKind::Borrow, *user_id),
                ]
            })
            .collect();

        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(keys).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryCache for RedisHistoryCache {
    async fn get(&self, kind: TransactionKind, user_id: Uuid) -> Option<Vec<Transaction>> {
        match self.fetch(&history_key(kind, user_id)).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(error = %err, "history cache read failed");
                None
            }
        }
    }

    async fn set(&self, kind: TransactionKind, user_id: Uuid, rows: &[Transaction]) {
        if let Err(err) = self.store(&history_key(kind, user_id), rows).await {
            tracing::warn!(error = %err, "history cache write failed");
        }
    }

    async fn invalidate(&self, user_ids: &[Uuid]) {
        if let Err(err) = self.purge(user_ids).await {
            tracing::warn!(error = %err, "history cache invalidation failed");
        }
    }
}

// --- In-memory implementation ---

pub struct InMemoryHistoryCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, Vec<Transaction>)>>,
}

impl InMemoryHistoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl HistoryCache for InMemoryHistoryCache {
    async fn get(&self, kind: TransactionKind, user_id: Uuid) -> Option<Vec<Transaction>> {
        let entries = self.entries.read().await;
        entries
            .get(&history_key(kind, user_id))
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, rows)| rows.clone())
    }

    async fn set(&self, kind: TransactionKind, user_id: Uuid, rows: &[Transaction]) {
        let mut entries = self.entries.write().await;
        entries.insert(history_key(kind, user_id), (Instant::now(), rows.to_vec()));
    }

    async fn invalidate(&self, user_ids: &[Uuid]) {
        let mut entries = self.entries.write().await;
        for user_id in user_ids {
            entries.remove(&history_key(TransactionKind::Lend, *user_id));
            entries.remove(&history_key(TransactionKind::Borrow, *user_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;
    use chrono::Utc;

    fn sample_rows() -> Vec<Transaction> {
        vec![Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            100.0,
            TransactionStatus::Unpaid,
            Utc::now(),
            None,
        )]
    }

    #[tokio::test]
    async fn round_trips_per_user_and_kind() {
        let cache = InMemoryHistoryCache::new(Duration::from_secs(60));
        let user = Uuid::new_v4();
        let rows = sample_rows();

        cache.set(TransactionKind::Lend, user, &rows).await;

        let hit = cache.get(TransactionKind::Lend, user).await.unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].id, rows[0].id);

        // The other leg and other users stay cold.
        assert!(cache.get(TransactionKind::Borrow, user).await.is_none());
        assert!(cache
            .get(TransactionKind::Lend, Uuid::new_v4())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn invalidate_drops_both_legs() {
        let cache = InMemoryHistoryCache::new(Duration::from_secs(60));
        let user = Uuid::new_v4();
        let rows = sample_rows();

        cache.set(TransactionKind::Lend, user, &rows).await;
        cache.set(TransactionKind::Borrow, user, &rows).await;
        cache.invalidate(&[user]).await;

        assert!(cache.get(TransactionKind::Lend, user).await.is_none());
        assert!(cache.get(TransactionKind::Borrow, user).await.is_none());
    }

    #[tokio::test]
    async fn expired_entries_miss() {
        let cache = InMemoryHistoryCache::new(Duration::ZERO);
        let user = Uuid::new_v4();

        cache.set(TransactionKind::Lend, user, &sample_rows()).await;

        assert!(cache.get(TransactionKind::Lend, user).await.is_none());
    }
}
