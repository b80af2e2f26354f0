//! Suggestion staggering: surface a bounded batch of a user's pending
//! suggestions per call, oldest first.

use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    consts::rules_const::SURFACE_BATCH_SIZE,
    errors::{Error, Result},
    models::suggestion::Suggestion,
    store::RecruitingStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(NonZeroUsize);

impl BatchSize {
    pub fn new(size: usize) -> Result<Self> {
        NonZeroUsize::new(size)
            .map(BatchSize)
            .ok_or(Error::InvalidBatchSize)
    }

    /// The batch used by the interactive and cron surfacing paths.
    pub fn standard() -> Self {
        Self(NonZeroUsize::new(SURFACE_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN))
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

/// Picks the ids to surface: pending rows only, oldest `created_at` first,
/// ties broken by id, at most `size` of them.
pub fn select_batch(rows: &[Suggestion], size: BatchSize) -> Vec<String> {
    let mut pending: Vec<&Suggestion> = rows.iter().filter(|s| s.is_pending()).collect();
    pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    pending
        .into_iter()
        .take(size.get())
        .map(|s| s.id.clone())
        .collect()
}

/// One read, one write. Returns how many rows were stamped.
pub async fn surface_pending(
    store: &dyn RecruitingStore,
    user_id: &str,
    size: BatchSize,
    now: DateTime<Utc>,
) -> Result<usize> {
    let pending = store.pending_suggestions(user_id).await?;
    let batch = select_batch(&pending, size);
    if batch.is_empty() {
        return Ok(0);
    }
    let surfaced = store.mark_surfaced(&batch, now).await?;
    debug!(user_id, requested = size.get(), surfaced, "surfaced suggestions");
    Ok(surfaced)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::store::{MemoryStore, memory::fixtures::suggestion};

    const USER: &str = "users:athlete";

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    async fn seeded(count: usize) -> (MemoryStore, Vec<String>) {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        // inserted newest first so ordering has to come from created_at
        for i in (0..count).rev() {
            let row = suggestion(USER, &format!("s{i}"), t0() + Duration::hours(i as i64));
            ids.push(row.id.clone());
            store.insert_suggestion(row).await;
        }
        ids.reverse();
        (store, ids)
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(BatchSize::new(0), Err(Error::InvalidBatchSize)));
        assert_eq!(BatchSize::standard().get(), 3);
    }

    #[test]
    fn select_batch_prefers_oldest_and_skips_surfaced() {
        let mut old = suggestion(USER, "old", t0());
        old.surfaced_at = Some(t0());
        let a = suggestion(USER, "a", t0() + Duration::minutes(5));
        let b = suggestion(USER, "b", t0() + Duration::minutes(1));
        let c = suggestion(USER, "c", t0() + Duration::minutes(9));

        let picked = select_batch(
            &[old, a.clone(), b.clone(), c],
            BatchSize::new(2).unwrap(),
        );
        assert_eq!(picked, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn batch_larger_than_pending_surfaces_everything() {
        let (store, _) = seeded(2).await;
        let now = t0() + Duration::days(1);

        let count = surface_pending(&store, USER, BatchSize::new(5).unwrap(), now)
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert!(store.pending_suggestions(USER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn smaller_batch_surfaces_exactly_n_oldest() {
        let (store, ids) = seeded(5).await;
        let now = t0() + Duration::days(1);

        let count = surface_pending(&store, USER, BatchSize::standard(), now)
            .await
            .unwrap();
        assert_eq!(count, 3);

        let mut surfaced: Vec<String> = store
            .suggestions()
            .await
            .into_iter()
            .filter(|s| s.surfaced_at == Some(now))
            .map(|s| s.id)
            .collect();
        surfaced.sort();
        let mut oldest = ids[..3].to_vec();
        oldest.sort();
        assert_eq!(surfaced, oldest);
    }

    #[tokio::test]
    async fn resurfacing_after_full_surface_returns_zero() {
        let (store, _) = seeded(3).await;
        let size = BatchSize::standard();

        assert_eq!(surface_pending(&store, USER, size, t0()).await.unwrap(), 3);
        assert_eq!(surface_pending(&store, USER, size, t0()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn other_users_rows_are_untouched() {
        let store = MemoryStore::new();
        store
            .insert_suggestion(suggestion("users:someone-else", "x", t0()))
            .await;

        assert_eq!(
            surface_pending(&store, USER, BatchSize::standard(), t0())
                .await
                .unwrap(),
            0
        );
        assert_eq!(store.pending_suggestions("users:someone-else").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let (store, _) = seeded(1).await;
        store.set_fail_writes(true);
        let err = surface_pending(&store, USER, BatchSize::standard(), t0())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}
