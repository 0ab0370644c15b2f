use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Period, PlayerScore, ScoreScan};

/// Durable mapping from player name to best score.
///
/// Implementations must apply [`ScoreStore::upsert_score`] atomically per player and
/// return scans in [`PlayerScore::ranking_cmp`] order.
#[async_trait::async_trait]
pub trait ScoreStore: Send + Sync {
    /// Creates the player on first submission, then keeps `max(current, score)` and
    /// sets `updated_at` to `at`.
    async fn upsert_score(&self, name: &str, score: i64, at: DateTime<Utc>)
    -> Result<PlayerScore>;

    async fn find_by_name(&self, name: &str) -> Result<PlayerScore>;

    async fn scan_scores(&self, scan: &ScoreScan) -> Result<Vec<PlayerScore>>;

    /// Number of records in `period` that rank ahead of `record`.
    async fn count_ahead(&self, record: &PlayerScore, period: &Period) -> Result<u64>;
}
