use crate::dto::leaderboard::RankedEntry;
use crate::error::StorageError;
use crate::models::{Period, PlayerScore, ScoreScan, Slice};
use crate::store::ScoreStore;

use super::{LeaderboardError, Result};

/// Inclusive range of ranks, always starting at rank 1 or later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    from: u64,
    to: u64,
}

impl RankRange {
    pub fn new(from: u64, to: u64) -> Self {
        let from = from.max(1);
        Self {
            from,
            to: to.max(from),
        }
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    fn slice(&self) -> Slice {
        Slice::new(self.from - 1, self.to - self.from + 1)
    }
}

/// A player's record together with its rank in some period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStanding {
    pub record: PlayerScore,
    pub rank: u64,
}

impl From<PlayerStanding> for RankedEntry {
    fn from(standing: PlayerStanding) -> Self {
        Self {
            name: standing.record.name,
            score: standing.record.score,
            rank: standing.rank,
        }
    }
}

/// Numbers an already ranking-ordered sequence sequentially from `first_rank`.
pub fn assign_ranks(records: Vec<PlayerScore>, first_rank: u64) -> Vec<RankedEntry> {
    records
        .into_iter()
        .zip(first_rank..)
        .map(|(record, rank)| RankedEntry {
            name: record.name,
            score: record.score,
            rank,
        })
        .collect()
}

/// Ranks within `period`, returning only the entries covered by `slice`.
pub async fn rank_slice(
    store: &dyn ScoreStore,
    period: Period,
    slice: Slice,
) -> Result<Vec<RankedEntry>> {
    let records = store.scan_scores(&ScoreScan::new(period, slice)).await?;
    Ok(assign_ranks(records, slice.offset + 1))
}

/// Ranks the whole of `period` and keeps the entries whose rank is in `range`.
pub async fn rank_range(
    store: &dyn ScoreStore,
    period: Period,
    range: RankRange,
) -> Result<Vec<RankedEntry>> {
    rank_slice(store, period, range.slice()).await
}

pub async fn rank_of(store: &dyn ScoreStore, record: &PlayerScore, period: &Period) -> Result<u64> {
    Ok(store.count_ahead(record, period).await? + 1)
}

/// Looks up a player and ranks them within `period`.
///
/// A player with no score inside `period` is reported as not found.
pub async fn rank_player(
    store: &dyn ScoreStore,
    name: &str,
    period: &Period,
) -> Result<PlayerStanding> {
    let record = store.find_by_name(name).await.map_err(|e| match e {
        StorageError::NotFound => LeaderboardError::PlayerNotFound(name.to_string()),
        e => e.into(),
    })?;

    if !period.contains(record.updated_at) {
        return Err(LeaderboardError::PlayerNotFound(name.to_string()));
    }

    let rank = rank_of(store, &record, period).await?;

    Ok(PlayerStanding { record, rank })
}
