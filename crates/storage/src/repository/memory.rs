use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Period, Player, PlayerScore, ScoreScan};
use crate::store::ScoreStore;

/// Process-local [`ScoreStore`] keyed by player name.
///
/// Each upsert runs under the write lock, so per-player updates are atomic. Nothing
/// survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryScoreStore {
    scores: Arc<RwLock<HashMap<String, PlayerScore>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.read().is_empty()
    }
}

#[async_trait::async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn upsert_score(
        &self,
        name: &str,
        score: i64,
        at: DateTime<Utc>,
    ) -> Result<PlayerScore> {
        if score < 0 {
            return Err(StorageError::ConstraintViolation(
                "score must be non-negative".to_string(),
            ));
        }

        let mut scores = self.scores.write();
        let record = scores
            .entry(name.to_string())
            .and_modify(|record| record.apply_submission(score, at))
            .or_insert_with(|| {
                let player = Player::new(name, at);
                PlayerScore {
                    score_id: Uuid::new_v4(),
                    player_id: player.player_id,
                    name: player.name,
                    player_created_at: player.created_at,
                    score,
                    updated_at: at,
                }
            });

        Ok(record.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<PlayerScore> {
        self.scores
            .read()
            .get(name)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn scan_scores(&self, scan: &ScoreScan) -> Result<Vec<PlayerScore>> {
        let mut records: Vec<PlayerScore> = self
            .scores
            .read()
            .values()
            .filter(|record| scan.period.contains(record.updated_at))
            .cloned()
            .collect();

        records.sort_by(PlayerScore::ranking_cmp);

        let offset = usize::try_from(scan.slice.offset).unwrap_or(usize::MAX);
        let limit = scan
            .slice
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_ahead(&self, record: &PlayerScore, period: &Period) -> Result<u64> {
        let ahead = self
            .scores
            .read()
            .values()
            .filter(|other| period.contains(other.updated_at))
            .filter(|other| other.ranking_cmp(record).is_lt())
            .count();

        Ok(ahead as u64)
    }
}
