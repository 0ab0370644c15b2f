use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A player's best score joined with the player it belongs to.
///
/// There is at most one record per player. Ranks are not part of the record; they are
/// derived from its position in [`PlayerScore::ranking_cmp`] order at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlayerScore {
    pub score_id: Uuid,
    pub player_id: Uuid,
    pub name: String,
    pub player_created_at: DateTime<Utc>,
    pub score: i64,
    pub updated_at: DateTime<Utc>,
}

impl PlayerScore {
    /// Total order used for ranking: score descending, then the player who registered
    /// first, then player id. Must match `ORDER BY` in the Postgres repository.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.player_created_at.cmp(&other.player_created_at))
            .then_with(|| self.player_id.cmp(&other.player_id))
    }

    /// Applies a submission with the upsert-with-max rule.
    ///
    /// The timestamp is refreshed even when the submitted score is lower.
    pub fn apply_submission(&mut self, score: i64, at: DateTime<Utc>) {
        self.score = self.score.max(score);
        self.updated_at = at;
    }
}
