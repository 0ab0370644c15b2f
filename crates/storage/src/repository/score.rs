use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Period, Player, PlayerScore, ScoreScan};
use crate::store::ScoreStore;

const SELECT_PLAYER_SCORES: &str = r#"
    SELECT
        ps.score_id,
        ps.player_id,
        p.name,
        p.created_at AS player_created_at,
        ps.score,
        ps.updated_at
    FROM player_scores ps
    INNER JOIN players p ON ps.player_id = p.player_id
    WHERE 1=1
"#;

const RANKING_ORDER: &str = " ORDER BY ps.score DESC, p.created_at ASC, p.player_id ASC";

#[derive(FromRow)]
struct ScoreRow {
    score_id: Uuid,
    score: i64,
    updated_at: DateTime<Utc>,
}

/// Postgres-backed [`ScoreStore`].
#[derive(Clone)]
pub struct ScoreRepository {
    pool: PgPool,
}

impl ScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_player(&self, name: &str) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT player_id, name, created_at
            FROM players
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(player)
    }

    /// Inserts a new player. A concurrent insert of the same name is reported as
    /// [`StorageError::Conflict`].
    pub async fn insert_player(&self, name: &str, at: DateTime<Utc>) -> Result<Player> {
        let player = Player::new(name, at);

        sqlx::query(
            r#"
            INSERT INTO players (player_id, name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(player.player_id)
        .bind(&player.name)
        .bind(player.created_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                StorageError::Conflict(format!("player '{}' was created concurrently", name))
            } else {
                e
            }
        })?;

        Ok(player)
    }

    async fn ensure_player(&self, name: &str, at: DateTime<Utc>) -> Result<Player> {
        if let Some(player) = self.find_player(name).await? {
            return Ok(player);
        }

        match self.insert_player(name, at).await {
            Ok(player) => Ok(player),
            Err(StorageError::Conflict(reason)) => {
                tracing::warn!(player = name, "Lost player creation race, re-reading player");
                self.find_player(name)
                    .await?
                    .ok_or(StorageError::Conflict(reason))
            }
            Err(e) => Err(e),
        }
    }

    async fn upsert_player_score(
        &self,
        player: Player,
        score: i64,
        at: DateTime<Utc>,
    ) -> Result<PlayerScore> {
        let row = sqlx::query_as::<_, ScoreRow>(
            r#"
            INSERT INTO player_scores (score_id, player_id, score, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (player_id)
            DO UPDATE SET
                score = GREATEST(player_scores.score, EXCLUDED.score),
                updated_at = EXCLUDED.updated_at
            RETURNING score_id, score, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(player.player_id)
        .bind(score)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from)
        .map_err(|e| {
            if e.is_check_violation() {
                StorageError::ConstraintViolation("score must be non-negative".to_string())
            } else {
                e
            }
        })?;

        Ok(PlayerScore {
            score_id: row.score_id,
            player_id: player.player_id,
            name: player.name,
            player_created_at: player.created_at,
            score: row.score,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl ScoreStore for ScoreRepository {
    async fn upsert_score(
        &self,
        name: &str,
        score: i64,
        at: DateTime<Utc>,
    ) -> Result<PlayerScore> {
        let player = self.ensure_player(name, at).await?;
        self.upsert_player_score(player, score, at).await
    }

    async fn find_by_name(&self, name: &str) -> Result<PlayerScore> {
        let mut query = QueryBuilder::new(SELECT_PLAYER_SCORES);
        query.push(" AND p.name = ");
        query.push_bind(name);

        let record = query
            .build_query_as::<PlayerScore>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    async fn scan_scores(&self, scan: &ScoreScan) -> Result<Vec<PlayerScore>> {
        let mut query = QueryBuilder::new(SELECT_PLAYER_SCORES);
        push_period(&mut query, &scan.period);
        query.push(RANKING_ORDER);

        if let Some(limit) = scan.slice.limit {
            query.push(" LIMIT ");
            query.push_bind(to_sql_count(limit));
        }
        query.push(" OFFSET ");
        query.push_bind(to_sql_count(scan.slice.offset));

        let records = query
            .build_query_as::<PlayerScore>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn count_ahead(&self, record: &PlayerScore, period: &Period) -> Result<u64> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM player_scores ps
            INNER JOIN players p ON ps.player_id = p.player_id
            WHERE 1=1
            "#,
        );
        push_period(&mut query, period);

        query.push(" AND (ps.score > ");
        query.push_bind(record.score);
        query.push(" OR (ps.score = ");
        query.push_bind(record.score);
        query.push(" AND (p.created_at, p.player_id) < (");
        query.push_bind(record.player_created_at);
        query.push(", ");
        query.push_bind(record.player_id);
        query.push(")))");

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}

fn push_period(query: &mut QueryBuilder<'_, Postgres>, period: &Period) {
    if let Some(year) = period.year() {
        query.push(" AND EXTRACT(YEAR FROM ps.updated_at AT TIME ZONE 'UTC')::int = ");
        query.push_bind(year);
    }

    if let Some(month) = period.month() {
        query.push(" AND EXTRACT(MONTH FROM ps.updated_at AT TIME ZONE 'UTC')::int = ");
        query.push_bind(month as i32);
    }
}

fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::models::Slice;
    use chrono::{Duration, TimeZone};

    async fn repository() -> ScoreRepository {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();
        db.scores()
    }

    fn unique_name(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }

    #[tokio::test]
    #[ignore] // Only run when Postgres is running
    async fn test_upsert_keeps_best_score_and_latest_time() {
        let repo = repository().await;
        let name = unique_name("ada");
        let first = Utc::now();
        let second = first + Duration::seconds(5);

        repo.upsert_score(&name, 50, first).await.unwrap();
        let stored = repo.upsert_score(&name, 30, second).await.unwrap();

        assert_eq!(stored.score, 50);
        assert_eq!(
            stored.updated_at.timestamp_micros(),
            second.timestamp_micros()
        );

        let found = repo.find_by_name(&name).await.unwrap();
        assert_eq!(found.score, 50);
        assert_eq!(found.player_id, stored.player_id);
    }

    #[tokio::test]
    #[ignore] // Only run when Postgres is running
    async fn test_concurrent_first_submissions_create_one_player() {
        let repo = repository().await;
        let name = unique_name("racer");

        let handles: Vec<_> = (0..8i64)
            .map(|score| {
                let repo = repo.clone();
                let name = name.clone();
                tokio::spawn(async move { repo.upsert_score(&name, score * 10, Utc::now()).await })
            })
            .collect();

        let mut player_ids = Vec::new();
        for handle in handles {
            let record = handle.await.unwrap().unwrap();
            player_ids.push(record.player_id);
        }
        player_ids.dedup();

        assert_eq!(player_ids.len(), 1);
        assert_eq!(repo.find_by_name(&name).await.unwrap().score, 70);
    }

    #[tokio::test]
    #[ignore] // Only run when Postgres is running
    async fn test_count_ahead_matches_scan_position() {
        let repo = repository().await;
        let at = Utc.with_ymd_and_hms(1999, 2, 10, 12, 0, 0).unwrap();
        let name = unique_name("counted");
        let record = repo.upsert_score(&name, 1_000, at).await.unwrap();
        let period = Period::Month {
            year: 1999,
            month: 2,
        };

        let ahead = repo.count_ahead(&record, &period).await.unwrap();
        let scan = repo
            .scan_scores(&ScoreScan::new(period, Slice::all()))
            .await
            .unwrap();
        let position = scan
            .iter()
            .position(|r| r.player_id == record.player_id)
            .unwrap();

        assert_eq!(ahead as usize, position);
    }

    #[tokio::test]
    #[ignore] // Only run when Postgres is running
    async fn test_find_unknown_player_is_not_found() {
        let repo = repository().await;
        let result = repo.find_by_name(&unique_name("ghost")).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }
}
