use crate::dto::leaderboard::RankedEntry;
use crate::error::StorageError;
use crate::models::Period;
use crate::store::ScoreStore;

use super::pagination::Page;
use super::ranking::{RankRange, rank_of, rank_range};
use super::{LeaderboardError, Result};

/// Ranks shown on each side of the player.
pub const AROUND_ME_RADIUS: u64 = 2;

/// `[rank - 2, rank + 2]`, clamped at rank 1.
pub fn neighbourhood(rank: u64) -> RankRange {
    RankRange::new(
        rank.saturating_sub(AROUND_ME_RADIUS),
        rank.saturating_add(AROUND_ME_RADIUS),
    )
}

/// Without a following page the player is assumed to be visible already.
pub fn should_look_around(name: Option<&str>, page: &Page) -> bool {
    name.is_some_and(|name| !name.is_empty()) && page.has_next_page()
}

/// Builds the neighbourhood of `name` within `period` to show next to `page`.
///
/// `page` must be a page of the same `period`, so that ranks compare. Returns `None`
/// when no lookup is needed, the player already ranks within the page, or the player
/// has no score inside `period`. An unknown player is an error.
pub async fn around_me(
    store: &dyn ScoreStore,
    period: Period,
    name: Option<&str>,
    page: &Page,
) -> Result<Option<Vec<RankedEntry>>> {
    if !should_look_around(name, page) {
        return Ok(None);
    }
    let Some(name) = name else {
        return Ok(None);
    };

    let record = store.find_by_name(name).await.map_err(|e| match e {
        StorageError::NotFound => LeaderboardError::PlayerNotFound(name.to_string()),
        e => e.into(),
    })?;

    if !period.contains(record.updated_at) {
        tracing::debug!(player = name, ?period, "Player has no score in the listed period");
        return Ok(None);
    }

    let rank = rank_of(store, &record, &period).await?;

    match page.last_rank() {
        Some(last_rank) if rank > last_rank => {
            let entries = rank_range(store, period, neighbourhood(rank)).await?;
            tracing::debug!(
                player = name,
                rank,
                entries = entries.len(),
                "Built around-me neighbourhood"
            );
            Ok(Some(entries))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::common::PageRequest;
    use crate::repository::memory::InMemoryScoreStore;
    use crate::services::LeaderboardError;
    use crate::services::pagination::paginate;
    use chrono::{DateTime, TimeZone, Utc};

    async fn ladder(size: i64) -> InMemoryScoreStore {
        let store = InMemoryScoreStore::new();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for i in 1..=size {
            store
                .upsert_score(&format!("p{}", i), 1000 - i, now)
                .await
                .unwrap();
        }
        store
    }

    #[test]
    fn test_neighbourhood_is_five_wide() {
        let range = neighbourhood(10);
        assert_eq!((range.from(), range.to()), (8, 12));
    }

    #[test]
    fn test_neighbourhood_is_clamped_at_first_rank() {
        assert_eq!(neighbourhood(1).from(), 1);
        assert_eq!(neighbourhood(2).from(), 1);
        assert_eq!(neighbourhood(3).from(), 1);
        assert_eq!(neighbourhood(4).from(), 2);
        assert_eq!(neighbourhood(2).to(), 4);
    }

    #[tokio::test]
    async fn test_player_below_the_page_gets_a_neighbourhood() {
        let store = ladder(20).await;
        let page = paginate(&store, Period::AllTime, &PageRequest::new(Some(1), Some(5)))
            .await
            .unwrap();

        let entries = around_me(&store, Period::AllTime, Some("p10"), &page)
            .await
            .unwrap()
            .unwrap();

        let ranks: Vec<u64> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![8, 9, 10, 11, 12]);
        assert_eq!(entries[2].name, "p10");
    }

    #[tokio::test]
    async fn test_neighbourhood_is_truncated_at_the_bottom() {
        let store = ladder(12).await;
        let page = paginate(&store, Period::AllTime, &PageRequest::new(Some(1), Some(5)))
            .await
            .unwrap();

        let entries = around_me(&store, Period::AllTime, Some("p12"), &page)
            .await
            .unwrap()
            .unwrap();

        let ranks: Vec<u64> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn test_player_on_the_page_needs_no_neighbourhood() {
        let store = ladder(20).await;
        let page = paginate(&store, Period::AllTime, &PageRequest::new(Some(1), Some(5)))
            .await
            .unwrap();

        assert_eq!(
            around_me(&store, Period::AllTime, Some("p3"), &page).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_player_above_a_later_page_needs_no_neighbourhood() {
        let store = ladder(20).await;
        let page = paginate(&store, Period::AllTime, &PageRequest::new(Some(2), Some(5)))
            .await
            .unwrap();

        assert_eq!(
            around_me(&store, Period::AllTime, Some("p1"), &page).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_last_page_skips_the_lookup() {
        let store = ladder(6).await;
        let page = paginate(&store, Period::AllTime, &PageRequest::new(Some(2), Some(5)))
            .await
            .unwrap();
        assert!(!page.has_next_page());

        // not even an unknown player is looked up
        assert_eq!(
            around_me(&store, Period::AllTime, Some("nobody"), &page).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_unknown_player_is_reported() {
        let store = ladder(20).await;
        let page = paginate(&store, Period::AllTime, &PageRequest::new(Some(1), Some(5)))
            .await
            .unwrap();

        let result = around_me(&store, Period::AllTime, Some("nobody"), &page).await;

        assert!(matches!(result, Err(LeaderboardError::PlayerNotFound(_))));
    }

    #[tokio::test]
    async fn test_no_name_no_lookup() {
        let store = ladder(20).await;
        let page = paginate(&store, Period::AllTime, &PageRequest::new(Some(1), Some(5)))
            .await
            .unwrap();

        assert_eq!(
            around_me(&store, Period::AllTime, None, &page).await.unwrap(),
            None
        );
        assert_eq!(
            around_me(&store, Period::AllTime, Some(""), &page).await.unwrap(),
            None
        );
    }

    fn june() -> Period {
        Period::Month {
            year: 2024,
            month: 6,
        }
    }

    /// Ten January scores that outrank three June ones.
    async fn january_and_june() -> InMemoryScoreStore {
        let store = InMemoryScoreStore::new();
        let january: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let june: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        for i in 1..=10 {
            store
                .upsert_score(&format!("old{}", i), 100 - i, january)
                .await
                .unwrap();
        }
        for (name, score) in [("fresh1", 5), ("fresh2", 4), ("fresh3", 3)] {
            store.upsert_score(name, score, june).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_player_visible_in_a_monthly_page_needs_no_neighbourhood() {
        let store = january_and_june().await;
        let page = paginate(&store, june(), &PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert!(page.has_next_page());
        assert_eq!(page.entries[0].name, "fresh1");

        assert_eq!(
            around_me(&store, june(), Some("fresh1"), &page).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_monthly_neighbourhood_uses_monthly_ranks() {
        let store = january_and_june().await;
        let page = paginate(&store, june(), &PageRequest::new(Some(1), Some(1)))
            .await
            .unwrap();

        let entries = around_me(&store, june(), Some("fresh3"), &page)
            .await
            .unwrap()
            .unwrap();

        let ranked: Vec<(&str, u64)> = entries.iter().map(|e| (e.name.as_str(), e.rank)).collect();
        assert_eq!(ranked, vec![("fresh1", 1), ("fresh2", 2), ("fresh3", 3)]);
    }

    #[tokio::test]
    async fn test_player_without_a_score_in_the_period_gets_nothing() {
        let store = january_and_june().await;
        let page = paginate(&store, june(), &PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();

        assert_eq!(
            around_me(&store, june(), Some("old10"), &page).await.unwrap(),
            None
        );
    }
}
