use chrono::{DateTime, Datelike, Utc};

use crate::dto::common::PageRequest;
use crate::dto::leaderboard::RankedEntry;
use crate::models::Period;
use crate::store::ScoreStore;

use super::ranking::rank_slice;
use super::{LeaderboardError, Result};

/// One page of a ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub entries: Vec<RankedEntry>,
    pub next_page: Option<u32>,
}

impl Page {
    /// Cuts the `limit + 1` fetched entries down to the page, remembering whether the
    /// extra entry was there.
    pub fn from_fetched(mut entries: Vec<RankedEntry>, request: &PageRequest) -> Self {
        let limit = request.limit() as usize;
        let next_page = if entries.len() > limit {
            entries.truncate(limit);
            request.page().checked_add(1)
        } else {
            None
        };

        Self { entries, next_page }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Worst rank shown on the page.
    pub fn last_rank(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.rank)
    }
}

/// Works out which period a listing ranks over.
///
/// Without `all_time` the listing is monthly: a missing month or year is the current
/// one. With `all_time` only the filters actually supplied apply, and a month without a
/// year means the current year. A month outside 1-12 drops the month filter either way.
pub fn resolve_period(
    month: Option<i64>,
    year: Option<i64>,
    all_time: bool,
    now: DateTime<Utc>,
) -> Period {
    let year = year
        .filter(|year| *year > 0)
        .and_then(|year| i32::try_from(year).ok());
    let month = month.map(|month| {
        (1..=12)
            .contains(&month)
            .then_some(month as u32)
    });

    match (all_time, month) {
        (false, None) => year.map_or_else(
            || Period::current_month(now),
            |year| Period::Month {
                year,
                month: now.month(),
            },
        ),
        (_, Some(Some(month))) => Period::Month {
            year: year.unwrap_or_else(|| now.year()),
            month,
        },
        (false, Some(None)) => Period::Year(year.unwrap_or_else(|| now.year())),
        (true, _) => year.map_or(Period::AllTime, Period::Year),
    }
}

/// Fetches and ranks one page of `period`.
///
/// An empty first page is a valid result. An empty page after that means the caller
/// asked past the end.
pub async fn paginate(
    store: &dyn ScoreStore,
    period: Period,
    request: &PageRequest,
) -> Result<Page> {
    let fetched = rank_slice(store, period, request.fetch_slice()).await?;

    if fetched.is_empty() && request.page() > 1 {
        return Err(LeaderboardError::PageOutOfRange(request.page()));
    }

    Ok(Page::from_fetched(fetched, request))
}
