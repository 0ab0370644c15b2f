use chrono::{DateTime, Datelike, Utc};

/// Calendar period over `updated_at` that narrows the set of scores being ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    AllTime,
    Year(i32),
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match *self {
            Self::AllTime => true,
            Self::Year(year) => at.year() == year,
            Self::Month { year, month } => at.year() == year && at.month() == month,
        }
    }

    pub fn current_month(now: DateTime<Utc>) -> Self {
        Self::Month {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        match *self {
            Self::AllTime => None,
            Self::Year(year) | Self::Month { year, .. } => Some(year),
        }
    }

    pub fn month(&self) -> Option<u32> {
        match *self {
            Self::Month { month, .. } => Some(month),
            _ => None,
        }
    }
}

/// Position range inside a ranking-ordered sequence. `limit: None` reads to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub offset: u64,
    pub limit: Option<u64>,
}

impl Slice {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

/// What a score scan reads: which period, and which slice of its ranking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreScan {
    pub period: Period,
    pub slice: Slice,
}

impl ScoreScan {
    pub fn new(period: Period, slice: Slice) -> Self {
        Self { period, slice }
    }
}
