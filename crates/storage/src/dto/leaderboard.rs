use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::PageRequest;

/// Request payload for submitting a player's score
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitScoreRequest {
    #[validate(
        length(
            min = 1,
            max = 255,
            message = "Player name must be between 1 and 255 characters"
        ),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(range(min = 0, message = "Score must be a non-negative integer"))]
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitScoreResponse {
    pub rank: u64,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListScoresQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<i64>,
    /// Page size, defaults to 10, at most 100
    #[validate(range(max = 100, message = "Page size cannot exceed 100"))]
    pub limit: Option<i64>,
    /// Player to show an around-me neighbourhood for
    pub name: Option<String>,
    pub month: Option<i64>,
    pub year: Option<i64>,
    /// Rank over all scores instead of the current month
    pub all_time: Option<bool>,
}

impl ListScoresQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Name to build an around-me neighbourhood for, if one was given.
    pub fn around_me_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankedEntry {
    pub name: String,
    pub score: i64,
    pub rank: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub results: Vec<RankedEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub around_me: Option<Vec<RankedEntry>>,
    /// Next page number, 0 when this is the last page
    pub next_page: u32,
}

/// A single player's all-time standing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerStandingResponse {
    pub name: String,
    pub score: i64,
    pub rank: u64,
    pub updated_at: DateTime<Utc>,
}

fn validate_not_blank(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        let mut error = validator::ValidationError::new("blank");
        error.message = Some("Player name must be provided".into());
        return Err(error);
    }

    Ok(())
}
