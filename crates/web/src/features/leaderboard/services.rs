use chrono::{DateTime, Utc};
use storage::{
    ScoreStore,
    dto::leaderboard::{
        LeaderboardResponse, ListScoresQuery, PlayerStandingResponse, SubmitScoreRequest,
        SubmitScoreResponse,
    },
    models::Period,
    services::{
        Result,
        around_me::around_me,
        pagination::{paginate, resolve_period},
        ranking::{rank_of, rank_player},
    },
};

/// Store a submission and report the player's all-time rank
pub async fn submit_score(
    store: &dyn ScoreStore,
    request: &SubmitScoreRequest,
    now: DateTime<Utc>,
) -> Result<SubmitScoreResponse> {
    let record = store.upsert_score(&request.name, request.score, now).await?;
    let rank = rank_of(store, &record, &Period::AllTime).await?;

    tracing::info!(
        player = %record.name,
        submitted = request.score,
        best = record.score,
        rank,
        "Score submitted"
    );

    Ok(SubmitScoreResponse { rank })
}

/// List one page of the leaderboard, with the around-me neighbourhood when asked for
pub async fn list_scores(
    store: &dyn ScoreStore,
    query: &ListScoresQuery,
    now: DateTime<Utc>,
) -> Result<LeaderboardResponse> {
    let period = resolve_period(
        query.month,
        query.year,
        query.all_time.unwrap_or(false),
        now,
    );
    let request = query.page_request();

    tracing::debug!(
        ?period,
        page = request.page(),
        limit = request.limit(),
        "Listing scores"
    );

    let page = paginate(store, period, &request).await?;
    let around_me = around_me(store, period, query.around_me_name(), &page).await?;

    Ok(LeaderboardResponse {
        next_page: page.next_page.unwrap_or(0),
        results: page.entries,
        around_me,
    })
}

/// Get a single player's all-time standing
pub async fn get_player_standing(
    store: &dyn ScoreStore,
    name: &str,
) -> Result<PlayerStandingResponse> {
    let standing = rank_player(store, name, &Period::AllTime).await?;

    Ok(PlayerStandingResponse {
        name: standing.record.name,
        score: standing.record.score,
        rank: standing.rank,
        updated_at: standing.record.updated_at,
    })
}
