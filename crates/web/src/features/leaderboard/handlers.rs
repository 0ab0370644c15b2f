use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::dto::leaderboard::{
    LeaderboardResponse, ListScoresQuery, PlayerStandingResponse, SubmitScoreRequest,
    SubmitScoreResponse,
};
use validator::Validate;

use crate::error::WebResult;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/leaderboard/score",
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Score stored, returns the player's all-time rank", body = SubmitScoreResponse),
        (status = 400, description = "Malformed body or validation error"),
        (status = 409, description = "Player was created concurrently, retry")
    ),
    tag = "leaderboard"
)]
pub async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> WebResult<Response> {
    let Json(request) = payload?;
    request.validate()?;

    let response = services::submit_score(state.store(), &request, Utc::now()).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(ListScoresQuery),
    responses(
        (status = 200, description = "Leaderboard page retrieved successfully", body = LeaderboardResponse),
        (status = 400, description = "Malformed query or page size above 100"),
        (status = 404, description = "Page out of range or around-me player not found")
    ),
    tag = "leaderboard"
)]
pub async fn list_scores(
    State(state): State<AppState>,
    query: Result<Query<ListScoresQuery>, QueryRejection>,
) -> WebResult<Response> {
    let Query(query) = query?;
    query.validate()?;

    let response = services::list_scores(state.store(), &query, Utc::now()).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/players/{name}",
    params(
        ("name" = String, Path, description = "Player name")
    ),
    responses(
        (status = 200, description = "Player's all-time standing", body = PlayerStandingResponse),
        (status = 404, description = "Player not found")
    ),
    tag = "leaderboard"
)]
pub async fn get_player_standing(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> WebResult<Response> {
    let response = services::get_player_standing(state.store(), &name).await?;

    Ok(Json(response).into_response())
}
