use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_player_standing, list_scores, submit_score};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_scores))
        .route("/score", post(submit_score))
        .route("/players/:name", get(get_player_standing))
}
