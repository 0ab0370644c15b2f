use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod features;
pub mod state;

pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::leaderboard::handlers::submit_score,
        features::leaderboard::handlers::list_scores,
        features::leaderboard::handlers::get_player_standing,
    ),
    components(
        schemas(
            storage::dto::leaderboard::SubmitScoreRequest,
            storage::dto::leaderboard::SubmitScoreResponse,
            storage::dto::leaderboard::RankedEntry,
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::leaderboard::PlayerStandingResponse,
        )
    ),
    tags(
        (name = "leaderboard", description = "Score submission and ranking endpoints"),
    )
)]
pub struct ApiDoc;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api/leaderboard", features::leaderboard::routes::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
