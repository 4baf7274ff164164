use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use docdesk::db::dashboard_repo::CardData;

use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/cards", get(cards))
}

async fn cards(State(state): State<AppState>) -> Result<Json<CardData>, AppError> {
    state.run(|dashboard| dashboard.card_data()).await.map(Json)
}
