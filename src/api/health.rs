use crate::types::COINS;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    coins: usize,
    notifications_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let telegram = &state.config.telegram;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        coins: COINS.len(),
        notifications_configured: telegram.bot_token.is_some() && telegram.chat_id.is_some(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
