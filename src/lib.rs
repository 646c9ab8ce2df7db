//! Augur - crypto indicator and signal scoring engine with multi-source price fallback

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::Router;
use config::Config;
use services::Advisor;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub advisor: Arc<Advisor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let advisor = Arc::new(Advisor::from_config(&config));
        Self {
            config: Arc::new(config),
            advisor,
        }
    }
}

/// Build the HTTP application.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
