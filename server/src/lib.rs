//! HTTP surface for the docdesk dashboard.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use docdesk::{load_config, Config, ConfigError};

pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use error::{AppError, ServerError};
pub use state::AppState;

/// Path of the JSON configuration file. Defaults apply when unset.
pub const CONFIG_ENV: &str = "DOCDESK_CONFIG";

pub fn app(state: AppState) -> Router {
    let body_limit = state.body_limit();

    Router::new()
        .route("/health", get(health))
        .merge(routes::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Loads the file named by `DOCDESK_CONFIG`, or the defaults.
pub fn load_settings() -> Result<Config, ConfigError> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}
