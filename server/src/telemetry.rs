//! Subscriber setup for the server binary.
//!
//! `RUST_LOG` selects the filter (default `info`). Set
//! `DOCDESK_LOG_FORMAT=json` for one JSON object per line. Records emitted
//! through the `log` facade by the library are forwarded to tracing.

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub const LOG_FORMAT_ENV: &str = "DOCDESK_LOG_FORMAT";

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install log bridge: {0}")]
    Log(#[from] log::SetLoggerError),

    #[error("Failed to install subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

fn json_requested() -> bool {
    std::env::var(LOG_FORMAT_ENV)
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

pub fn init() -> Result<(), TelemetryError> {
    LogTracer::init()?;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let json = json_requested();
    let subscriber = Registry::default()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_current_span(true)))
        .with((!json).then(|| fmt::layer().with_target(false).compact()));

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
