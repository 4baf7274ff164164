use std::sync::Arc;

use docdesk::{ActionError, Dashboard};

use crate::error::AppError;

/// Extra room on top of the largest accepted file for multipart framing and
/// the text fields that travel with it.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Largest request body accepted by the router.
    pub fn body_limit(&self) -> usize {
        let max_file = self.dashboard.config().uploads.max_file_bytes;
        usize::try_from(max_file)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD)
    }

    /// Runs a dashboard call on the blocking pool. SQLite and file writes
    /// are synchronous.
    pub async fn run<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Dashboard) -> Result<T, ActionError> + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = Arc::clone(&self.dashboard);
        tokio::task::spawn_blocking(move || f(&dashboard))
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Blocking task failed");
                AppError::Internal
            })?
            .map_err(AppError::from)
    }
}
