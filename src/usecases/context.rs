use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    backend::BackendAdapter,
    infra::{config::AppConfig, storage_layout::StorageLayout},
};

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub backend: Arc<BackendAdapter>,
    /// Flushes buffered file logs when the context is dropped.
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        layout: StorageLayout,
        backend: BackendAdapter,
        log_guard: Option<WorkerGuard>,
    ) -> Self {
        Self {
            config,
            layout,
            backend: Arc::new(backend),
            _log_guard: log_guard,
        }
    }
}
