use std::{path::Path, sync::mpsc, time::Duration};

use anyhow::Result;

use crate::{
    backend::{BackendAdapter, RoomActivityMonitor},
    domain::session::AuthSession,
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter},
        contracts::ConfigAdapter,
        error::AppError,
        os::SystemClipboard,
        storage_layout::StorageLayout,
    },
    sound::SoundEngine,
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::{DefaultShellOrchestrator, ShellSettings},
        tasks::BackgroundWorker,
    },
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext> {
    let config = load_config(&FileConfigAdapter::new(config_path))?;
    let layout = StorageLayout::resolve()?;
    let log_guard = infra::logging::init(&config.logging, &layout.log_dir)?;
    let backend = BackendAdapter::new(&config.backend)?;

    tracing::debug!(
        config_dir = %layout.config_dir.display(),
        backend_url = %config.backend.url,
        "context ready"
    );
    Ok(AppContext::new(config, layout, backend, log_guard))
}

fn load_config(adapter: &dyn ConfigAdapter) -> Result<AppConfig> {
    adapter.load()
}

/// Everything the TUI loop drives.
pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

/// Wires the background worker, room monitor, sound and clipboard into a
/// shell for the signed-in user and starts the first home load.
pub fn compose_shell(context: &AppContext, session: &AuthSession) -> Result<ShellComposition, AppError> {
    context.backend.set_session(Some(session.clone()));

    let (event_tx, event_rx) = mpsc::channel();
    let worker = BackgroundWorker::spawn(context.backend.clone(), event_tx.clone())
        .map_err(|source| AppError::WorkerSpawn { source })?;
    let monitor = RoomActivityMonitor::new(
        context.backend.runtime_handle(),
        context.backend.api(),
        event_tx,
        Duration::from_millis(context.config.chat.poll_interval_ms),
    );

    let mut orchestrator = DefaultShellOrchestrator::new(
        Some(session.user_id.clone()),
        worker,
        SoundEngine::new(context.config.sound.enabled),
        SystemClipboard::default(),
        monitor,
        shell_settings(&context.config),
    );
    orchestrator.request_home();

    Ok(ShellComposition {
        event_source: Box::new(CrosstermEventSource::new(event_rx)),
        orchestrator: Box::new(orchestrator),
    })
}

fn shell_settings(config: &AppConfig) -> ShellSettings {
    ShellSettings {
        page_size: config.chat.page_size,
        cell_width_px: config.chat.cell_width_px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::stubs::StubConfigAdapter;

    #[test]
    fn loads_config_through_adapter() {
        let config = load_config(&StubConfigAdapter).expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn shell_settings_follow_chat_config() {
        let mut config = AppConfig::default();
        config.chat.page_size = 120;
        config.chat.cell_width_px = 10;

        let settings = shell_settings(&config);

        assert_eq!(settings.page_size, 120);
        assert_eq!(settings.cell_width_px, 10);
    }
}
