use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    contracts::ConfigAdapter,
    error::AppError,
    storage_layout::StorageLayout,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const MAX_PAGE_SIZE: usize = 200;

pub const BACKEND_URL_ENV: &str = "CODEBLUER_BACKEND_URL";
pub const ANON_KEY_ENV: &str = "CODEBLUER_ANON_KEY";

/// Config source for `bootstrap`: an explicit `--config` path or the
/// default locations.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> anyhow::Result<AppConfig> {
        load(self.path.as_deref()).context("codebluer configuration could not be loaded")
    }
}

/// Loads `path`, or the first existing default location, over the built-in
/// defaults. A missing file is not an error.
pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::default();

    if let Some(config_path) = path.map(Path::to_path_buf).or_else(default_config_path) {
        if config_path.exists() {
            read_file(&config_path)?.merge_into(&mut config);
            tracing::debug!(path = %config_path.display(), "config file loaded");
        }
    }

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(DEFAULT_CONFIG_PATH);
    if local.exists() {
        return Some(local);
    }

    StorageLayout::resolve()
        .ok()
        .map(|layout| layout.config_dir.join(DEFAULT_CONFIG_PATH))
}

fn read_file(path: &Path) -> Result<FileConfig, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(url) = non_empty_env(BACKEND_URL_ENV) {
        config.backend.url = url;
    }

    if let Some(anon_key) = non_empty_env(ANON_KEY_ENV) {
        config.backend.anon_key = anon_key;
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn validate(config: &AppConfig) -> Result<(), AppError> {
    if config.chat.page_size == 0 || config.chat.page_size > MAX_PAGE_SIZE {
        return Err(AppError::ConfigInvalid {
            field: "chat.page_size",
            details: format!("must be between 1 and {MAX_PAGE_SIZE}"),
        });
    }

    if config.chat.poll_interval_ms == 0 {
        return Err(AppError::ConfigInvalid {
            field: "chat.poll_interval_ms",
            details: "must be greater than zero".to_owned(),
        });
    }

    if config.chat.cell_width_px == 0 {
        return Err(AppError::ConfigInvalid {
            field: "chat.cell_width_px",
            details: "must be greater than zero".to_owned(),
        });
    }

    Ok(())
}
