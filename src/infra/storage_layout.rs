use std::{env, fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "codebluer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub config_dir: PathBuf,
    pub session_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let config_base = env::var_os("XDG_CONFIG_HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .or_else(dirs::config_dir)
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve config base directory (XDG_CONFIG_HOME/HOME)".into(),
            })?;

        let mut layout = Self::under(config_base.join(APP_DIR_NAME));
        if let Some(state_dir) = dirs::state_dir() {
            layout.log_dir = state_dir.join(APP_DIR_NAME).join("logs");
        }
        Ok(layout)
    }

    /// Everything below one directory.
    pub fn under(config_dir: PathBuf) -> Self {
        Self {
            session_dir: config_dir.join("session"),
            log_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.config_dir, &self.session_dir, &self.log_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn session_file(&self) -> PathBuf {
        self.session_dir.join("session.json")
    }

    pub fn session_lock_file(&self) -> PathBuf {
        self.session_dir.join("session.lock")
    }
}
