use std::{fs, io, path::PathBuf};

use anyhow::Result;

use crate::{
    domain::session::AuthSession,
    infra::{contracts::SessionStore, error::AppError},
};

/// Session persisted as JSON next to the session lock.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<AuthSession>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(AppError::SessionRead {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };

        let session = serde_json::from_str(&raw).map_err(|source| AppError::SessionParse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(session))
    }

    fn save(&mut self, session: &AuthSession) -> Result<()> {
        let write_error = |source| AppError::SessionWrite {
            path: self.path.clone(),
            source,
        };
        let raw = serde_json::to_vec_pretty(session).map_err(io::Error::from).map_err(write_error)?;

        // Staged beside the target, then renamed into place.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, raw).map_err(write_error)?;
        restrict_permissions(&staging).map_err(write_error)?;
        fs::rename(&staging, &self.path).map_err(write_error)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AppError::SessionWrite {
                path: self.path.clone(),
                source,
            }
            .into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> io::Result<()> {
    Ok(())
}
