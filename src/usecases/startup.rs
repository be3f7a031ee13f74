use std::{
    fs::{File, OpenOptions},
    path::PathBuf,
};

use fs2::FileExt;

use crate::{
    domain::session::AuthSession,
    infra::{contracts::SessionStore, error::AppError, storage_layout::StorageLayout},
};

use super::auth::AuthProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidedAuthReason {
    NoSession,
    RefreshFailed,
    SessionUnreadable,
}

impl GuidedAuthReason {
    pub fn code(self) -> &'static str {
        match self {
            Self::NoSession => "AUTH_REQUIRED_NO_SESSION",
            Self::RefreshFailed => "AUTH_REQUIRED_REFRESH_FAILED",
            Self::SessionUnreadable => "AUTH_REQUIRED_SESSION_UNREADABLE",
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            Self::NoSession => "No saved session found. Please sign in.",
            Self::RefreshFailed => "Your session has expired. Please sign in again.",
            Self::SessionUnreadable => "The saved session could not be read. Please sign in.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupFlowState {
    LaunchTui(AuthSession),
    GuidedAuth { reason: GuidedAuthReason },
}

/// Exclusive hold on the session store for the lifetime of the process.
#[derive(Debug)]
pub struct SessionLockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for SessionLockGuard {
    fn drop(&mut self) {
        if let Err(error) = FileExt::unlock(&self.file) {
            tracing::warn!(
                path = %self.path.display(),
                error = %error,
                "failed to release session lock"
            );
        }
    }
}

#[derive(Debug)]
pub struct StartupPlan {
    pub lock_guard: SessionLockGuard,
    pub state: StartupFlowState,
}

pub fn plan_startup(
    layout: StorageLayout,
    provider: &dyn AuthProvider,
    store: &mut dyn SessionStore,
) -> Result<StartupPlan, AppError> {
    layout.ensure_dirs()?;
    let lock_guard = acquire_session_lock(layout.session_lock_file())?;
    let state = resolve_session(provider, store);

    Ok(StartupPlan {
        lock_guard,
        state,
    })
}

pub fn acquire_session_lock(path: PathBuf) -> Result<SessionLockGuard, AppError> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(|source| AppError::SessionLockCreate {
            path: path.clone(),
            source,
        })?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(SessionLockGuard { file, path }),
        Err(source) if source.kind() == fs2::lock_contended_error().kind() => {
            Err(AppError::SessionStoreBusy { path })
        }
        Err(source) => Err(AppError::SessionLockCreate { path, source }),
    }
}

/// Decides between the TUI and the auth form. An expired session is
/// refreshed once; a failed refresh forgets it.
pub fn resolve_session(
    provider: &dyn AuthProvider,
    store: &mut dyn SessionStore,
) -> StartupFlowState {
    let session = match store.load() {
        Ok(Some(session)) => session,
        Ok(None) => {
            return StartupFlowState::GuidedAuth {
                reason: GuidedAuthReason::NoSession,
            }
        }
        Err(error) => {
            tracing::warn!(error = %error, "stored session is unreadable");
            return StartupFlowState::GuidedAuth {
                reason: GuidedAuthReason::SessionUnreadable,
            };
        }
    };

    if !session.is_expired() {
        return StartupFlowState::LaunchTui(session);
    }

    match provider.refresh(&session.refresh_token) {
        Ok(refreshed) => {
            if let Err(error) = store.save(&refreshed) {
                tracing::warn!(error = %error, "refreshed session could not be stored");
            }
            tracing::info!(code = "AUTH_SESSION_REFRESHED", "session refreshed at startup");
            StartupFlowState::LaunchTui(refreshed)
        }
        Err(error) => {
            tracing::warn!(code = "AUTH_REFRESH_FAILED", ?error, "session refresh failed");
            if let Err(error) = store.clear() {
                tracing::warn!(error = %error, "expired session could not be removed");
            }
            StartupFlowState::GuidedAuth {
                reason: GuidedAuthReason::RefreshFailed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{
        infra::stubs::MemorySessionStore,
        usecases::auth::{
            test_doubles::{session, StubProvider},
            AuthSourceError,
        },
    };

    fn expired(user_id: &str) -> AuthSession {
        AuthSession {
            expires_at: Utc::now() - Duration::minutes(5),
            ..session(user_id)
        }
    }

    #[test]
    fn missing_session_routes_to_auth_form() {
        let mut store = MemorySessionStore::default();

        let state = resolve_session(&StubProvider::default(), &mut store);

        assert_eq!(
            state,
            StartupFlowState::GuidedAuth {
                reason: GuidedAuthReason::NoSession
            }
        );
    }

    #[test]
    fn valid_session_launches_tui_without_refresh() {
        let provider = StubProvider::default();
        let mut store = MemorySessionStore::with_session(session("u1"));

        let state = resolve_session(&provider, &mut store);

        assert_eq!(state, StartupFlowState::LaunchTui(session("u1")));
        assert!(provider.calls.borrow().is_empty());
    }

    #[test]
    fn expired_session_is_refreshed_and_stored() {
        let provider = StubProvider {
            refresh: Ok(session("u1")),
            ..StubProvider::default()
        };
        let mut store = MemorySessionStore::with_session(expired("u1"));

        let state = resolve_session(&provider, &mut store);

        assert_eq!(state, StartupFlowState::LaunchTui(session("u1")));
        assert_eq!(store.session, Some(session("u1")));
    }

    #[test]
    fn failed_refresh_clears_session_and_asks_for_sign_in() {
        let provider = StubProvider {
            refresh: Err(AuthSourceError::Rejected {
                message: "Invalid Refresh Token".to_owned(),
            }),
            ..StubProvider::default()
        };
        let mut store = MemorySessionStore::with_session(expired("u1"));

        let state = resolve_session(&provider, &mut store);

        assert_eq!(
            state,
            StartupFlowState::GuidedAuth {
                reason: GuidedAuthReason::RefreshFailed
            }
        );
        assert_eq!(store.session, None);
    }

    #[test]
    fn second_lock_on_same_store_is_busy() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.lock");

        let _first = acquire_session_lock(path.clone()).expect("first lock");
        let second = acquire_session_lock(path);

        assert!(matches!(second, Err(AppError::SessionStoreBusy { .. })));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.lock");

        drop(acquire_session_lock(path.clone()).expect("first lock"));

        assert!(acquire_session_lock(path).is_ok());
    }
}
