use anyhow::Result;

use crate::infra::contracts::SessionStore;

use super::auth::AuthProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub session_removed: bool,
    pub remote_signed_out: bool,
}

/// Revokes the session remotely when possible, then forgets it locally.
/// Only the local removal can fail the logout.
pub fn logout(provider: &dyn AuthProvider, store: &mut dyn SessionStore) -> Result<LogoutOutcome> {
    let remote_signed_out = match store.load() {
        Ok(Some(session)) => match provider.sign_out(&session.access_token) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(?error, "remote sign-out failed; removing local session anyway");
                false
            }
        },
        Ok(None) => false,
        Err(error) => {
            tracing::warn!(error = %error, "stored session unreadable; removing it");
            false
        }
    };

    let session_removed = store.clear()?;

    Ok(LogoutOutcome {
        session_removed,
        remote_signed_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infra::stubs::MemorySessionStore,
        usecases::auth::{
            test_doubles::{session, StubProvider},
            AuthSourceError,
        },
    };

    #[test]
    fn signs_out_remotely_and_removes_session() {
        let provider = StubProvider::default();
        let mut store = MemorySessionStore::with_session(session("u1"));

        let outcome = logout(&provider, &mut store).expect("logout should succeed");

        assert_eq!(
            outcome,
            LogoutOutcome {
                session_removed: true,
                remote_signed_out: true,
            }
        );
        assert_eq!(store.session, None);
        assert_eq!(*provider.calls.borrow(), vec!["sign_out".to_owned()]);
    }

    #[test]
    fn remote_failure_still_removes_local_session() {
        let provider = StubProvider {
            sign_out: Err(AuthSourceError::Unavailable),
            ..StubProvider::default()
        };
        let mut store = MemorySessionStore::with_session(session("u1"));

        let outcome = logout(&provider, &mut store).expect("logout should succeed");

        assert!(outcome.session_removed);
        assert!(!outcome.remote_signed_out);
    }

    #[test]
    fn is_idempotent_without_session() {
        let provider = StubProvider::default();
        let mut store = MemorySessionStore::default();

        let outcome = logout(&provider, &mut store).expect("logout should succeed");

        assert!(!outcome.session_removed);
        assert!(provider.calls.borrow().is_empty());
    }
}
