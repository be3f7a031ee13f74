//! In-memory adapters for tests.

use anyhow::{bail, Result};

use crate::{
    domain::session::AuthSession,
    infra::{
        config::AppConfig,
        contracts::{ClipboardWriter, ConfigAdapter, ExternalOpener, SessionStore},
    },
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Session store that never touches disk.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    pub session: Option<AuthSession>,
}

impl MemorySessionStore {
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            session: Some(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<AuthSession>> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &AuthSession) -> Result<()> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<bool> {
        Ok(self.session.take().is_some())
    }
}

/// Records opened targets instead of launching a browser.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    pub opened: std::cell::RefCell<Vec<String>>,
}

impl ExternalOpener for RecordingOpener {
    fn open(&self, target: &str) -> Result<()> {
        self.opened.borrow_mut().push(target.to_owned());
        Ok(())
    }
}

/// Collects copied text; `unavailable` makes every copy fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub copied: Vec<String>,
    pub unavailable: bool,
}

impl ClipboardWriter for MemoryClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        if self.unavailable {
            bail!("clipboard is not available");
        }
        self.copied.push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_config_returns_defaults() {
        let adapter = StubConfigAdapter;
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn memory_clipboard_can_fail() {
        let mut clipboard = MemoryClipboard {
            unavailable: true,
            ..MemoryClipboard::default()
        };

        assert!(clipboard.copy_text("hi").is_err());
        assert!(clipboard.copied.is_empty());
    }
}
