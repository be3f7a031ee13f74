use anyhow::Result;

use crate::{domain::session::AuthSession, infra::config::AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

pub trait SessionStore {
    fn load(&self) -> Result<Option<AuthSession>>;
    fn save(&mut self, session: &AuthSession) -> Result<()>;
    /// Returns true when a stored session was removed.
    fn clear(&mut self) -> Result<bool>;
}

pub trait ExternalOpener {
    fn open(&self, target: &str) -> Result<()>;
}

pub trait ClipboardWriter {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}
