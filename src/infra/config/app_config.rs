use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub sound: SoundConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Log to stderr instead of the rolling file.
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            stderr: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub request_timeout_ms: u64,
    /// Where auth emails and OAuth send the browser back to.
    pub redirect_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_owned(),
            anon_key: "replace-me".to_owned(),
            request_timeout_ms: 10_000,
            redirect_url: "http://localhost:3000/".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    pub page_size: usize,
    pub poll_interval_ms: u64,
    /// Pixel width of one terminal cell, used for swipe distances.
    pub cell_width_px: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            poll_interval_ms: 3_000,
            cell_width_px: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoundConfig {
    pub enabled: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
