use serde::Deserialize;

use crate::infra::config::{AppConfig, BackendConfig, ChatConfig, LogConfig, SoundConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub backend: Option<FileBackendConfig>,
    pub chat: Option<FileChatConfig>,
    pub sound: Option<FileSoundConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(backend) = self.backend {
            backend.merge_into(&mut config.backend);
        }

        if let Some(chat) = self.chat {
            chat.merge_into(&mut config.chat);
        }

        if let Some(sound) = self.sound {
            sound.merge_into(&mut config.sound);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub stderr: Option<bool>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(stderr) = self.stderr {
            config.stderr = stderr;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileBackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub redirect_url: Option<String>,
}

impl FileBackendConfig {
    fn merge_into(self, config: &mut BackendConfig) {
        if let Some(url) = self.url {
            config.url = url;
        }

        if let Some(anon_key) = self.anon_key {
            config.anon_key = anon_key;
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }

        if let Some(redirect_url) = self.redirect_url {
            config.redirect_url = redirect_url;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub page_size: Option<usize>,
    pub poll_interval_ms: Option<u64>,
    pub cell_width_px: Option<u16>,
}

impl FileChatConfig {
    fn merge_into(self, config: &mut ChatConfig) {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }

        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.poll_interval_ms = poll_interval_ms;
        }

        if let Some(cell_width_px) = self.cell_width_px {
            config.cell_width_px = cell_width_px;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSoundConfig {
    pub enabled: Option<bool>,
}

impl FileSoundConfig {
    fn merge_into(self, config: &mut SoundConfig) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
    }
}
