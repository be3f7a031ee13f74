//! Desktop integrations: browser hand-off and clipboard.

use anyhow::{Context, Result};

use crate::infra::contracts::{ClipboardWriter, ExternalOpener};

#[derive(Debug, Clone, Default)]
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, target: &str) -> Result<()> {
        open::that(target).with_context(|| format!("failed to open {target}"))
    }
}

/// System clipboard, connected on first copy. The connection is kept so
/// the copied text survives on platforms where the owner must stay alive.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardWriter for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("clipboard is not available")?,
        };

        let copied = clipboard
            .set_text(text.to_owned())
            .context("failed to write to clipboard");
        self.clipboard = Some(clipboard);
        copied
    }
}
