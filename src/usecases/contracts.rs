use anyhow::Result;

use crate::domain::{events::AppEvent, shell_state::ShellState};

use super::tasks::BackgroundTask;

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    /// Rendering records layout and scroll position back into the state.
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Hands work to something that runs it off the UI thread.
pub trait TaskDispatcher {
    fn dispatch(&self, task: BackgroundTask);
}

pub trait SoundCues {
    fn play_send(&mut self);
    fn play_receive(&mut self);
}

/// Watches one room for new messages at a time.
pub trait RoomActivityWatcher {
    fn watch(&mut self, room_id: &str);
    fn stop(&mut self);
}
