use super::{home_state::CommunityStats, message::Message, profile::UserProfile, room::Room};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    Mouse(MouseInput),
    TaskCompleted(TaskOutcome),
    /// The activity monitor saw a new newest message in this room.
    RoomActivity { room_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Press,
    Drag,
    Release,
    /// Secondary button; opens the context menu.
    SecondaryPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub action: MouseAction,
    pub column: u16,
    pub row: u16,
}

impl MouseInput {
    pub fn new(action: MouseAction, column: u16, row: u16) -> Self {
        Self {
            action,
            column,
            row,
        }
    }
}

/// Everything the home view loads in one background pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeSnapshot {
    pub rooms: Vec<Room>,
    pub profile: Option<UserProfile>,
    pub stats: CommunityStats,
}

/// Results delivered from the background worker to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    HomeLoaded(HomeSnapshot),
    HomeFailed {
        code: &'static str,
    },
    MessagesLoaded {
        room_id: String,
        generation: u64,
        messages: Vec<Message>,
    },
    MessagesFailed {
        room_id: String,
        generation: u64,
        code: &'static str,
    },
    MessageSent {
        room_id: String,
        send_id: u64,
    },
    MessageSendFailed {
        room_id: String,
        send_id: u64,
        code: &'static str,
    },
}
