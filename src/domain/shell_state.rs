use super::{
    chat_session::ChatSession, home_state::HomeState, notification::ToastCenter, room::Room,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Chat,
}

/// Rows occupied by one rendered message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRowSpan {
    pub message_id: String,
    pub top: u16,
    pub bottom: u16,
}

/// Screen geometry captured during the last draw, used for mouse hit-testing
/// and scroll decisions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatLayout {
    pub rows: Vec<MessageRowSpan>,
    pub list_height: usize,
    pub viewport_width: u16,
    pub viewport_height: u16,
}

impl ChatLayout {
    pub fn message_at(&self, row: u16) -> Option<&str> {
        self.rows
            .iter()
            .find(|span| span.top <= row && row <= span.bottom)
            .map(|span| span.message_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    running: bool,
    current_user_id: Option<String>,
    home: HomeState,
    chat: Option<ChatSession>,
    toasts: ToastCenter,
    layout: ChatLayout,
    /// Last load generation or send id handed out. Never reset, so results
    /// issued from a room session that was left cannot match its successor.
    last_ticket: u64,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            current_user_id: None,
            home: HomeState::default(),
            chat: None,
            toasts: ToastCenter::default(),
            layout: ChatLayout::default(),
            last_ticket: 0,
        }
    }
}

impl ShellState {
    pub fn with_user(current_user_id: Option<String>) -> Self {
        Self {
            current_user_id,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    pub fn screen(&self) -> Screen {
        if self.chat.is_some() {
            Screen::Chat
        } else {
            Screen::Home
        }
    }

    pub fn home(&self) -> &HomeState {
        &self.home
    }

    pub fn home_mut(&mut self) -> &mut HomeState {
        &mut self.home
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatSession> {
        self.chat.as_mut()
    }

    /// Enters a room with fresh transient state.
    pub fn open_chat(&mut self, room: Room) -> &mut ChatSession {
        self.layout = ChatLayout::default();
        self.chat.insert(ChatSession::new(room))
    }

    /// Leaves the room; its transient state is discarded.
    pub fn close_chat(&mut self) -> Option<ChatSession> {
        self.layout = ChatLayout::default();
        self.chat.take()
    }

    /// Tags a fresh read of the open room. Returns the room id and the
    /// generation its result must carry.
    pub fn begin_load(&mut self) -> Option<(String, u64)> {
        let chat = self.chat.as_mut()?;
        self.last_ticket += 1;
        chat.begin_load(self.last_ticket);
        Some((chat.room().id.clone(), self.last_ticket))
    }

    /// Marks the open room as sending and returns the id its outcome must
    /// carry.
    pub fn begin_send(&mut self) -> Option<u64> {
        let chat = self.chat.as_mut()?;
        self.last_ticket += 1;
        chat.mark_sending(self.last_ticket);
        Some(self.last_ticket)
    }

    pub fn toasts(&self) -> &ToastCenter {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastCenter {
        &mut self.toasts
    }

    pub fn layout(&self) -> &ChatLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: ChatLayout) {
        self.layout = layout;
    }
}
