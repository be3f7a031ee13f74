//! Per-room interaction state.
//!
//! A `ChatSession` is created when a room is opened and dropped when the user
//! leaves it; nothing here is persisted or synced.

use super::{
    message::Message,
    message_list::{filter_messages, resolve_display_name},
    room::Room,
    swipe::{SwipeGesture, SwipeRelease},
    text_field::TextField,
};

/// Scroll margin - number of items to keep visible above/below cursor before scrolling.
const SCROLL_MARGIN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatUiState {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFocus {
    Messages,
    Composer,
    Search,
    ContextMenu,
    AttachmentPicker,
}

/// Locally pinned message ids, in pin order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PinnedMessages {
    ids: Vec<String>,
}

impl PinnedMessages {
    pub fn contains(&self, message_id: &str) -> bool {
        self.ids.iter().any(|id| id == message_id)
    }

    /// Flips membership. Returns true when the message is now pinned.
    pub fn toggle(&mut self, message_id: &str) -> bool {
        if let Some(position) = self.ids.iter().position(|id| id == message_id) {
            self.ids.remove(position);
            false
        } else {
            self.ids.push(message_id.to_owned());
            true
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinToggle {
    Pinned,
    Unpinned,
    /// Only a message's author may pin it.
    NotAllowed,
}

/// Snapshot of the message a reply is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub message_id: String,
    pub author: String,
    pub content: String,
}

impl ReplyTarget {
    fn from_message(message: &Message, room_is_anonymous: bool) -> Self {
        Self {
            message_id: message.id.clone(),
            author: resolve_display_name(message, room_is_anonymous),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuAction {
    Reply,
    Pin,
    Unpin,
    Copy,
    /// Shown for parity with the mobile client; does nothing.
    Delete,
}

impl ContextMenuAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Reply => "Reply",
            Self::Pin => "Pin",
            Self::Unpin => "Unpin",
            Self::Copy => "Copy",
            Self::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub message_id: String,
    pub x: u16,
    pub y: u16,
    pub actions: Vec<ContextMenuAction>,
    pub selected: usize,
}

impl ContextMenu {
    pub fn new(message_id: String, x: u16, y: u16, is_own: bool, is_pinned: bool) -> Self {
        let mut actions = vec![ContextMenuAction::Reply];
        if is_own {
            actions.push(if is_pinned {
                ContextMenuAction::Unpin
            } else {
                ContextMenuAction::Pin
            });
        }
        actions.push(ContextMenuAction::Copy);
        actions.push(ContextMenuAction::Delete);

        Self {
            message_id,
            x,
            y,
            actions,
            selected: 0,
        }
    }

    /// Keeps the menu inside a viewport of the given size.
    pub fn clamped_position(
        &self,
        viewport_width: u16,
        viewport_height: u16,
        menu_width: u16,
        menu_height: u16,
    ) -> (u16, u16) {
        (
            self.x.min(viewport_width.saturating_sub(menu_width)),
            self.y.min(viewport_height.saturating_sub(menu_height)),
        )
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.actions.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_action(&self) -> Option<ContextMenuAction> {
        self.actions.get(self.selected).copied()
    }
}

/// Quick-share entries of the attachment picker. Each sends a placeholder text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Photo,
    Document,
    Camera,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 3] = [Self::Photo, Self::Document, Self::Camera];

    pub fn label(self) -> &'static str {
        match self {
            Self::Photo => "Photos",
            Self::Document => "Document",
            Self::Camera => "Camera",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Photo => "🖼️ Sharing high-res clinical image...",
            Self::Document => "📄 Sharing secure medical document...",
            Self::Camera => "📸 Taking a clinical photo...",
        }
    }
}

/// Outcome of applying a message load result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAcceptance {
    Accepted { new_foreign_messages: usize },
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    room: Room,
    messages: Vec<Message>,
    ui_state: ChatUiState,
    load_generation: u64,
    has_loaded_once: bool,
    selected_index: Option<usize>,
    scroll_offset: usize,
    focus: ChatFocus,
    composer: TextField,
    search_open: bool,
    search_query: TextField,
    reply_target: Option<ReplyTarget>,
    pinned: PinnedMessages,
    context_menu: Option<ContextMenu>,
    attachment_selected: usize,
    swipe: SwipeGesture,
    swipe_target: Option<String>,
    in_flight_send: Option<u64>,
}

impl ChatSession {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            messages: Vec::new(),
            ui_state: ChatUiState::Loading,
            load_generation: 0,
            has_loaded_once: false,
            selected_index: None,
            scroll_offset: 0,
            focus: ChatFocus::Messages,
            composer: TextField::composer(),
            search_open: false,
            search_query: TextField::search(),
            reply_target: None,
            pinned: PinnedMessages::default(),
            context_menu: None,
            attachment_selected: 0,
            swipe: SwipeGesture::default(),
            swipe_target: None,
            in_flight_send: None,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn ui_state(&self) -> ChatUiState {
        self.ui_state
    }

    pub fn focus(&self) -> ChatFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: ChatFocus) {
        self.focus = focus;
    }

    /// Starts a load tagged with `generation`. Results carrying any other
    /// generation are discarded by [`ChatSession::accept_messages`].
    pub fn begin_load(&mut self, generation: u64) {
        self.load_generation = generation;
        if !self.has_loaded_once {
            self.ui_state = ChatUiState::Loading;
        }
    }

    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    pub fn accept_messages(
        &mut self,
        room_id: &str,
        generation: u64,
        messages: Vec<Message>,
        current_user_id: Option<&str>,
    ) -> LoadAcceptance {
        if room_id != self.room.id || generation != self.load_generation {
            return LoadAcceptance::Stale;
        }

        let new_foreign_messages = if self.has_loaded_once {
            messages
                .iter()
                .filter(|message| !self.messages.iter().any(|known| known.id == message.id))
                .filter(|message| current_user_id != Some(message.user_id.as_str()))
                .count()
        } else {
            0
        };

        let selected_id = self.selected_message().map(|message| message.id.clone());
        let was_following = self.is_following_latest();

        self.messages = messages;
        self.ui_state = ChatUiState::Ready;
        self.has_loaded_once = true;

        let filtered_len = self.filtered_len();
        self.selected_index = if filtered_len == 0 {
            None
        } else if was_following || selected_id.is_none() {
            Some(filtered_len - 1)
        } else {
            selected_id
                .and_then(|id| self.filtered_position(&id))
                .or(Some(filtered_len - 1))
        };

        LoadAcceptance::Accepted {
            new_foreign_messages,
        }
    }

    pub fn reject_load(&mut self, room_id: &str, generation: u64) -> bool {
        if room_id != self.room.id || generation != self.load_generation {
            return false;
        }
        if !self.has_loaded_once {
            self.ui_state = ChatUiState::Error;
        }
        true
    }

    pub fn filtered_messages(&self) -> Vec<&Message> {
        filter_messages(&self.messages, self.active_query())
    }

    fn filtered_len(&self) -> usize {
        self.filtered_messages().len()
    }

    fn filtered_position(&self, message_id: &str) -> Option<usize> {
        self.filtered_messages()
            .iter()
            .position(|message| message.id == message_id)
    }

    /// The list tracks the newest message while search is idle and the
    /// cursor sits on the last row.
    pub fn is_following_latest(&self) -> bool {
        if self.search_open || !self.search_query.is_empty() {
            return false;
        }
        match self.selected_index {
            None => true,
            Some(index) => index + 1 >= self.filtered_len(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_message(&self) -> Option<&Message> {
        let index = self.selected_index?;
        self.filtered_messages().get(index).copied()
    }

    pub fn find_message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == message_id)
    }

    pub fn select_next(&mut self) {
        let len = self.filtered_len();
        if len == 0 {
            return;
        }
        self.selected_index = match self.selected_index {
            None => Some(0),
            Some(idx) if idx + 1 < len => Some(idx + 1),
            Some(idx) => Some(idx),
        };
    }

    pub fn select_previous(&mut self) {
        let len = self.filtered_len();
        if len == 0 {
            return;
        }
        self.selected_index = match self.selected_index {
            None => Some(len - 1),
            Some(0) => Some(0),
            Some(idx) => Some(idx - 1),
        };
    }

    pub fn select_last(&mut self) {
        let len = self.filtered_len();
        self.selected_index = len.checked_sub(1);
    }

    /// Moves the cursor to a message. Returns false when it is not visible
    /// under the current filter.
    pub fn select_message(&mut self, message_id: &str) -> bool {
        match self.filtered_position(message_id) {
            Some(position) => {
                self.selected_index = Some(position);
                true
            }
            None => false,
        }
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Keeps the cursor visible with `SCROLL_MARGIN` rows of context.
    ///
    /// `element_index` counts rendered rows, day separators included.
    pub fn update_scroll_offset(&mut self, element_index: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        let effective_margin = SCROLL_MARGIN.min(viewport_height / 2);

        if element_index < self.scroll_offset + effective_margin {
            self.scroll_offset = element_index.saturating_sub(effective_margin);
        }

        let visible_bottom = self.scroll_offset + viewport_height;
        if element_index + effective_margin >= visible_bottom {
            self.scroll_offset =
                (element_index + effective_margin + 1).saturating_sub(viewport_height);
        }
    }

    pub fn composer(&self) -> &TextField {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut TextField {
        &mut self.composer
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight_send.is_some()
    }

    pub fn mark_sending(&mut self, send_id: u64) {
        self.in_flight_send = Some(send_id);
    }

    /// Clears the composer and reply target after the write `send_id` is
    /// confirmed. Returns false for any send this session is not waiting on.
    pub fn complete_send(&mut self, send_id: u64) -> bool {
        if self.in_flight_send != Some(send_id) {
            return false;
        }
        self.in_flight_send = None;
        self.composer.clear();
        self.reply_target = None;
        true
    }

    /// Leaves composer text and reply target untouched.
    pub fn fail_send(&mut self, send_id: u64) -> bool {
        if self.in_flight_send != Some(send_id) {
            return false;
        }
        self.in_flight_send = None;
        true
    }

    pub fn reply_target(&self) -> Option<&ReplyTarget> {
        self.reply_target.as_ref()
    }

    pub fn arm_reply(&mut self, message_id: &str) -> bool {
        let room_is_anonymous = self.room.is_anonymous;
        let Some(target) = self
            .find_message(message_id)
            .map(|message| ReplyTarget::from_message(message, room_is_anonymous))
        else {
            return false;
        };
        self.reply_target = Some(target);
        true
    }

    pub fn clear_reply(&mut self) {
        self.reply_target = None;
    }

    pub fn pinned(&self) -> &PinnedMessages {
        &self.pinned
    }

    pub fn toggle_pin(&mut self, message_id: &str, current_user_id: Option<&str>) -> PinToggle {
        let is_author = self
            .find_message(message_id)
            .is_some_and(|message| current_user_id == Some(message.user_id.as_str()));
        if !is_author {
            return PinToggle::NotAllowed;
        }

        if self.pinned.toggle(message_id) {
            PinToggle::Pinned
        } else {
            PinToggle::Unpinned
        }
    }

    pub fn clear_pins(&mut self) {
        self.pinned.clear();
    }

    /// Content for the pinned banner: the most recently pinned message.
    pub fn pinned_banner(&self) -> Option<&Message> {
        if self.search_open {
            return None;
        }
        self.pinned.last().and_then(|id| self.find_message(id))
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn context_menu_mut(&mut self) -> Option<&mut ContextMenu> {
        self.context_menu.as_mut()
    }

    pub fn open_context_menu(
        &mut self,
        message_id: &str,
        x: u16,
        y: u16,
        current_user_id: Option<&str>,
    ) -> bool {
        let Some(message) = self.find_message(message_id) else {
            return false;
        };
        let is_own = current_user_id == Some(message.user_id.as_str());
        let is_pinned = self.pinned.contains(message_id);

        self.context_menu = Some(ContextMenu::new(
            message_id.to_owned(),
            x,
            y,
            is_own,
            is_pinned,
        ));
        self.focus = ChatFocus::ContextMenu;
        true
    }

    pub fn close_context_menu(&mut self) -> Option<ContextMenu> {
        if self.focus == ChatFocus::ContextMenu {
            self.focus = ChatFocus::Messages;
        }
        self.context_menu.take()
    }

    pub fn is_search_open(&self) -> bool {
        self.search_open
    }

    pub fn search_query(&self) -> &TextField {
        &self.search_query
    }

    pub fn search_query_mut(&mut self) -> &mut TextField {
        &mut self.search_query
    }

    fn active_query(&self) -> &str {
        self.search_query.text()
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
        self.focus = ChatFocus::Search;
    }

    /// Closing search also clears the query and returns to the newest message.
    pub fn close_search(&mut self) {
        self.search_open = false;
        self.search_query.clear();
        self.focus = ChatFocus::Messages;
        self.select_last();
    }

    /// Re-anchors the cursor after the query changed.
    pub fn on_query_changed(&mut self) {
        self.select_last();
        self.scroll_offset = 0;
    }

    pub fn is_attachment_picker_open(&self) -> bool {
        self.focus == ChatFocus::AttachmentPicker
    }

    pub fn toggle_attachment_picker(&mut self) {
        self.focus = if self.is_attachment_picker_open() {
            ChatFocus::Messages
        } else {
            self.attachment_selected = 0;
            ChatFocus::AttachmentPicker
        };
    }

    pub fn close_attachment_picker(&mut self) {
        if self.is_attachment_picker_open() {
            self.focus = ChatFocus::Messages;
        }
    }

    pub fn attachment_selected(&self) -> AttachmentKind {
        AttachmentKind::ALL[self.attachment_selected.min(AttachmentKind::ALL.len() - 1)]
    }

    pub fn select_next_attachment(&mut self) {
        if self.attachment_selected + 1 < AttachmentKind::ALL.len() {
            self.attachment_selected += 1;
        }
    }

    pub fn select_previous_attachment(&mut self) {
        self.attachment_selected = self.attachment_selected.saturating_sub(1);
    }

    pub fn begin_swipe(&mut self, message_id: &str, x_px: f32) {
        self.swipe_target = Some(message_id.to_owned());
        self.swipe.begin(x_px);
    }

    pub fn update_swipe(&mut self, x_px: f32) {
        self.swipe.update(x_px);
    }

    pub fn swipe(&self) -> &SwipeGesture {
        &self.swipe
    }

    pub fn swipe_target(&self) -> Option<&str> {
        self.swipe_target.as_deref()
    }

    /// Ends the gesture; arms reply when released past the threshold.
    pub fn release_swipe(&mut self) -> bool {
        let target = self.swipe_target.take();
        match (self.swipe.release(), target) {
            (SwipeRelease::Commit, Some(message_id)) => self.arm_reply(&message_id),
            _ => false,
        }
    }
}
