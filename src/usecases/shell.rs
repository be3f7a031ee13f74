use std::time::Instant;

use anyhow::Result;

use crate::{
    domain::{
        chat_session::{
            AttachmentKind, ChatFocus, ChatSession, ContextMenuAction, LoadAcceptance, PinToggle,
        },
        events::{AppEvent, KeyInput, MouseAction, MouseInput, TaskOutcome},
        message::Message,
        notification::Toast,
        room::Room,
        shell_state::{Screen, ShellState},
    },
    infra::contracts::ClipboardWriter,
};

use super::{
    contracts::{RoomActivityWatcher, ShellOrchestrator, SoundCues, TaskDispatcher},
    load_messages::DEFAULT_MESSAGES_PAGE_SIZE,
    send_message::SendMessageCommand,
    tasks::BackgroundTask,
};

const STALE_MESSAGES_DROPPED: &str = "STALE_MESSAGES_DROPPED";
const CLIPBOARD_WRITE_FAILED: &str = "CLIPBOARD_WRITE_FAILED";
const DEFAULT_CELL_WIDTH_PX: u16 = 8;

/// Column used when a context menu is opened from the keyboard.
const KEYBOARD_MENU_COLUMN: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellSettings {
    pub page_size: usize,
    /// Width of one terminal column in pixels, for swipe distances.
    pub cell_width_px: u16,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_MESSAGES_PAGE_SIZE,
            cell_width_px: DEFAULT_CELL_WIDTH_PX,
        }
    }
}

pub struct DefaultShellOrchestrator<D, S, C, W>
where
    D: TaskDispatcher,
    S: SoundCues,
    C: ClipboardWriter,
    W: RoomActivityWatcher,
{
    state: ShellState,
    dispatcher: D,
    sound: S,
    clipboard: C,
    watcher: W,
    settings: ShellSettings,
}

impl<D, S, C, W> DefaultShellOrchestrator<D, S, C, W>
where
    D: TaskDispatcher,
    S: SoundCues,
    C: ClipboardWriter,
    W: RoomActivityWatcher,
{
    pub fn new(
        current_user_id: Option<String>,
        dispatcher: D,
        sound: S,
        clipboard: C,
        watcher: W,
        settings: ShellSettings,
    ) -> Self {
        Self {
            state: ShellState::with_user(current_user_id),
            dispatcher,
            sound,
            clipboard,
            watcher,
            settings,
        }
    }

    /// Requests rooms, profile and stats for the home view.
    pub fn request_home(&mut self) {
        self.dispatcher.dispatch(BackgroundTask::LoadHome {
            user_id: self.state.current_user_id().map(str::to_owned),
        });
    }

    fn quit(&mut self) {
        self.watcher.stop();
        self.state.stop();
    }

    fn handle_home_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.state.home_mut().select_next(),
            "k" | "up" => self.state.home_mut().select_previous(),
            "enter" | "l" => self.open_selected_room(),
            "1" | "2" | "3" => {
                let position = key.key.parse::<usize>().unwrap_or_default();
                if self.state.home_mut().select_featured(position) {
                    self.open_selected_room();
                }
            }
            "r" => self.request_home(),
            "q" => self.quit(),
            "esc" => {
                self.state.toasts_mut().dismiss_latest();
            }
            _ => {}
        }
    }

    fn open_selected_room(&mut self) {
        let Some(room) = self.state.home().selected_room().cloned() else {
            return;
        };
        self.open_room(room);
    }

    fn open_room(&mut self, room: Room) {
        tracing::info!(room_id = %room.id, room = %room.name, "entering room");
        let room_id = room.id.clone();
        self.state.open_chat(room);
        self.request_messages();
        self.watcher.watch(&room_id);
    }

    fn leave_room(&mut self) {
        self.watcher.stop();
        if let Some(chat) = self.state.close_chat() {
            tracing::info!(room_id = %chat.room().id, "left room");
        }
    }

    /// Starts a fresh read of the open room's message window.
    fn request_messages(&mut self) {
        let Some((room_id, generation)) = self.state.begin_load() else {
            return;
        };
        self.dispatcher.dispatch(BackgroundTask::LoadMessages {
            room_id,
            generation,
            limit: self.settings.page_size,
        });
    }

    fn handle_chat_key(&mut self, key: &KeyInput) {
        let Some(focus) = self.state.chat().map(ChatSession::focus) else {
            return;
        };

        match focus {
            ChatFocus::Messages => self.handle_messages_key(key),
            ChatFocus::Composer => self.handle_composer_key(key),
            ChatFocus::Search => self.handle_search_key(key),
            ChatFocus::ContextMenu => self.handle_context_menu_key(key),
            ChatFocus::AttachmentPicker => self.handle_attachment_key(key),
        }
    }

    fn handle_messages_key(&mut self, key: &KeyInput) {
        let current_user_id = self.state.current_user_id().map(str::to_owned);
        let selected_id = self
            .state
            .chat()
            .and_then(ChatSession::selected_message)
            .map(|message| message.id.clone());

        match key.key.as_str() {
            "j" | "down" => self.with_chat(ChatSession::select_next),
            "k" | "up" => self.with_chat(ChatSession::select_previous),
            "G" | "end" => self.with_chat(ChatSession::select_last),
            "i" | "enter" => self.with_chat(|chat| chat.set_focus(ChatFocus::Composer)),
            "r" => {
                if let Some(id) = selected_id {
                    self.arm_reply(&id);
                }
            }
            "x" => self.with_chat(ChatSession::clear_reply),
            "p" => {
                if let Some(id) = selected_id {
                    self.toggle_pin(&id, current_user_id.as_deref());
                }
            }
            "P" => self.jump_to_pinned(),
            "X" => self.with_chat(ChatSession::clear_pins),
            "m" => {
                if let Some(id) = selected_id {
                    self.open_menu_from_keyboard(&id, current_user_id.as_deref());
                }
            }
            "c" => {
                if let Some(id) = selected_id {
                    self.copy_message(&id);
                }
            }
            "/" => self.with_chat(ChatSession::open_search),
            "a" => self.with_chat(ChatSession::toggle_attachment_picker),
            "esc" => {
                let search_open = self.state.chat().is_some_and(ChatSession::is_search_open);
                if !self.state.toasts().is_empty() {
                    self.state.toasts_mut().dismiss_latest();
                } else if search_open {
                    self.with_chat(ChatSession::close_search);
                } else {
                    self.leave_room();
                }
            }
            "b" | "h" => self.leave_room(),
            "q" => self.quit(),
            _ => {}
        }
    }

    fn handle_composer_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "esc" => self.with_chat(|chat| chat.set_focus(ChatFocus::Messages)),
            "enter" => self.send_composer(),
            _ => self.with_chat(|chat| {
                chat.composer_mut().apply_key(&key.key, key.ctrl);
            }),
        }
    }

    fn handle_search_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "esc" => self.with_chat(ChatSession::close_search),
            "enter" | "down" | "up" => {
                self.with_chat(|chat| chat.set_focus(ChatFocus::Messages));
            }
            _ => self.with_chat(|chat| {
                if chat.search_query_mut().apply_key(&key.key, key.ctrl) {
                    chat.on_query_changed();
                }
            }),
        }
    }

    fn handle_context_menu_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.with_chat(|chat| {
                if let Some(menu) = chat.context_menu_mut() {
                    menu.select_next();
                }
            }),
            "k" | "up" => self.with_chat(|chat| {
                if let Some(menu) = chat.context_menu_mut() {
                    menu.select_previous();
                }
            }),
            "enter" => self.apply_selected_menu_action(),
            "esc" | "m" => {
                self.with_chat(|chat| {
                    chat.close_context_menu();
                });
            }
            _ => {}
        }
    }

    fn handle_attachment_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.with_chat(ChatSession::select_next_attachment),
            "k" | "up" => self.with_chat(ChatSession::select_previous_attachment),
            "enter" => {
                if let Some(kind) = self.state.chat().map(ChatSession::attachment_selected) {
                    self.send_attachment(kind);
                }
            }
            "1" | "2" | "3" => {
                let index = key.key.parse::<usize>().unwrap_or_default();
                if let Some(kind) = AttachmentKind::ALL.get(index.saturating_sub(1)).copied() {
                    self.send_attachment(kind);
                }
            }
            "esc" | "a" => self.with_chat(ChatSession::close_attachment_picker),
            _ => {}
        }
    }

    fn with_chat(&mut self, apply: impl FnOnce(&mut ChatSession)) {
        if let Some(chat) = self.state.chat_mut() {
            apply(chat);
        }
    }

    fn arm_reply(&mut self, message_id: &str) {
        self.with_chat(|chat| {
            if chat.arm_reply(message_id) {
                chat.set_focus(ChatFocus::Composer);
            }
        });
    }

    fn toggle_pin(&mut self, message_id: &str, current_user_id: Option<&str>) {
        let Some(chat) = self.state.chat_mut() else {
            return;
        };
        let toast = match chat.toggle_pin(message_id, current_user_id) {
            PinToggle::Pinned => Toast::normal("Message pinned successfully"),
            PinToggle::Unpinned => Toast::normal("Message unpinned"),
            PinToggle::NotAllowed => return,
        };
        self.state.toasts_mut().push(toast);
    }

    fn jump_to_pinned(&mut self) {
        self.with_chat(|chat| {
            if let Some(id) = chat.pinned().last().map(str::to_owned) {
                chat.select_message(&id);
            }
        });
    }

    fn open_menu_from_keyboard(&mut self, message_id: &str, current_user_id: Option<&str>) {
        let row = self
            .state
            .layout()
            .rows
            .iter()
            .find(|span| span.message_id == message_id)
            .map(|span| span.top)
            .unwrap_or_default();
        self.with_chat(|chat| {
            chat.open_context_menu(message_id, KEYBOARD_MENU_COLUMN, row, current_user_id);
        });
    }

    fn apply_selected_menu_action(&mut self) {
        let current_user_id = self.state.current_user_id().map(str::to_owned);
        let Some(menu) = self.state.chat_mut().and_then(ChatSession::close_context_menu) else {
            return;
        };
        let Some(action) = menu.selected_action() else {
            return;
        };

        match action {
            ContextMenuAction::Reply => self.arm_reply(&menu.message_id),
            ContextMenuAction::Pin | ContextMenuAction::Unpin => {
                self.toggle_pin(&menu.message_id, current_user_id.as_deref())
            }
            ContextMenuAction::Copy => self.copy_message(&menu.message_id),
            ContextMenuAction::Delete => {
                tracing::debug!(message_id = %menu.message_id, "delete is not supported");
            }
        }
    }

    fn copy_message(&mut self, message_id: &str) {
        let Some(content) = self
            .state
            .chat()
            .and_then(|chat| chat.find_message(message_id))
            .map(|message| message.content.clone())
        else {
            return;
        };

        match self.clipboard.copy_text(&content) {
            Ok(()) => self.state.toasts_mut().push(Toast::normal("Copied")),
            Err(error) => {
                tracing::warn!(code = CLIPBOARD_WRITE_FAILED, error = %error, "copy failed");
                self.state
                    .toasts_mut()
                    .push(Toast::destructive("Error").with_description("Could not copy message"));
            }
        }
    }

    fn send_composer(&mut self) {
        let Some(content) = self.state.chat().map(|chat| chat.composer().text().to_owned()) else {
            return;
        };
        self.send_content(content);
    }

    fn send_attachment(&mut self, kind: AttachmentKind) {
        self.with_chat(ChatSession::close_attachment_picker);
        self.send_content(kind.placeholder().to_owned());
    }

    /// Issues a write for non-empty content. One send is in flight at a time.
    fn send_content(&mut self, content: String) {
        let Some(chat) = self.state.chat() else {
            return;
        };
        if chat.is_sending() || content.trim().is_empty() {
            return;
        }

        let command = SendMessageCommand {
            room_id: chat.room().id.clone(),
            content,
            is_anonymous: chat.room().is_anonymous,
            reply_to: chat.reply_target().map(|target| target.message_id.clone()),
        };
        let Some(send_id) = self.state.begin_send() else {
            return;
        };
        self.dispatcher
            .dispatch(BackgroundTask::SendMessage { send_id, command });
    }

    fn handle_mouse(&mut self, input: MouseInput) {
        if self.state.screen() != Screen::Chat {
            return;
        }

        let x_px = f32::from(input.column) * f32::from(self.settings.cell_width_px);
        let target = self.state.layout().message_at(input.row).map(str::to_owned);
        let current_user_id = self.state.current_user_id().map(str::to_owned);

        match input.action {
            MouseAction::Press => self.with_chat(|chat| {
                if chat.context_menu().is_some() {
                    chat.close_context_menu();
                    return;
                }
                if let Some(id) = target {
                    chat.begin_swipe(&id, x_px);
                }
            }),
            MouseAction::Drag => self.with_chat(|chat| chat.update_swipe(x_px)),
            MouseAction::Release => {
                let armed = self
                    .state
                    .chat_mut()
                    .is_some_and(ChatSession::release_swipe);
                if armed {
                    self.with_chat(|chat| chat.set_focus(ChatFocus::Composer));
                }
            }
            MouseAction::SecondaryPress => {
                if let Some(id) = target {
                    self.with_chat(|chat| {
                        chat.open_context_menu(
                            &id,
                            input.column,
                            input.row,
                            current_user_id.as_deref(),
                        );
                    });
                }
            }
        }
    }

    fn handle_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::HomeLoaded(snapshot) => {
                let home = self.state.home_mut();
                home.set_profile(snapshot.profile);
                home.set_stats(snapshot.stats);
                home.set_ready(snapshot.rooms);
            }
            TaskOutcome::HomeFailed { code } => {
                tracing::warn!(code, "home view failed to load");
                self.state.home_mut().set_error();
            }
            TaskOutcome::MessagesLoaded {
                room_id,
                generation,
                messages,
            } => self.accept_messages(&room_id, generation, messages),
            TaskOutcome::MessagesFailed {
                room_id,
                generation,
                code,
            } => {
                let current = self
                    .state
                    .chat_mut()
                    .is_some_and(|chat| chat.reject_load(&room_id, generation));
                if current {
                    tracing::warn!(code, room_id = %room_id, "messages failed to load");
                } else {
                    tracing::debug!(
                        code = STALE_MESSAGES_DROPPED,
                        room_id = %room_id,
                        generation,
                        "stale message failure ignored"
                    );
                }
            }
            TaskOutcome::MessageSent { room_id, send_id } => {
                let awaited = self
                    .state
                    .chat_mut()
                    .is_some_and(|chat| chat.complete_send(send_id));
                if !awaited {
                    tracing::debug!(room_id = %room_id, send_id, "confirmation for a left room session");
                    return;
                }
                self.sound.play_send();
                self.request_messages();
            }
            TaskOutcome::MessageSendFailed {
                room_id,
                send_id,
                code,
            } => {
                tracing::warn!(code, room_id = %room_id, send_id, "send rolled back");
                if let Some(chat) = self.state.chat_mut() {
                    chat.fail_send(send_id);
                }
                self.state
                    .toasts_mut()
                    .push(Toast::destructive("Error sending message"));
            }
        }
    }

    fn accept_messages(
        &mut self,
        room_id: &str,
        generation: u64,
        messages: Vec<Message>,
    ) {
        let current_user_id = self.state.current_user_id().map(str::to_owned);
        let acceptance = match self.state.chat_mut() {
            Some(chat) => {
                chat.accept_messages(room_id, generation, messages, current_user_id.as_deref())
            }
            None => LoadAcceptance::Stale,
        };

        match acceptance {
            LoadAcceptance::Accepted {
                new_foreign_messages,
            } => {
                if new_foreign_messages > 0 {
                    self.sound.play_receive();
                }
            }
            LoadAcceptance::Stale => tracing::debug!(
                code = STALE_MESSAGES_DROPPED,
                room_id = %room_id,
                generation,
                current_generation = ?self.state.chat().map(ChatSession::load_generation),
                "stale message load dropped"
            ),
        }
    }

    fn handle_room_activity(&mut self, room_id: &str) {
        let is_open = self
            .state
            .chat()
            .is_some_and(|chat| chat.room().id == room_id);
        if is_open {
            self.request_messages();
        }
    }
}

impl<D, S, C, W> ShellOrchestrator for DefaultShellOrchestrator<D, S, C, W>
where
    D: TaskDispatcher,
    S: SoundCues,
    C: ClipboardWriter,
    W: RoomActivityWatcher,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.state.toasts_mut().prune(Instant::now()),
            AppEvent::QuitRequested => self.quit(),
            AppEvent::InputKey(key) => match self.state.screen() {
                Screen::Home => self.handle_home_key(&key),
                Screen::Chat => self.handle_chat_key(&key),
            },
            AppEvent::Mouse(input) => self.handle_mouse(input),
            AppEvent::TaskCompleted(outcome) => self.handle_outcome(outcome),
            AppEvent::RoomActivity { room_id } => self.handle_room_activity(&room_id),
        }

        Ok(())
    }
}
