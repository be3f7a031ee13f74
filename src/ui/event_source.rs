use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::{
    domain::events::{AppEvent, KeyInput, MouseAction, MouseInput},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Merges terminal input with results posted by background work.
/// Pending background events are drained before the terminal is polled.
pub struct CrosstermEventSource {
    background: Receiver<AppEvent>,
    background_closed: bool,
}

impl CrosstermEventSource {
    pub fn new(background: Receiver<AppEvent>) -> Self {
        Self {
            background,
            background_closed: false,
        }
    }

    fn next_background_event(&mut self) -> Option<AppEvent> {
        if self.background_closed {
            return None;
        }
        match self.background.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("background event channel closed");
                self.background_closed = true;
                None
            }
        }
    }
}

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if let Some(event) = self.next_background_event() {
            return Ok(Some(event));
        }

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        Ok(map_terminal_event(event::read()?))
    }
}

pub(crate) fn map_terminal_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => map_key_event(key),
        Event::Mouse(mouse) => map_mouse_event(mouse),
        Event::Resize(..) => Some(AppEvent::Tick),
        _ => None,
    }
}

fn map_key_event(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(AppEvent::QuitRequested);
    }

    let name = match key.code {
        KeyCode::Char(' ') => "space".to_owned(),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        KeyCode::Tab => "tab".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

fn map_mouse_event(mouse: MouseEvent) -> Option<AppEvent> {
    let action = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => MouseAction::Press,
        MouseEventKind::Drag(MouseButton::Left) => MouseAction::Drag,
        MouseEventKind::Up(MouseButton::Left) => MouseAction::Release,
        MouseEventKind::Down(MouseButton::Right) => MouseAction::SecondaryPress,
        _ => return None,
    };

    Some(AppEvent::Mouse(MouseInput::new(
        action,
        mouse.column,
        mouse.row,
    )))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}
