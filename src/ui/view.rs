use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::domain::{
    chat_session::{AttachmentKind, ChatFocus, ChatSession, ChatUiState, ContextMenuAction},
    home_state::{CommunityStats, HomeState, RoomListUiState},
    message_list::{
        build_chat_list_elements, message_index_to_element_index, ChatListElement,
        PresenterContext,
    },
    room::Room,
    shell_state::{ChatLayout, MessageRowSpan, Screen, ShellState},
};

use super::{
    message_input::{render_input, InputField, COMPOSER_PLACEHOLDER, SEARCH_PLACEHOLDER},
    message_rendering::{element_lines, swipe_shift, truncate_to_width},
    styles,
};

const TOAST_WIDTH: u16 = 48;
const ATTACHMENT_PICKER_WIDTH: u16 = 28;

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState) {
    let [content_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match state.screen() {
        Screen::Home => render_home(frame, content_area, state.home()),
        Screen::Chat => render_chat(frame, content_area, state),
    }

    render_toasts(frame, content_area, state);

    let status = Paragraph::new(status_line(state)).style(styles::status_bar_style());
    frame.render_widget(status, status_area);
}

// =============================================================================
// Home
// =============================================================================

fn render_home(frame: &mut Frame<'_>, area: Rect, home: &HomeState) {
    let featured_height = home.featured_rooms().len().max(1) as u16 + 2;
    let [greeting_area, stats_area, featured_area, rooms_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(featured_height),
        Constraint::Min(3),
    ])
    .areas(area);

    let greeting = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Welcome back, {} 👋", home.greeting_name()),
            styles::greeting_style(),
        )),
        Line::from(Span::styled(
            "EMT & Paramedic Community",
            styles::hint_style(),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("CodeBlueR"));
    frame.render_widget(greeting, greeting_area);

    let stats = Paragraph::new(stats_line(home.stats())).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Community Stats"),
    );
    frame.render_widget(stats, stats_area);

    let featured: Vec<Line<'static>> = if home.featured_rooms().is_empty() {
        vec![Line::from(Span::styled("No rooms yet", styles::hint_style()))]
    } else {
        home.featured_rooms()
            .iter()
            .enumerate()
            .map(|(index, room)| featured_room_line(index + 1, room))
            .collect()
    };
    let featured = Paragraph::new(featured).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Popular Rooms"),
    );
    frame.render_widget(featured, featured_area);

    render_room_list(frame, rooms_area, home);
}

fn stats_line(stats: CommunityStats) -> Line<'static> {
    let mut spans = Vec::new();
    for (label, value) in [
        ("Rooms", stats.rooms),
        ("Messages", stats.messages),
        ("Members", stats.members),
    ] {
        if !spans.is_empty() {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(format_count(value), styles::stat_value_style()));
        spans.push(Span::styled(format!(" {label}"), styles::stat_label_style()));
    }
    Line::from(spans)
}

fn format_count(value: Option<u64>) -> String {
    value.map_or_else(|| "--".to_owned(), |count| count.to_string())
}

fn featured_room_line(position: usize, room: &Room) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{position}] "), styles::hint_style()),
        Span::styled(
            format!("{} {}", room.room_type.icon(), room.name),
            styles::room_title_style(&room.room_type),
        ),
        Span::styled(format!("  {}", room.online_label()), styles::hint_style()),
    ])
}

fn render_room_list(frame: &mut Frame<'_>, area: Rect, home: &HomeState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::active_panel_border_style())
        .title(format!("All Rooms ({})", home.rooms().len()));

    let placeholder = match home.ui_state() {
        RoomListUiState::Loading => Some("Loading rooms..."),
        RoomListUiState::Empty => Some("No rooms available yet. Press r to refresh."),
        RoomListUiState::Error => Some("Failed to load rooms. Press r to retry."),
        RoomListUiState::Ready => None,
    };
    if let Some(text) = placeholder {
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem<'static>> = home
        .rooms()
        .iter()
        .map(|room| room_item(room, width))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selection_style());

    let mut list_state = ListState::default();
    list_state.select(home.selected_index());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn room_item(room: &Room, width: usize) -> ListItem<'static> {
    let mut title = vec![Span::styled(
        format!("{} {}", room.room_type.icon(), room.name),
        styles::room_title_style(&room.room_type),
    )];
    if room.is_anonymous {
        title.push(Span::styled(" (anonymous)", styles::hint_style()));
    }

    let detail = room
        .description
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .map_or_else(|| room.online_label(), str::to_owned);

    ListItem::new(vec![
        Line::from(title),
        Line::from(Span::styled(
            format!("   {}", truncate_to_width(&detail, width.saturating_sub(3))),
            styles::room_description_style(),
        )),
    ])
}

// =============================================================================
// Chat
// =============================================================================

struct ChatAreas {
    header: Rect,
    search: Option<Rect>,
    pinned: Option<Rect>,
    list: Rect,
    reply: Option<Rect>,
    composer: Rect,
}

fn chat_areas(area: Rect, has_search: bool, has_pinned: bool, has_reply: bool) -> ChatAreas {
    let mut constraints = vec![Constraint::Length(4)];
    if has_search {
        constraints.push(Constraint::Length(3));
    }
    if has_pinned {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(3));
    if has_reply {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::vertical(constraints).split(area);
    let mut next = chunks.iter().copied();
    let mut take = || next.next().unwrap_or_default();

    ChatAreas {
        header: take(),
        search: has_search.then(&mut take),
        pinned: has_pinned.then(&mut take),
        list: take(),
        reply: has_reply.then(&mut take),
        composer: take(),
    }
}

fn render_chat(frame: &mut Frame<'_>, area: Rect, state: &mut ShellState) {
    let viewport = frame.area();
    let Some(chat) = state.chat() else {
        return;
    };

    let reply_text = reply_bar_text(chat);
    let areas = chat_areas(
        area,
        chat.is_search_open(),
        chat.pinned_banner().is_some(),
        reply_text.is_some(),
    );

    render_chat_header(frame, areas.header, chat.room());

    if let Some(search_area) = areas.search {
        render_input(
            frame,
            search_area,
            InputField {
                state: chat.search_query(),
                title: "Search",
                placeholder: SEARCH_PLACEHOLDER,
                is_focused: chat.focus() == ChatFocus::Search,
            },
        );
    }

    if let (Some(pinned_area), Some(pinned)) = (areas.pinned, chat.pinned_banner()) {
        let text = format!("📌 Pinned Message: {}", pinned.content.replace('\n', " "));
        let banner = Paragraph::new(Span::styled(
            truncate_to_width(&text, pinned_area.width as usize),
            styles::pinned_banner_style(),
        ));
        frame.render_widget(banner, pinned_area);
    }

    if let (Some(reply_area), Some(text)) = (areas.reply, reply_text) {
        let bar = Paragraph::new(Span::styled(
            truncate_to_width(&text, reply_area.width as usize),
            styles::reply_bar_style(),
        ));
        frame.render_widget(bar, reply_area);
    }

    let composer_title = match (chat.is_sending(), chat.room().is_anonymous) {
        (true, _) => "Sending...",
        (false, true) => "Message (anonymous)",
        (false, false) => "Message",
    };
    render_input(
        frame,
        areas.composer,
        InputField {
            state: chat.composer(),
            title: composer_title,
            placeholder: COMPOSER_PLACEHOLDER,
            is_focused: chat.focus() == ChatFocus::Composer,
        },
    );

    let layout = render_message_list(frame, areas.list, viewport, state);
    state.set_layout(layout);

    if let Some(chat) = state.chat() {
        if chat.is_attachment_picker_open() {
            render_attachment_picker(frame, areas.list, chat.attachment_selected());
        }
        render_context_menu(frame, viewport, chat);
    }
}

fn render_chat_header(frame: &mut Frame<'_>, area: Rect, room: &Room) {
    let mut subtitle = vec![Span::styled(room.online_label(), styles::hint_style())];
    if room.is_anonymous {
        subtitle.push(Span::styled(" · anonymous room", styles::hint_style()));
    }

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} {}", room.room_type.icon(), room.name),
            styles::room_title_style(&room.room_type),
        )),
        Line::from(subtitle),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::room_border_style(&room.room_type)),
    );
    frame.render_widget(header, area);
}

fn reply_bar_text(chat: &ChatSession) -> Option<String> {
    if let Some(target) = chat.reply_target() {
        let content = target.content.lines().next().unwrap_or_default();
        return Some(format!(
            "↩ Replying to {}: {}  (x to cancel)",
            target.author, content
        ));
    }
    chat.swipe()
        .shows_reply_hint()
        .then(|| "↩ Release to reply".to_owned())
}

/// Draws the message list and returns the rows each message occupies.
fn render_message_list(
    frame: &mut Frame<'_>,
    area: Rect,
    viewport: Rect,
    state: &mut ShellState,
) -> ChatLayout {
    let mut layout = ChatLayout {
        rows: Vec::new(),
        list_height: 0,
        viewport_width: viewport.width,
        viewport_height: viewport.height,
    };

    let current_user_id = state.current_user_id().map(str::to_owned);
    let Some(chat) = state.chat() else {
        return layout;
    };

    let is_active = chat.focus() == ChatFocus::Messages;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_active {
            styles::active_panel_border_style()
        } else {
            styles::inactive_panel_border_style()
        });
    let inner = block.inner(area);
    layout.list_height = inner.height as usize;

    let placeholder = match chat.ui_state() {
        ChatUiState::Loading => Some("Loading messages..."),
        ChatUiState::Error => Some("Failed to load messages. Press b to go back."),
        ChatUiState::Ready if chat.messages().is_empty() => {
            Some("No messages yet. Start the conversation!")
        }
        ChatUiState::Ready if chat.filtered_messages().is_empty() => {
            Some("No messages match your search.")
        }
        ChatUiState::Ready => None,
    };
    if let Some(text) = placeholder {
        frame.render_widget(
            Paragraph::new(Span::styled(text, styles::hint_style())).block(block),
            area,
        );
        return layout;
    }

    let context = PresenterContext::local(current_user_id, chat.room().is_anonymous);
    let elements = build_chat_list_elements(
        chat.messages(),
        chat.search_query().text(),
        chat.pinned(),
        &context,
    );
    let selected_id = chat.selected_message().map(|message| message.id.clone());
    let swiped = chat
        .swipe_target()
        .filter(|_| chat.swipe().is_active())
        .map(|id| (id.to_owned(), swipe_shift(chat.swipe().offset())));
    let element_index = chat
        .selected_index()
        .and_then(|index| message_index_to_element_index(&elements, index));

    let width = inner.width as usize;
    let rendered: Vec<Vec<Line<'static>>> = elements
        .iter()
        .map(|element| {
            element_lines(
                element,
                width,
                selected_id.as_deref(),
                swiped.as_ref().map(|(id, shift)| (id.as_str(), *shift)),
            )
        })
        .collect();

    if let (Some(index), Some(chat)) = (element_index, state.chat_mut()) {
        chat.update_scroll_offset(index, inner.height as usize);
    }
    let scroll_offset = state.chat().map_or(0, ChatSession::scroll_offset);
    let heights: Vec<usize> = rendered.iter().map(Vec::len).collect();
    let start = first_visible_element(&heights, scroll_offset, element_index, inner.height as usize);

    let mut lines = Vec::new();
    let mut row = 0usize;
    let viewport_rows = inner.height as usize;
    for (element, element_rows) in elements.iter().zip(rendered).skip(start) {
        if row >= viewport_rows {
            break;
        }
        let visible = element_rows.len().min(viewport_rows - row);
        if let ChatListElement::Message(view) = element {
            let top = inner.y + row as u16;
            layout.rows.push(MessageRowSpan {
                message_id: view.id.clone(),
                top,
                bottom: top + visible.saturating_sub(1) as u16,
            });
        }
        lines.extend(element_rows.into_iter().take(visible));
        row += visible;
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
    layout
}

/// Moves the first drawn element forward until the selected element fits.
fn first_visible_element(
    heights: &[usize],
    scroll_offset: usize,
    selected: Option<usize>,
    viewport_rows: usize,
) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let mut start = scroll_offset.min(heights.len() - 1);
    let Some(selected) = selected else {
        return start;
    };
    if selected < start {
        return selected;
    }
    while start < selected && heights[start..=selected].iter().sum::<usize>() > viewport_rows {
        start += 1;
    }
    start
}

fn render_attachment_picker(frame: &mut Frame<'_>, list_area: Rect, selected: AttachmentKind) {
    let height = AttachmentKind::ALL.len() as u16 + 2;
    let area = Rect {
        x: list_area.x + 1,
        y: list_area.bottom().saturating_sub(height),
        width: ATTACHMENT_PICKER_WIDTH.min(list_area.width.saturating_sub(2)),
        height: height.min(list_area.height),
    };

    let items: Vec<ListItem<'static>> = AttachmentKind::ALL
        .iter()
        .enumerate()
        .map(|(index, kind)| ListItem::new(format!("[{}] {}", index + 1, kind.label())))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Share"))
        .highlight_style(styles::selection_style());
    let mut list_state = ListState::default();
    list_state.select(AttachmentKind::ALL.iter().position(|kind| *kind == selected));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_context_menu(frame: &mut Frame<'_>, viewport: Rect, chat: &ChatSession) {
    let Some(menu) = chat.context_menu() else {
        return;
    };

    let label_width = menu
        .actions
        .iter()
        .map(|action| action.label().chars().count())
        .max()
        .unwrap_or_default() as u16;
    let width = label_width + 4;
    let height = menu.actions.len() as u16 + 2;
    let (x, y) = menu.clamped_position(viewport.width, viewport.height, width, height);
    let area = Rect::new(x, y, width, height).intersection(viewport);

    let items: Vec<ListItem<'static>> = menu
        .actions
        .iter()
        .map(|action| {
            let style = if *action == ContextMenuAction::Delete {
                styles::destructive_menu_item_style()
            } else {
                styles::menu_item_style()
            };
            ListItem::new(Span::styled(format!(" {}", action.label()), style))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(styles::selection_style());
    let mut list_state = ListState::default();
    list_state.select(Some(menu.selected));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut list_state);
}

// =============================================================================
// Toasts and status
// =============================================================================

fn render_toasts(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.right().saturating_sub(width);

    for (offset, toast) in state.toasts().visible().enumerate() {
        let y = area.y + offset as u16;
        if y >= area.bottom() {
            break;
        }
        let toast_area = Rect::new(x, y, width, 1);
        let text = truncate_to_width(&format!(" {} ", toast.to_line()), width as usize);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(text).style(styles::toast_style(toast.is_destructive())),
            toast_area,
        );
    }
}

fn status_line(state: &ShellState) -> String {
    let Some(chat) = state.chat() else {
        return "j/k move | enter open | 1-3 popular | r refresh | q quit".to_owned();
    };

    let hints = match chat.focus() {
        ChatFocus::Messages => {
            "j/k move | i write | r reply | p pin | P jump to pin | m menu | c copy | / search | a share | b back"
        }
        ChatFocus::Composer => "enter send | esc stop typing",
        ChatFocus::Search => "type to filter | enter browse | esc close",
        ChatFocus::ContextMenu => "j/k choose | enter apply | esc close",
        ChatFocus::AttachmentPicker => "1-3 or enter share | esc close",
    };

    if chat.is_sending() {
        format!("{hints} | sending...")
    } else {
        hints.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::*;
    use crate::domain::{
        message::{AuthorProfile, Message},
        notification::Toast,
        room::RoomType,
    };

    const ME: &str = "me";

    fn room(id: &str, name: &str) -> Room {
        Room {
            id: id.to_owned(),
            name: name.to_owned(),
            room_type: RoomType::General,
            is_anonymous: false,
            description: Some("Open floor for everyone".to_owned()),
        }
    }

    fn message(id: &str, user_id: &str, content: &str) -> Message {
        Message {
            id: id.to_owned(),
            room_id: "r1".to_owned(),
            user_id: user_id.to_owned(),
            author: Some(AuthorProfile {
                name: Some("Dana Reyes".to_owned()),
                qualification: Some("Paramedic".to_owned()),
                ..AuthorProfile::default()
            }),
            content: content.to_owned(),
            created_at: Utc::now(),
            is_anonymous: false,
            reply_to: None,
        }
    }

    fn chat_state(messages: Vec<Message>) -> ShellState {
        let mut state = ShellState::with_user(Some(ME.to_owned()));
        state.open_chat(room("r1", "General Discussion"));
        let (room_id, generation) = state.begin_load().expect("room open");
        state
            .chat_mut()
            .expect("room open")
            .accept_messages(&room_id, generation, messages, Some(ME));
        state
    }

    fn draw(state: &mut ShellState, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|frame| render(frame, state))
            .expect("draw should succeed");
        terminal.backend().buffer().clone()
    }

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn home_shows_greeting_stats_and_rooms() {
        let mut state = ShellState::with_user(Some(ME.to_owned()));
        state
            .home_mut()
            .set_ready(vec![room("r1", "General Discussion"), room("r2", "Salary Talk")]);
        state.home_mut().set_stats(CommunityStats {
            rooms: Some(2),
            messages: Some(120),
            members: None,
        });

        let text = screen_text(&draw(&mut state, 80, 30));

        assert!(text.contains("Welcome back, EMR"));
        assert!(text.contains("120 Messages"));
        assert!(text.contains("-- Members"));
        assert!(text.contains("[1]"));
        assert!(text.contains("Salary Talk"));
    }

    #[test]
    fn home_reports_failed_room_load() {
        let mut state = ShellState::default();
        state.home_mut().set_error();

        let text = screen_text(&draw(&mut state, 80, 24));

        assert!(text.contains("Failed to load rooms"));
    }

    #[test]
    fn chat_header_shows_online_placeholder() {
        let mut state = chat_state(vec![message("m1", "u2", "Morning all")]);

        let text = screen_text(&draw(&mut state, 80, 24));

        assert!(text.contains("General Discussion"));
        assert!(text.contains("142 professionals online"));
        assert!(text.contains("Morning all"));
        assert!(text.contains("[PARAMEDIC]"));
    }

    #[test]
    fn render_records_message_rows_for_hit_testing() {
        let mut state = chat_state(vec![
            message("m1", "u2", "First"),
            message("m2", ME, "Second"),
        ]);

        draw(&mut state, 80, 30);

        let layout = state.layout();
        assert_eq!(layout.rows.len(), 2);
        assert!(layout.rows[0].bottom < layout.rows[1].top);
        assert_eq!(layout.message_at(layout.rows[1].top), Some("m2"));
        assert_eq!(layout.viewport_width, 80);
        assert_eq!(layout.viewport_height, 30);
    }

    #[test]
    fn empty_room_invites_first_message() {
        let mut state = chat_state(Vec::new());

        let text = screen_text(&draw(&mut state, 80, 24));

        assert!(text.contains("No messages yet"));
        assert!(state.layout().rows.is_empty());
    }

    #[test]
    fn reply_bar_names_target_author() {
        let mut state = chat_state(vec![message("m1", "u2", "Need a hand?")]);
        state
            .chat_mut()
            .expect("chat open")
            .arm_reply("m1");

        let text = screen_text(&draw(&mut state, 80, 24));

        assert!(text.contains("Replying to Dana Reyes: Need a hand?"));
    }

    #[test]
    fn context_menu_stays_inside_viewport() {
        let mut state = chat_state(vec![message("m1", ME, "Mine")]);
        state
            .chat_mut()
            .expect("chat open")
            .open_context_menu("m1", 79, 23, Some(ME));

        let buffer = draw(&mut state, 80, 24);
        let text = screen_text(&buffer);

        assert!(text.contains(" Reply"));
        assert!(text.contains(" Pin"));
        assert!(text.contains(" Delete"));
    }

    #[test]
    fn destructive_toast_is_drawn_on_top() {
        let mut state = ShellState::default();
        state
            .toasts_mut()
            .push(Toast::destructive("Error sending message"));

        let text = screen_text(&draw(&mut state, 80, 24));

        assert!(text.contains("Error sending message"));
    }

    #[test]
    fn first_visible_element_keeps_selection_on_screen() {
        assert_eq!(first_visible_element(&[3, 3, 3, 3], 0, Some(3), 6), 2);
        assert_eq!(first_visible_element(&[3, 3, 3, 3], 2, Some(0), 6), 0);
        assert_eq!(first_visible_element(&[1, 1], 5, None, 6), 1);
        assert_eq!(first_visible_element(&[], 0, None, 6), 0);
    }

    #[test]
    fn status_line_follows_focus() {
        let mut state = chat_state(vec![message("m1", "u2", "Hi")]);
        assert!(status_line(&state).contains("i write"));

        state
            .chat_mut()
            .expect("chat open")
            .set_focus(ChatFocus::Composer);
        state.begin_send();
        assert_eq!(status_line(&state), "enter send | esc stop typing | sending...");

        assert!(status_line(&ShellState::default()).contains("q quit"));
    }

    #[test]
    fn format_count_uses_placeholder_until_counted() {
        assert_eq!(format_count(None), "--");
        assert_eq!(format_count(Some(42)), "42");
    }
}
