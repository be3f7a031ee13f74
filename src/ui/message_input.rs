//! Single-line text field rendering, shared by the composer and search bar.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::text_field::TextField;

use super::styles;

pub const COMPOSER_PLACEHOLDER: &str = "Press 'i' to type a message...";
pub const SEARCH_PLACEHOLDER: &str = "Search messages...";

const PROMPT_SYMBOL: &str = "> ";

pub struct InputField<'a> {
    pub state: &'a TextField,
    pub title: &'a str,
    pub placeholder: &'a str,
    pub is_focused: bool,
}

pub fn render_input(frame: &mut Frame<'_>, area: Rect, field: InputField<'_>) {
    let border_style = if field.is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let line = build_input_line(field.state, field.placeholder, field.is_focused);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(field.title.to_owned())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if field.is_focused {
        let (x, y) = cursor_position(area, field.state);
        frame.set_cursor_position((x, y));
    }
}

/// Cursor cell inside the bordered field, measured in display width.
fn cursor_position(area: Rect, state: &TextField) -> (u16, u16) {
    let offset = (PROMPT_SYMBOL.width() + state.before_cursor().width()).min(u16::MAX as usize) as u16;
    let max_x = area.right().saturating_sub(2);
    let x = area.x.saturating_add(1).saturating_add(offset).min(max_x);
    (x, area.y.saturating_add(1))
}

fn build_input_line(
    state: &TextField,
    placeholder: &str,
    is_focused: bool,
) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if state.is_empty() && !is_focused {
        return Line::from(vec![
            prompt,
            Span::styled(placeholder.to_owned(), styles::input_placeholder_style()),
        ]);
    }

    Line::from(vec![
        prompt,
        Span::styled(state.text().to_owned(), styles::input_text_style()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn shows_placeholder_when_empty_and_unfocused() {
        let state = TextField::composer();
        let line = build_input_line(&state, COMPOSER_PLACEHOLDER, false);

        let text = text_of(&line);
        assert!(text.starts_with(PROMPT_SYMBOL));
        assert!(text.contains(COMPOSER_PLACEHOLDER));
    }

    #[test]
    fn hides_placeholder_when_focused() {
        let state = TextField::composer();
        let line = build_input_line(&state, SEARCH_PLACEHOLDER, true);

        assert_eq!(text_of(&line), PROMPT_SYMBOL);
    }

    #[test]
    fn keeps_draft_visible_when_unfocused() {
        let mut state = TextField::composer();
        state.insert('H');
        state.insert('i');

        let line = build_input_line(&state, COMPOSER_PLACEHOLDER, false);

        assert_eq!(text_of(&line), "> Hi");
    }

    #[test]
    fn cursor_accounts_for_wide_characters() {
        let mut state = TextField::composer();
        state.insert('医');
        state.insert('a');

        let (x, y) = cursor_position(Rect::new(0, 10, 40, 3), &state);

        assert_eq!(x, 1 + 2 + 2 + 1);
        assert_eq!(y, 11);
    }

    #[test]
    fn cursor_stays_inside_narrow_field() {
        let mut state = TextField::composer();
        for _ in 0..30 {
            state.insert('x');
        }

        let (x, _) = cursor_position(Rect::new(0, 0, 10, 3), &state);

        assert_eq!(x, 8);
    }
}
