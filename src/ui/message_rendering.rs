//! Message bubble rendering.
//!
//! Turns presented [`ChatListElement`]s into terminal lines:
//! - own bubbles are right-aligned with a read receipt, others sit behind an
//!   avatar gutter
//! - the author header carries the role badge
//! - replies show a quoted preview above the content
//! - day separators are centered rules
//!
//! Each element renders to a fixed set of lines, so the caller can record
//! which screen rows belong to which message.

use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{
    message_list::{ChatListElement, MessageView, ReplyPreview},
    swipe::MAX_TRACKED_OFFSET_PX,
};

use super::styles;

const SELECTION_MARKER: &str = "▌";
const AVATAR_GUTTER: usize = 4;
const READ_RECEIPT: &str = "✓✓";
const PIN_MARKER: &str = "📌";
const MIN_BUBBLE_WIDTH: usize = 12;
/// Columns a bubble moves at the far end of a swipe.
const MAX_SWIPE_SHIFT: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleLayout {
    /// Width of the list area in columns.
    pub width: usize,
    pub selected: bool,
    /// Rightward displacement while the bubble is being swiped.
    pub shift: usize,
}

/// Columns to displace a bubble for a drag offset in pixels.
pub fn swipe_shift(offset_px: f32) -> usize {
    if offset_px <= 0.0 {
        return 0;
    }
    let ratio = (offset_px / MAX_TRACKED_OFFSET_PX).min(1.0);
    (ratio * MAX_SWIPE_SHIFT).round() as usize
}

pub fn element_lines(
    element: &ChatListElement,
    width: usize,
    selected_id: Option<&str>,
    swiped: Option<(&str, usize)>,
) -> Vec<Line<'static>> {
    match element {
        ChatListElement::DaySeparator(label) => separator_lines(label),
        ChatListElement::Message(view) => {
            let shift = swiped
                .filter(|(id, _)| *id == view.id)
                .map(|(_, shift)| shift)
                .unwrap_or_default();
            bubble_lines(
                view,
                BubbleLayout {
                    width,
                    selected: selected_id == Some(view.id.as_str()),
                    shift,
                },
            )
        }
    }
}

pub fn separator_lines(label: &str) -> Vec<Line<'static>> {
    let line = Line::from(Span::styled(
        format!("——— {label} ———"),
        styles::date_separator_style(),
    ))
    .alignment(Alignment::Center);
    vec![line]
}

pub fn bubble_lines(view: &MessageView, layout: BubbleLayout) -> Vec<Line<'static>> {
    let inner_width = layout
        .width
        .saturating_sub(SELECTION_MARKER.width() + layout.shift + AVATAR_GUTTER);
    let bubble_width = (inner_width * 3 / 4).max(MIN_BUBBLE_WIDTH).min(inner_width.max(1));

    let mut bodies: Vec<Vec<Span<'static>>> = Vec::new();

    if view.flags.show_name {
        bodies.push(header_spans(view));
    }
    if let Some(reply) = &view.reply {
        bodies.push(reply_spans(reply, bubble_width));
    }

    let text_style = if view.is_own {
        styles::own_message_text_style()
    } else {
        styles::message_text_style()
    };
    for text in wrap_text(&view.content, bubble_width) {
        bodies.push(vec![Span::styled(text, text_style)]);
    }
    bodies.push(footer_spans(view));

    let last = bodies.len() - 1;
    bodies
        .into_iter()
        .enumerate()
        .map(|(row, body)| {
            let avatar = (!view.is_own && view.flags.show_avatar && row == last)
                .then(|| view.avatar_initial());
            compose_line(body, view.is_own, avatar, layout)
        })
        .collect()
}

fn header_spans(view: &MessageView) -> Vec<Span<'static>> {
    let name_style = if view.is_own {
        styles::own_sender_style()
    } else {
        styles::message_sender_style()
    };
    let mut spans = vec![Span::styled(view.header_name.clone(), name_style)];
    if let Some(role) = &view.badge {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{}]", role.label()),
            styles::badge_style(role.badge_theme()),
        ));
    }
    spans
}

fn reply_spans(reply: &ReplyPreview, width: usize) -> Vec<Span<'static>> {
    let style = if reply.found {
        styles::reply_preview_style()
    } else {
        styles::missing_reply_style()
    };
    let text = if reply.found {
        format!("↩ {}: {}", reply.author, first_line(&reply.content))
    } else {
        format!("↩ {}", reply.content)
    };
    vec![Span::styled(truncate_to_width(&text, width), style)]
}

fn footer_spans(view: &MessageView) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(view.time.clone(), styles::message_time_style())];
    if view.is_own {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(READ_RECEIPT, styles::read_receipt_style()));
    }
    if view.is_pinned {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(PIN_MARKER, styles::pin_marker_style()));
    }
    spans
}

fn compose_line(
    body: Vec<Span<'static>>,
    is_own: bool,
    avatar: Option<char>,
    layout: BubbleLayout,
) -> Line<'static> {
    let marker = if layout.selected {
        Span::styled(SELECTION_MARKER, styles::own_sender_style())
    } else {
        Span::raw(" ".repeat(SELECTION_MARKER.width()))
    };

    let mut spans = vec![marker];
    if layout.shift > 0 {
        spans.push(Span::raw(" ".repeat(layout.shift)));
    }

    if is_own {
        let used = SELECTION_MARKER.width() + layout.shift + spans_width(&body);
        let padding = layout.width.saturating_sub(used + 1);
        spans.push(Span::raw(" ".repeat(padding)));
    } else {
        match avatar {
            Some(initial) => {
                spans.push(Span::styled(format!("({initial})"), styles::avatar_style()));
                spans.push(Span::raw(" "));
            }
            None => spans.push(Span::raw(" ".repeat(AVATAR_GUTTER))),
        }
    }

    spans.extend(body);
    let line = Line::from(spans);
    if layout.selected {
        line.patch_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        line
    }
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|span| span.content.width()).sum()
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Cuts `text` to at most `width` columns, marking the cut with an ellipsis.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_owned();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Greedy word wrap by display width. Words wider than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for source in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in source.split_whitespace() {
            let word_width = word.width();
            let separator = usize::from(!current.is_empty());

            if current_width + separator + word_width <= width {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += separator + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }

        lines.push(current);
    }

    lines
}
