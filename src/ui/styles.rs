//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{role::BadgeTheme, room::RoomType};

// =============================================================================
// Shared chrome
// =============================================================================

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn status_bar_style() -> Style {
    Style::default().fg(Color::Gray).bg(Color::Black)
}

pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

/// Accent colour of a room category.
pub fn room_accent(room_type: &RoomType) -> Color {
    match room_type {
        RoomType::General => Color::Blue,
        RoomType::Salary => Color::Green,
        RoomType::Career => Color::Magenta,
        RoomType::Leadership => Color::Yellow,
        RoomType::Entrepreneurship => Color::LightRed,
        RoomType::Certifications => Color::Cyan,
        RoomType::Students => Color::LightBlue,
        RoomType::Library => Color::LightYellow,
        RoomType::Other(_) => Color::Gray,
    }
}

pub fn room_title_style(room_type: &RoomType) -> Style {
    Style::default()
        .fg(room_accent(room_type))
        .add_modifier(Modifier::BOLD)
}

pub fn room_border_style(room_type: &RoomType) -> Style {
    Style::default().fg(room_accent(room_type))
}

// =============================================================================
// Home styles
// =============================================================================

pub fn greeting_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn stat_value_style() -> Style {
    Style::default()
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD)
}

pub fn stat_label_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn room_description_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Message list styles
// =============================================================================

pub fn message_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn own_sender_style() -> Style {
    Style::default()
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Own bubbles carry the brand colour.
pub fn own_message_text_style() -> Style {
    Style::default().fg(Color::LightRed)
}

pub fn read_receipt_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

pub fn avatar_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Gray)
        .add_modifier(Modifier::BOLD)
}

pub fn reply_preview_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

pub fn missing_reply_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

pub fn pin_marker_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn date_separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn badge_color(theme: BadgeTheme) -> Color {
    match theme {
        BadgeTheme::Slate => Color::Gray,
        BadgeTheme::Rose => Color::LightMagenta,
        BadgeTheme::Emerald => Color::Green,
        BadgeTheme::Blue => Color::Blue,
        BadgeTheme::Sky => Color::LightCyan,
        BadgeTheme::Red => Color::Red,
        BadgeTheme::Amber => Color::Yellow,
        BadgeTheme::Neutral => Color::White,
    }
}

pub fn badge_style(theme: BadgeTheme) -> Style {
    Style::default()
        .fg(badge_color(theme))
        .add_modifier(Modifier::BOLD)
}

// =============================================================================
// Composer, bars and overlays
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::LightRed)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn pinned_banner_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn reply_bar_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

pub fn menu_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn destructive_menu_item_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn toast_style(destructive: bool) -> Style {
    if destructive {
        Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Black).bg(Color::Gray)
    }
}
