//! Shared colours and chrome

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Borders,
    Frame,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::Component;
use crate::action::Action;

pub const BG_BASE: Color = Color::Rgb(16, 20, 30);
pub const BG_PANEL: Color = Color::Rgb(26, 32, 46);
pub const BG_HIGHLIGHT: Color = Color::Rgb(52, 74, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 238, 244);
pub const TEXT_DIM: Color = Color::Rgb(150, 162, 180);
pub const ACCENT: Color = Color::Rgb(238, 200, 72);
pub const ALERT: Color = Color::Rgb(226, 92, 92);

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// Card colour for a type name; unknown types get the neutral grey.
pub fn type_color(category: &str) -> Color {
    match category {
        "normal" => Color::Rgb(168, 167, 122),
        "fire" => Color::Rgb(238, 129, 48),
        "water" => Color::Rgb(99, 144, 240),
        "grass" => Color::Rgb(122, 199, 76),
        "electric" => Color::Rgb(247, 208, 44),
        "ice" => Color::Rgb(150, 217, 214),
        "fighting" => Color::Rgb(194, 46, 40),
        "poison" => Color::Rgb(163, 62, 161),
        "ground" => Color::Rgb(226, 191, 101),
        "flying" => Color::Rgb(169, 143, 243),
        "psychic" => Color::Rgb(249, 85, 135),
        "bug" => Color::Rgb(166, 185, 26),
        "rock" => Color::Rgb(182, 161, 54),
        "ghost" => Color::Rgb(115, 87, 151),
        "dragon" => Color::Rgb(111, 53, 252),
        "dark" => Color::Rgb(112, 87, 70),
        "steel" => Color::Rgb(183, 183, 206),
        "fairy" => Color::Rgb(214, 133, 173),
        _ => TEXT_DIM,
    }
}

pub fn panel_border(accent: Color) -> BorderStyle {
    BorderStyle {
        borders: Borders::ALL,
        style: Style::default().fg(TEXT_DIM),
        focused_style: Some(Style::default().fg(accent)),
    }
}

/// One-line footer: key hints on the left, status text on the right.
pub fn render_status_bar(frame: &mut Frame, area: Rect, hints: &[StatusBarHint<'_>], status: &str) {
    let status_items = [StatusBarItem::span(Span::styled(
        status,
        Style::default().fg(ACCENT),
    ))];
    let style = StatusBarStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };
    let mut status_bar = StatusBar::new();
    Component::<Action>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::hints(hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        },
    );
}
