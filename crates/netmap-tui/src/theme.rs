//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(189, 147, 249); // #bd93f9
pub const CYAN: Color = Color::Rgb(139, 233, 253); // #8be9fd
pub const AMBER: Color = Color::Rgb(255, 184, 108); // #ffb86c
pub const ONLINE_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const OFFLINE_RED: Color = Color::Rgb(255, 85, 85); // #ff5555
pub const TEXT: Color = Color::Rgb(220, 222, 232); // #dcdee8
pub const MUTED: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_PANEL: Color = Color::Rgb(33, 34, 44); // #21222c
pub const BG_SELECTED: Color = Color::Rgb(68, 71, 90); // #44475a

/// Inbound / outbound chart series.
pub const SERIES_IN: Color = CYAN;
pub const SERIES_OUT: Color = AMBER;

// ── Semantic styles ───────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

/// Online/offline marker color.
pub fn status(online: bool) -> Style {
    Style::default().fg(if online { ONLINE_GREEN } else { OFFLINE_RED })
}

/// Tags that can promote the device.
pub fn promotable_tag() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}
