use ratatui::style::{Color, Modifier, Style};

use crate::models::{Priority, TaskStatus};

// ── Color palette ──────────────────────────────────────────────────

pub const BG: Color = Color::Rgb(0x0f, 0x11, 0x17);
pub const ACCENT: Color = Color::Rgb(0x63, 0x66, 0xf1);
pub const SLATE: Color = Color::Rgb(0x64, 0x74, 0x8b);
pub const SLATE_LIGHT: Color = Color::Rgb(0x94, 0xa3, 0xb8);
pub const AMBER: Color = Color::Rgb(0xf5, 0x9e, 0x0b);
pub const EMERALD: Color = Color::Rgb(0x10, 0xb9, 0x81);
pub const RED: Color = Color::Rgb(0xef, 0x44, 0x44);
pub const TEXT_DIM: Color = Color::Rgb(0xb0, 0xb0, 0xb0);
pub const TEXT_BRIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const BORDER_DIM: Color = Color::Rgb(0x33, 0x37, 0x48);
pub const BORDER_BRIGHT: Color = ACCENT;

// ── Style presets ──────────────────────────────────────────────────

pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(BORDER_BRIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BORDER_DIM)
    }
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => SLATE,
        TaskStatus::InProgress => AMBER,
        TaskStatus::Done => EMERALD,
    }
}

pub fn status_symbol(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "■",
        TaskStatus::InProgress => "▶",
        TaskStatus::Done => "◉",
    }
}

pub fn priority_style(priority: Priority) -> Style {
    let fg = match priority {
        Priority::Low => SLATE_LIGHT,
        Priority::Medium => AMBER,
        Priority::High => RED,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Parses `#rrggbb` into a terminal colour, falling back to the accent.
pub fn hex_color(hex: &str) -> Color {
    let parsed = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6)
        .and_then(|h| u32::from_str_radix(h, 16).ok());
    match parsed {
        Some(rgb) => Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8),
        None => ACCENT,
    }
}

// ── Progress bar ───────────────────────────────────────────────────

pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent) * width / 100).min(width);
    let empty = width - filled;
    "█".repeat(filled) + &"░".repeat(empty)
}

pub const HEADER_ART: &str = "⚡ TaskFlow";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_empty() {
        assert_eq!(progress_bar(0, 10), "░░░░░░░░░░");
    }

    #[test]
    fn progress_bar_half() {
        assert_eq!(progress_bar(50, 10), "█████░░░░░");
    }

    #[test]
    fn progress_bar_full() {
        assert_eq!(progress_bar(100, 10), "██████████");
    }

    #[test]
    fn status_color_matches_columns() {
        assert_eq!(status_color(TaskStatus::Todo), SLATE);
        assert_eq!(status_color(TaskStatus::InProgress), AMBER);
        assert_eq!(status_color(TaskStatus::Done), EMERALD);
    }

    #[test]
    fn priority_style_returns_correct_fg() {
        assert_eq!(priority_style(Priority::Low).fg, Some(SLATE_LIGHT));
        assert_eq!(priority_style(Priority::High).fg, Some(RED));
    }

    #[test]
    fn hex_color_parses_rgb() {
        assert_eq!(hex_color("#6366f1"), Color::Rgb(0x63, 0x66, 0xf1));
        assert_eq!(hex_color("#10B981"), Color::Rgb(0x10, 0xb9, 0x81));
    }

    #[test]
    fn hex_color_falls_back_on_garbage() {
        assert_eq!(hex_color("red"), ACCENT);
        assert_eq!(hex_color("#12345"), ACCENT);
        assert_eq!(hex_color(""), ACCENT);
    }
}
