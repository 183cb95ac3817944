use crate::playback::PlaybackState;
use crate::viz::Highlight;
use ratatui::style::Color;

pub struct Theme {
    #[allow(dead_code)] // terminals keep their own background
    pub bg: Color,
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub warning: Color,   // Yellow
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub bar: Color,   // Unmarked bars, nodes, cells
    pub accent: Color, // Pink for values the user entered
    pub teal: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    bg: Color::Rgb(30, 30, 46),
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    warning: Color::Rgb(249, 226, 175),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    bar: Color::Rgb(116, 199, 236),
    accent: Color::Rgb(245, 194, 231),
    teal: Color::Rgb(148, 226, 213),
};

impl Theme {
    pub fn highlight(&self, highlight: Highlight) -> Color {
        match highlight {
            Highlight::Compare => self.warning,
            Highlight::Swap | Highlight::Rejected | Highlight::Mismatch => self.error,
            Highlight::Sorted | Highlight::Found | Highlight::Tree => self.success,
            Highlight::Pivot => self.accent,
            Highlight::Range => self.comment,
            Highlight::Current => self.secondary,
            Highlight::Visited => self.primary,
            Highlight::Frontier => self.teal,
        }
    }

    /// `base` when unmarked
    pub fn mark_or(&self, highlight: Option<Highlight>, base: Color) -> Color {
        highlight.map(|h| self.highlight(h)).unwrap_or(base)
    }

    pub fn state(&self, state: PlaybackState) -> Color {
        match state {
            PlaybackState::Idle => self.primary,
            PlaybackState::Running => self.secondary,
            PlaybackState::Paused => self.warning,
            PlaybackState::Finished => self.success,
            PlaybackState::Errored => self.error,
        }
    }
}
