//! Status bar rendering with keybindings and state badge

use crate::playback::PlaybackState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub state: PlaybackState,
    /// Checkpoints presented in the current run
    pub step: usize,
    pub delay_ms: u128,
    /// Prompt text while the input line is open
    pub prompt: Option<(&'a str, &'a str)>,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let bar_bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let badge_color = if data.prompt.is_some() {
        DEFAULT_THEME.secondary
    } else {
        DEFAULT_THEME.state(data.state)
    };
    let badge = match data.prompt {
        Some(_) => String::from(" ⌨ INPUT "),
        None => format!(" {} ", data.state.label().to_uppercase()),
    };

    let mut left_spans = vec![
        Span::styled(
            badge,
            Style::default()
                .bg(badge_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", bar_bg.fg(DEFAULT_THEME.comment)),
    ];
    match data.prompt {
        Some((label, buffer)) => {
            left_spans.push(Span::styled(format!(" {}: ", label), bar_bg.fg(DEFAULT_THEME.fg)));
            left_spans.push(Span::styled(
                format!("{}█", buffer),
                bar_bg.fg(DEFAULT_THEME.accent),
            ));
        }
        None => {
            left_spans.push(Span::styled(
                format!(" Step {} ", data.step),
                bar_bg.fg(DEFAULT_THEME.primary),
            ));
            left_spans.push(Span::styled(
                format!(" {} ", data.message),
                bar_bg.fg(if data.state == PlaybackState::Errored {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
            ));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar_bg)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_bg.fg(DEFAULT_THEME.fg);
    let sep_style = bar_bg.fg(DEFAULT_THEME.comment);

    let right_spans = if data.prompt.is_some() {
        vec![
            Span::styled(" ↵ ", key_style),
            Span::styled(" submit ", desc_style),
            Span::styled("│", sep_style),
            Span::styled(" ", desc_style),
            Span::styled(" esc ", key_style),
            Span::styled(" cancel ", desc_style),
        ]
    } else {
        vec![
            Span::styled(format!(" delay {} ms ", data.delay_ms), desc_style),
            Span::styled("│", sep_style),
            Span::styled(" ", desc_style),
            Span::styled(" ↑/↓ ↵ ", key_style),
            Span::styled(" choose ", desc_style),
            Span::styled("│", sep_style),
            Span::styled(" ", desc_style),
            Span::styled("q", key_style),
            Span::styled(" quit ", desc_style),
        ]
    };

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar_bg)
            .alignment(Alignment::Right),
        layout[1],
    );
}
