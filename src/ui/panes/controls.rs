//! Key list with enabled/disabled styling

use super::utils::{fg, pane_block};
use crate::playback::Controls;
use crate::ui::theme::DEFAULT_THEME;
use crate::viz::VizKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

fn entry(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black),
            fg(DEFAULT_THEME.fg),
        )
    } else {
        (
            fg(DEFAULT_THEME.comment).add_modifier(Modifier::CROSSED_OUT),
            fg(DEFAULT_THEME.comment),
        )
    };
    vec![
        Span::styled(format!(" {} ", key), key_style),
        Span::styled(format!(" {}  ", label), label_style),
    ]
}

pub fn render_controls_pane(
    frame: &mut Frame,
    area: Rect,
    kind: VizKind,
    controls: Controls,
    speed: f64,
    size: usize,
) {
    let mut playback = Vec::new();
    if kind.can_start() {
        playback.extend(entry("s", "start", controls.start));
    }
    playback.extend(entry("⎵", &controls.pause_label.to_lowercase(), controls.pause));
    playback.extend(entry("r", "reset", controls.reset));
    playback.extend(entry("+/-", &format!("speed {:.0}", speed), controls.speed));
    if kind.size_relevant() {
        playback.extend(entry("[/]", &format!("size {}", size), controls.size));
    }

    let mut operations = Vec::new();
    for spec in kind.operations() {
        operations.extend(entry(&spec.key.to_string(), spec.label, controls.operations));
    }

    let mut lines = vec![Line::from(playback)];
    if !operations.is_empty() {
        lines.push(Line::from(operations));
    }

    let paragraph = Paragraph::new(lines)
        .block(pane_block("Controls", false))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
