//! Title, description and caption

use super::utils::{fg, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use crate::viz::VizKind;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render_info_pane(frame: &mut Frame, area: Rect, kind: VizKind, caption: &str, error: Option<&str>) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(kind.title(), fg(DEFAULT_THEME.primary).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  ({})", kind.category().label()), fg(DEFAULT_THEME.comment)),
        ]),
        Line::from(Span::styled(kind.description(), fg(DEFAULT_THEME.comment))),
        Line::default(),
    ];
    match error {
        Some(message) => lines.push(Line::from(Span::styled(
            message.to_string(),
            fg(DEFAULT_THEME.error).add_modifier(Modifier::BOLD),
        ))),
        None => lines.push(Line::from(Span::styled(caption.to_string(), fg(DEFAULT_THEME.fg)))),
    }

    let paragraph = Paragraph::new(lines)
        .block(pane_block("Info", false))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
