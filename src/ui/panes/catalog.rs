//! Visualization catalog sidebar

use super::utils::{fg, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use crate::viz::{Category, VizKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

/// Render the catalog with category headings.
///
/// `cursor` indexes [`VizKind::ALL`]; `active` is the kind currently loaded.
pub fn render_catalog_pane(frame: &mut Frame, area: Rect, cursor: usize, active: VizKind, focused: bool) {
    let mut items = Vec::new();
    let mut cursor_row = 0;
    let mut category: Option<Category> = None;

    for (i, kind) in VizKind::ALL.iter().enumerate() {
        if category != Some(kind.category()) {
            category = Some(kind.category());
            items.push(ListItem::new(Line::from(Span::styled(
                kind.category().label(),
                fg(DEFAULT_THEME.comment).add_modifier(Modifier::BOLD),
            ))));
        }
        if i == cursor {
            cursor_row = items.len();
        }
        let marker = if *kind == active { "● " } else { "  " };
        let style = if *kind == active {
            fg(DEFAULT_THEME.success)
        } else {
            fg(DEFAULT_THEME.fg)
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(kind.title(), style),
        ])));
    }

    let list = List::new(items)
        .block(pane_block("Visualizations", focused))
        .highlight_style(
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");
    let mut state = ListState::default();
    state.select(Some(cursor_row));
    frame.render_stateful_widget(list, area, &mut state);
}
