//! Bar chart for array scenes

use crate::ui::theme::DEFAULT_THEME;
use crate::viz::scene::BarScene;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Bar, BarChart, BarGroup, Block, Paragraph},
    Frame,
};

pub(super) fn render(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &BarScene) {
    if scene.values.is_empty() {
        let paragraph = Paragraph::new("(empty array)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let n = scene.values.len();
    let inner = area.width.saturating_sub(2) as usize;
    let gap = if n * 2 > inner { 0 } else { 1 };
    let width = (inner.saturating_sub(gap * (n - 1)) / n).max(1);
    let max = scene.values.iter().copied().max().unwrap_or(1).max(1) as u64;

    let bars: Vec<Bar> = scene
        .values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let color = DEFAULT_THEME.mark_or(scene.highlight(i), DEFAULT_THEME.bar);
            // labels only fit on wide bars
            let text = if width >= value.to_string().len() {
                value.to_string()
            } else {
                String::new()
            };
            Bar::default()
                .value(value.max(0) as u64)
                .text_value(text)
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(width as u16)
        .bar_gap(gap as u16)
        .max(max);
    frame.render_widget(chart, area);
}
