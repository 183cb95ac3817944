//! Graph scenes: nodes on a circle, traversal lists underneath

use crate::ui::panes::utils::fg;
use crate::ui::theme::DEFAULT_THEME;
use crate::viz::scene::GraphScene;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as Segment},
        Block, Paragraph,
    },
    Frame,
};
use std::f64::consts::PI;

fn position(node: usize, count: usize) -> (f64, f64) {
    let angle = PI / 2.0 - 2.0 * PI * node as f64 / count.max(1) as f64;
    (50.0 + 40.0 * angle.cos(), 50.0 + 40.0 * angle.sin())
}

pub(super) fn render(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &GraphScene) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(block.inner(area));
    frame.render_widget(block, area);

    let graph = scene.graph.clone();
    let node_marks = scene.node_marks.clone();
    let edge_marks = scene.edge_marks.clone();
    let canvas = Canvas::default()
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(move |ctx| {
            let count = graph.node_count();
            for (i, edge) in graph.edges().iter().enumerate() {
                let (x1, y1) = position(edge.from, count);
                let (x2, y2) = position(edge.to, count);
                let color = DEFAULT_THEME.mark_or(edge_marks.get(&i).copied(), DEFAULT_THEME.border_normal);
                ctx.draw(&Segment::new(x1, y1, x2, y2, color));
            }
            ctx.layer();
            for edge in graph.edges() {
                if let Some(weight) = edge.weight {
                    let (x1, y1) = position(edge.from, count);
                    let (x2, y2) = position(edge.to, count);
                    ctx.print(
                        (x1 + x2) / 2.0,
                        (y1 + y2) / 2.0,
                        Span::styled(weight.to_string(), fg(DEFAULT_THEME.comment)),
                    );
                }
            }
            for node in 0..count {
                let (x, y) = position(node, count);
                let color = DEFAULT_THEME.mark_or(node_marks.get(&node).copied(), DEFAULT_THEME.bar);
                ctx.print(
                    x - 1.0,
                    y,
                    Span::styled(format!("({})", graph.label(node)), fg(color).add_modifier(Modifier::BOLD)),
                );
            }
        });
    frame.render_widget(canvas, rows[0]);

    let muted = fg(DEFAULT_THEME.comment);
    let labels = |nodes: &[usize]| {
        nodes
            .iter()
            .map(|&n| scene.graph.label(n))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let mut lines = Vec::new();
    if scene.costs.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("frontier: ", muted),
            Span::styled(labels(&scene.frontier), fg(DEFAULT_THEME.teal)),
        ]));
    } else {
        let costs = scene
            .costs
            .iter()
            .enumerate()
            .map(|(n, c)| match c {
                Some(c) => format!("{}:{}", scene.graph.label(n), c),
                None => format!("{}:∞", scene.graph.label(n)),
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(vec![
            Span::styled("cost: ", muted),
            Span::styled(costs, fg(DEFAULT_THEME.fg)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("order: ", muted),
        Span::styled(scene.order_labels(), fg(DEFAULT_THEME.primary)),
    ]));
    frame.render_widget(Paragraph::new(lines), rows[1]);
}
