//! Stack, queue, list, heap and tree scenes

use crate::ui::panes::utils::{centred, fg};
use crate::ui::theme::DEFAULT_THEME;
use crate::viz::scene::{HeapScene, Marks, SequenceKind, SequenceScene, TreeScene};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as Segment},
        Block, Paragraph,
    },
    Frame,
};

const CELL: usize = 8;

fn cell_style(marks: &Marks, index: usize) -> Style {
    match marks.get(&index) {
        Some(&h) => Style::default()
            .fg(Color::Black)
            .bg(DEFAULT_THEME.highlight(h))
            .add_modifier(Modifier::BOLD),
        None => fg(DEFAULT_THEME.fg),
    }
}

pub(super) fn render_sequence(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &SequenceScene) {
    let muted = fg(DEFAULT_THEME.comment);
    let lines: Vec<Line> = if scene.items.is_empty() {
        let what = match scene.kind {
            SequenceKind::Stack => "(empty stack)",
            SequenceKind::Queue => "(empty queue)",
            SequenceKind::List => "head → null",
        };
        vec![Line::from(Span::styled(what, muted))]
    } else {
        match scene.kind {
            SequenceKind::Stack => {
                let top = scene.items.len() - 1;
                let mut lines = Vec::with_capacity(scene.items.len() + 1);
                for (i, item) in scene.items.iter().enumerate().rev() {
                    let mut spans = vec![
                        Span::styled("│", muted),
                        Span::styled(centred(item, CELL), cell_style(&scene.marks, i)),
                        Span::styled("│", muted),
                    ];
                    if i == top {
                        spans.push(Span::styled(" ← top", fg(DEFAULT_THEME.secondary)));
                    }
                    lines.push(Line::from(spans));
                }
                lines.push(Line::from(Span::styled(format!("└{}┘", "─".repeat(CELL)), muted)));
                lines
            }
            SequenceKind::Queue => {
                let mut spans = vec![Span::styled("front → ", fg(DEFAULT_THEME.secondary))];
                for (i, item) in scene.items.iter().enumerate() {
                    spans.push(Span::styled("[", muted));
                    spans.push(Span::styled(centred(item, CELL - 2), cell_style(&scene.marks, i)));
                    spans.push(Span::styled("] ", muted));
                }
                spans.push(Span::styled("← rear", fg(DEFAULT_THEME.secondary)));
                vec![Line::from(spans)]
            }
            SequenceKind::List => {
                let mut spans = vec![Span::styled("head → ", fg(DEFAULT_THEME.secondary))];
                for (i, item) in scene.items.iter().enumerate() {
                    spans.push(Span::styled("[", muted));
                    spans.push(Span::styled(centred(item, CELL - 2), cell_style(&scene.marks, i)));
                    spans.push(Span::styled("] → ", muted));
                }
                spans.push(Span::styled("null", muted));
                vec![Line::from(spans)]
            }
        }
    };

    let size = format!("size {}", scene.items.len());
    let mut all = vec![Line::from(Span::styled(size, muted)), Line::default()];
    all.extend(lines);
    frame.render_widget(Paragraph::new(all).block(block), area);
}

/// Node drawn on a tree canvas, coordinates in 0..100
struct TreeNode {
    x: f64,
    y: f64,
    label: String,
    style: Style,
}

fn level_y(depth: usize, levels: usize) -> f64 {
    let step = if levels > 1 { 85.0 / (levels - 1) as f64 } else { 0.0 };
    92.0 - depth as f64 * step
}

fn draw_tree(frame: &mut Frame, area: Rect, block: Block<'static>, nodes: Vec<TreeNode>, edges: Vec<(usize, usize)>) {
    let canvas = Canvas::default()
        .block(block)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(move |ctx| {
            for &(a, b) in &edges {
                let (p, c) = (&nodes[a], &nodes[b]);
                ctx.draw(&Segment::new(p.x, p.y, c.x, c.y, DEFAULT_THEME.border_normal));
            }
            ctx.layer();
            for node in &nodes {
                let x = node.x - node.label.chars().count() as f64;
                ctx.print(x, node.y, Span::styled(node.label.clone(), node.style));
            }
        });
    frame.render_widget(canvas, area);
}

fn node_style(marks: &Marks, key: usize) -> Style {
    match marks.get(&key) {
        Some(&h) => fg(DEFAULT_THEME.highlight(h)).add_modifier(Modifier::BOLD),
        None => fg(DEFAULT_THEME.bar),
    }
}

pub(super) fn render_heap(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &HeapScene) {
    let title_line = format!("{}-heap, {} elements", scene.order.label(), scene.items.len());
    if scene.items.is_empty() {
        let muted = fg(DEFAULT_THEME.comment);
        let lines = vec![Line::from(Span::styled(title_line, muted)), Line::from(Span::styled("(empty heap)", muted))];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(block.inner(area));
    frame.render_widget(block, area);

    let levels = usize::BITS as usize - scene.items.len().leading_zeros() as usize;
    let mut nodes = Vec::with_capacity(scene.items.len());
    let mut edges = Vec::new();
    for (i, value) in scene.items.iter().enumerate() {
        let depth = usize::BITS as usize - 1 - (i + 1).leading_zeros() as usize;
        let width = 1usize << depth;
        let pos = i + 1 - width;
        nodes.push(TreeNode {
            x: (pos as f64 + 0.5) / width as f64 * 100.0,
            y: level_y(depth, levels),
            label: value.to_string(),
            style: node_style(&scene.marks, i),
        });
        if i > 0 {
            edges.push(((i - 1) / 2, i));
        }
    }
    draw_tree(frame, rows[0], Block::default(), nodes, edges);

    let mut spans = vec![Span::styled("array: ", fg(DEFAULT_THEME.comment))];
    for (i, value) in scene.items.iter().enumerate() {
        spans.push(Span::styled(value.to_string(), cell_style(&scene.marks, i)));
        spans.push(Span::raw(" "));
    }
    let lines = vec![Line::from(Span::styled(title_line, fg(DEFAULT_THEME.comment))), Line::from(spans)];
    frame.render_widget(Paragraph::new(lines), rows[1]);
}

pub(super) fn render_tree(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &TreeScene) {
    let tree = &scene.tree;
    if tree.is_empty() {
        let paragraph = Paragraph::new("(empty tree)")
            .block(block)
            .style(fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let layout = tree.layout();
    let levels = layout.iter().map(|p| p.depth + 1).max().unwrap_or(1);
    let count = layout.len();
    // slot → index into `nodes`
    let mut index = vec![0; tree.len()];
    let mut nodes = Vec::with_capacity(count);
    for (i, placement) in layout.iter().enumerate() {
        index[placement.slot] = i;
        let value = tree.node(placement.slot).map(|n| n.value).unwrap_or_default();
        nodes.push(TreeNode {
            x: (placement.column as f64 + 0.5) / count as f64 * 100.0,
            y: level_y(placement.depth, levels),
            label: value.to_string(),
            style: node_style(&scene.marks, placement.slot),
        });
    }
    let mut edges = Vec::new();
    for placement in &layout {
        if let Some(node) = tree.node(placement.slot) {
            for child in [node.left, node.right].into_iter().flatten() {
                edges.push((index[placement.slot], index[child]));
            }
        }
    }
    draw_tree(frame, area, block, nodes, edges);
}
