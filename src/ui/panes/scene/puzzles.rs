//! Hanoi rods, text search rows and the Sudoku board

use crate::ui::panes::utils::{centred, fg};
use crate::ui::theme::DEFAULT_THEME;
use crate::viz::hanoi::ROD_NAMES;
use crate::viz::scene::{BoardScene, HanoiScene, Marks, TextScene};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

fn disk(size: u32, width: usize) -> String {
    centred(&"█".repeat(2 * size as usize + 1), width)
}

pub(super) fn render_hanoi(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &HanoiScene) {
    let lifted = usize::from(scene.lifted.is_some());
    let disks = scene.rods.iter().map(Vec::len).sum::<usize>() + lifted;
    let widest = scene
        .rods
        .iter()
        .flatten()
        .copied()
        .chain(scene.lifted.map(|(d, _)| d))
        .max()
        .unwrap_or(1);
    let width = 2 * widest as usize + 5;
    let muted = fg(DEFAULT_THEME.comment);

    let mut lines = Vec::with_capacity(disks + 5);
    lines.push(Line::from(Span::styled(
        format!("Move {} of {}", scene.moves, scene.total_moves),
        muted,
    )));

    // hover row for the disk in flight
    let hover: Vec<Span> = (0..3)
        .map(|rod| match scene.lifted {
            Some((d, r)) if r == rod => Span::styled(disk(d, width), fg(DEFAULT_THEME.secondary)),
            _ => Span::raw(" ".repeat(width)),
        })
        .collect();
    lines.push(Line::from(hover));

    for level in (0..disks.max(1)).rev() {
        let row: Vec<Span> = scene
            .rods
            .iter()
            .map(|rod| match rod.get(level) {
                Some(&d) => Span::styled(disk(d, width), fg(DEFAULT_THEME.bar)),
                None => Span::styled(centred("│", width), muted),
            })
            .collect();
        lines.push(Line::from(row));
    }
    lines.push(Line::from(Span::styled("═".repeat(width * 3), muted)));
    lines.push(Line::from(
        ROD_NAMES
            .iter()
            .map(|name| Span::styled(centred(&name.to_string(), width), fg(DEFAULT_THEME.primary)))
            .collect::<Vec<_>>(),
    ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn char_style(marks: &Marks, index: usize) -> Style {
    match marks.get(&index) {
        Some(&h) => Style::default()
            .fg(Color::Black)
            .bg(DEFAULT_THEME.highlight(h))
            .add_modifier(Modifier::BOLD),
        None => fg(DEFAULT_THEME.fg),
    }
}

pub(super) fn render_text(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &TextScene) {
    let muted = fg(DEFAULT_THEME.comment);
    let label = |s: &'static str| Span::styled(format!("{:<9}", s), muted);

    let mut text = vec![label("text")];
    text.extend(
        scene
            .text
            .iter()
            .enumerate()
            .map(|(i, c)| Span::styled(c.to_string(), char_style(&scene.text_marks, i))),
    );

    let mut pattern = vec![label("pattern"), Span::raw(" ".repeat(scene.offset.unwrap_or(0)))];
    pattern.extend(
        scene
            .pattern
            .iter()
            .enumerate()
            .map(|(i, c)| Span::styled(c.to_string(), char_style(&scene.pattern_marks, i))),
    );

    let ruler: String = (0..scene.text.len()).map(|i| char::from(b'0' + (i % 10) as u8)).collect();
    let matches = if scene.matches.is_empty() {
        String::from("none yet")
    } else {
        scene
            .matches
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let lines = vec![
        Line::from(vec![label("index"), Span::styled(ruler, muted)]),
        Line::from(text),
        Line::from(pattern),
        Line::default(),
        Line::from(vec![label("matches"), Span::styled(matches, fg(DEFAULT_THEME.success))]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub(super) fn render_board(frame: &mut Frame, area: Rect, block: Block<'static>, scene: &BoardScene) {
    let muted = fg(DEFAULT_THEME.comment);
    let rule = |left: &str, mid: &str, right: &str| {
        Line::from(Span::styled(
            format!("{}{}{}{}{}{}{}", left, "─".repeat(9), mid, "─".repeat(9), mid, "─".repeat(9), right),
            muted,
        ))
    };

    let mut lines = vec![rule("┌", "┬", "┐")];
    for (r, row) in scene.cells.iter().enumerate() {
        if r > 0 && r % 3 == 0 {
            lines.push(rule("├", "┼", "┤"));
        }
        let mut spans = vec![Span::styled("│", muted)];
        for (c, &digit) in row.iter().enumerate() {
            let text = if digit == 0 {
                String::from(" · ")
            } else {
                format!(" {} ", digit)
            };
            let style = match scene.marks.get(&(r * 9 + c)) {
                Some(&h) => Style::default()
                    .fg(Color::Black)
                    .bg(DEFAULT_THEME.highlight(h))
                    .add_modifier(Modifier::BOLD),
                None if scene.fixed[r][c] => fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD),
                None if digit == 0 => muted,
                None => fg(DEFAULT_THEME.accent),
            };
            spans.push(Span::styled(text, style));
            if c % 3 == 2 {
                spans.push(Span::styled("│", muted));
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(rule("└", "┴", "┘"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
