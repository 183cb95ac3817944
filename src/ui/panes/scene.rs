//! The visualization pane: one renderer per scene kind

mod bars;
mod graph;
mod puzzles;
mod structures;

use super::utils::pane_block;
use crate::viz::{Checkpoint, Scene};
use ratatui::{layout::Rect, Frame};

pub fn render_scene_pane(frame: &mut Frame, area: Rect, title: &str, checkpoint: &Checkpoint) {
    let block = pane_block(title, true);
    match &checkpoint.scene {
        Scene::Bars(scene) => bars::render(frame, area, block, scene),
        Scene::Sequence(scene) => structures::render_sequence(frame, area, block, scene),
        Scene::Heap(scene) => structures::render_heap(frame, area, block, scene),
        Scene::Tree(scene) => structures::render_tree(frame, area, block, scene),
        Scene::Graph(scene) => graph::render(frame, area, block, scene),
        Scene::Hanoi(scene) => puzzles::render_hanoi(frame, area, block, scene),
        Scene::Text(scene) => puzzles::render_text(frame, area, block, scene),
        Scene::Board(scene) => puzzles::render_board(frame, area, block, scene),
    }
}
