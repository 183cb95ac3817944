//! # Introduction
//!
//! stepviz plays classic algorithms and data structures one step at a time
//! in a terminal UI built with [ratatui](https://docs.rs/ratatui). Every
//! algorithm is written as a resumable step machine that hands out
//! checkpoints; a single-threaded sequencer paces them with a configurable
//! delay and can be paused, resumed and reset at any point.
//!
//! ## Playback pipeline
//!
//! ```text
//! Model → Factory → StepProducer → Sequencer → PresentationSink → TUI
//! ```
//!
//! 1. [`viz`]: the visualization catalog, per-kind models and the
//!    algorithms themselves, each yielding [`viz::Checkpoint`]s.
//! 2. [`producer`]: the [`producer::StepProducer`] contract and the
//!    [`producer::Machine`] driver the algorithms are written against.
//! 3. [`playback`]: the five-state lifecycle, the speed to delay mapping
//!    and the [`playback::Sequencer`] that owns the session.
//! 4. [`config`]: `config.toml` loading and validation.
//! 5. [`headless`]: the sequencer driven without a terminal, printing
//!    captions to a writer.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Catalog
//!
//! Sorting: bubble, selection, insertion, merge, quick and heap sort.
//! Structures: stack, queue, min/max heap, linked list, binary search tree.
//! Also Tower of Hanoi, BFS, DFS, Prim's MST, naive string search and a
//! backtracking Sudoku solver.

pub mod config;
pub mod headless;
pub mod playback;
pub mod producer;
pub mod ui;
pub mod viz;
