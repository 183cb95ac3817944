//! TUI pane rendering
//!
//! Every pane is a stateless render function over borrowed app state.
//!
//! # Pane Modules
//!
//! - [`catalog`]: sidebar listing every visualization by category
//! - [`info`]: title, description and the caption of the current checkpoint
//! - [`scene`]: the visualization itself, one renderer per scene kind
//! - [`controls`]: which keys are usable in the current playback state
//! - [`status`]: status bar with state badge, step count and speed
//! - `utils`: shared block and style helpers

mod utils;

pub mod catalog;
pub mod controls;
pub mod info;
pub mod scene;
pub mod status;

pub use catalog::render_catalog_pane;
pub use controls::render_controls_pane;
pub use info::render_info_pane;
pub use scene::render_scene_pane;
pub use status::{render_status_bar, StatusRenderData};
