//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, value prompt
//! - **[`screen`]**: the presentation sink the sequencer reports into
//! - **[`panes`]**: stateless render functions for each visible pane (catalog,
//!   info, scene, controls, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it from an
//! [`AppConfig`] and call [`App::run`] to start the event loop.
//!
//! [`AppConfig`]: crate::config::AppConfig
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod screen;
pub mod theme;

pub use app::App;
pub use screen::ScreenSink;
