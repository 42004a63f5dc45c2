//! Terminal Hacker News reader.
//!
//! The crate is split into four layers:
//!
//! - [`api`] - the read-only HN item gateway (list ids, fetch story, fetch comment)
//! - [`loader`] - pagination, per-row story loading, and the depth-first
//!   comment tree loader with its keyed state cache
//! - [`app`] - application state and the event types background tasks emit
//! - [`ui`] - the ratatui event loop, input handling, and widgets

pub mod api;
pub mod app;
pub mod config;
pub mod loader;
pub mod ui;
pub mod util;
