//! Library half of `podcast-grep`: the episode query engine plus the feed
//! source, configuration, and terminal UI pieces the binary wires together.

pub mod app;
pub mod cli;
pub mod config;
pub mod episode;
pub mod input;
pub mod loader;
pub mod source;
pub mod ui;
