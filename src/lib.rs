//! Causerie is a terminal-first chat interface for a single conversation.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the message model, the chat store and its transitions,
//!   the composer editing state, draft attachments, and configuration.
//! - [`render`] is the Markdown renderer: a pure, total function from raw
//!   message text to an HTML-safe fragment, shared by the CLI and the
//!   transcript export.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`cli`] parses command-line arguments and dispatches into the chat
//!   loop or the one-shot render/export commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod render;
pub mod ui;
pub mod utils;
