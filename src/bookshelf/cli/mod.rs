//! # CLI Behavior
//!
//! This is **one possible UI client** for bookshelf, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Session
//!
//! `bookshelf` starts a session on the books tab and reads commands from
//! stdin, one per line. Every command reprints the current tab. Actions wait
//! out the configured latency before the table updates, and their
//! notifications are printed once they settle.
//!
//! Rows are addressed by their number on the current page, starting at 1.
//! `purge` only deletes for good when given `--yes`.
//!
//! ## Module Structure
//!
//! - `commands`: Session loop and per-command handlers
//! - `render`: Table, tab and message formatting
//! - `setup`: Argument and line parsing via clap
//! - `logging`: tracing subscriber setup

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
