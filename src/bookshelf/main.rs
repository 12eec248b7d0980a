//! # Bookshelf CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! The CLI is an interactive session over stdin. Each line is parsed with
//! clap as one command against a single [`bookshelf::api::ShelfApi`], so the
//! shelf lives as long as the session does.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
