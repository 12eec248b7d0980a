use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", bin_name = "bookshelf", version)]
#[command(about = "Keep a shelf of books, archive the ones you are done with", long_about = None)]
pub struct Cli {
    /// Directory holding config.json
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(
    name = "bookshelf",
    no_binary_name = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Line {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Show the books tab
    #[command(alias = "ls")]
    List,

    /// Show the archived tab
    Archived,

    /// Search the current tab (no term clears the search)
    #[command(alias = "s")]
    Search { term: Vec<String> },

    /// Sort the current tab by a column; repeating a column flips the direction
    Sort {
        /// Column key (id, name, archivedAt)
        column: String,

        direction: Option<Direction>,
    },

    /// Move between pages: next, prev, first, last or a page number
    Page { target: String },

    /// Rows per page
    PageSize { size: usize },

    /// Edit the book in a row of the current page
    Select { row: usize },

    /// Drop the selection and start a new book
    Clear,

    /// Create a book
    #[command(alias = "n")]
    New {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Save the form under a new name (updates the selected book)
    Save {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Archive the book in a row of the books tab
    #[command(alias = "rm")]
    Archive { row: usize },

    /// Restore the book in a row of the archived tab
    Restore { row: usize },

    /// Delete the book in a row of the archived tab for good
    Purge {
        row: usize,

        /// Confirm the permanent delete
        #[arg(long)]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (latency-ms, page-size, page-size-options, seed)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Asc,
    Desc,
}

/// Splits a session line into words.
///
/// Double quotes group words; there is no escaping.
pub fn split_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(current);
    }
    words
}
