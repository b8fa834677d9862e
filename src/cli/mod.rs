use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rubyseek")]
#[command(author, version, about = "Ruby symbol indexing and search CLI")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize rubyseek in the current directory
    Init,

    /// Build the symbol index and print statistics
    Index {
        /// Track full block nesting (end-line spans, control blocks)
        #[arg(long)]
        detail: bool,
    },

    /// Search indexed symbols (name, name@file terms, or @file terms)
    Search {
        /// Search query
        query: String,

        /// Maximum number of symbol groups to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Track full block nesting while indexing
        #[arg(long)]
        detail: bool,
    },

    /// Print the symbol outline of a single file
    Outline {
        /// Ruby file to parse
        file: PathBuf,

        /// Emit JSON instead of indented text
        #[arg(long)]
        json: bool,
    },

    /// Watch for file changes and keep the index current
    Watch {
        /// Debounce delay in milliseconds
        #[arg(short, long, default_value = "500")]
        debounce_ms: u64,
    },
}
