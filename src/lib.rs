pub mod cli;
pub mod commands;
pub mod config;
pub mod index;
pub mod logging;
pub mod parser;
pub mod search;
pub mod watcher;

pub use config::Config;
pub use index::SymbolIndex;
