//! CLI layer: argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod output;

pub use args::Cli;
pub use commands::execute_command;
