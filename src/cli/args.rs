//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Resolve `@{key}` templates through a tree of referenced variables
#[derive(Parser, Debug)]
#[command(name = "settree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Settings file layered over the global config
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Show each expanded tree with box drawing
    #[arg(short, long)]
    pub tree: bool,

    /// Templates to resolve (default: templates from settings)
    pub templates: Vec<String>,
}
