//! CLI argument definitions for mvtree.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "mvtree",
    version,
    about = "Resolve Maven dependency trees with nearest-wins conflict resolution",
    long_about = "mvtree collects the transitive dependencies of a request from a Maven \
                  repository layout, resolves version conflicts (nearest wins, with \
                  backtracking over version ranges) and prints the resulting tree."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved dependency tree of a request
    Tree {
        /// Request descriptor (TOML)
        #[arg(short, long)]
        request: PathBuf,
        /// Local Maven repository root
        #[arg(long, env = "MVTREE_REPO")]
        repo: PathBuf,
        /// Keep losing nodes and annotate every node with conflict data
        #[arg(short, long)]
        verbose: bool,
        /// Glyph set used to draw the tree
        #[arg(long, default_value = "standard", value_parser = ["standard", "whitespace", "extended"])]
        tokens: String,
        /// Only keep artifacts matching this pattern (repeatable)
        #[arg(long)]
        include: Vec<String>,
        /// Only show the paths leading to artifacts matching this pattern
        #[arg(long)]
        why: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the version conflict report instead of the tree
        #[arg(long)]
        conflicts: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}
