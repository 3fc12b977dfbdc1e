//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Heapdot - Diagrams tri-color allocator bookkeeping as Graphviz DOT
#[derive(Parser, Debug)]
#[command(name = "heapdot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the allocator bookkeeping scene as DOT text
    #[command(
        name = "render",
        long_about = "Render the allocator bookkeeping scene as DOT text.\n\n\
            Builds an example graph of mark/sweep allocator internals - a type \
            table, memory blocks, and objects tagged white, ecru, grey, or black - \
            and writes it as a Graphviz DOT file. Without --output, files are \
            named dot1.dot, dot2.dot, ... in the output directory, skipping names \
            that already exist.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Write the default scene to the next free dot<N>.dot
    heapdot render

    # Pick the file name, then open it with the configured viewer
    heapdot render --output heap.dot --view

    # A bigger scene: three types, four blocks each, twelve objects each
    heapdot render --types 3 --blocks 4 --objects 12

    # Pipe straight into Graphviz
    heapdot render --stdout | dot -Tpng -o heap.png

CONFIGURATION:
    The viewer command comes from $HEAPDOT_VIEWER or the 'viewer' key in
    the config file; with neither set, --view falls back to the system
    opener. The 'output_dir' key chooses where dot<N>.dot files land."
    )]
    Render {
        /// Number of allocation types in the scene
        #[arg(long, default_value = "1")]
        types: usize,

        /// Number of blocks per type
        #[arg(long, default_value = "2")]
        blocks: usize,

        /// Number of objects per type
        #[arg(long, default_value = "8")]
        objects: usize,

        /// Write to this file instead of the next free dot<N>.dot
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Write the DOT text to stdout instead of a file
        #[arg(long, conflicts_with_all = ["output", "view", "json"])]
        stdout: bool,

        /// Open the written file with the configured viewer
        #[arg(long)]
        view: bool,

        /// Print a machine-readable summary of what was written
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for Heapdot \
            commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    heapdot completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    heapdot completion zsh >> ~/.zshrc

    # Fish
    heapdot completion fish > ~/.config/fish/completions/heapdot.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
