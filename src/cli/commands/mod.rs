//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Drives the scene builders and the renderer
//! 3. Formats and displays output
//!
//! Handlers receive the resolved [`Verbosity`] and route every status
//! message through [`crate::ui::output`].

mod completion;
mod render;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use render::{render, RenderOptions};

use crate::cli::args::Command;
use crate::ui::output::Verbosity;
use anyhow::Result;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, verbosity: Verbosity) -> Result<()> {
    match command {
        Command::Render {
            types,
            blocks,
            objects,
            output,
            stdout,
            view,
            json,
        } => render(
            RenderOptions {
                types,
                blocks,
                objects,
                output,
                stdout,
                view,
                json,
            },
            verbosity,
        ),
        Command::Completion { shell } => completion(shell),
    }
}
