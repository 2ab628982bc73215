//! Command implementations for revet.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod annotate;
mod review;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Review(args) => review::cmd_review(args),
        Command::Annotate(args) => annotate::cmd_annotate(args),
    }
}
