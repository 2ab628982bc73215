//! CLI argument parsing for revet.
//!
//! Uses clap derive macros for declarative argument definitions. This
//! module defines the command structure; actual implementations are in the
//! `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Revet: AI-assisted pull request reviewer.
///
/// Fetches a PR diff through the GitHub CLI, numbers every post-change
/// line, filters out test files and whitespace-only changes, asks a review
/// model for findings, and prints or publishes the result with inline
/// comments anchored to verified lines.
#[derive(Parser, Debug)]
#[command(name = "revet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for revet.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review a pull request.
    ///
    /// Runs the full pipeline: fetch PR metadata and diff, annotate and
    /// filter, call the review model, print the result, and optionally
    /// publish it as a PR review.
    Review(ReviewArgs),

    /// Annotate a diff without calling the model.
    ///
    /// Reads unified diff text from a file (or stdin), applies truncation
    /// and filtering, and prints the line-numbered diff. Exclusions are
    /// reported on stderr.
    Annotate(AnnotateArgs),
}

/// Arguments for the `review` command.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// PR number to review.
    pub pr_number: u64,

    /// Override the configured model.
    #[arg(long)]
    pub model: Option<String>,

    /// Publish the result as a PR review (summary + inline comments).
    #[arg(long)]
    pub post_comment: bool,

    /// Override the maximum diff size in characters.
    #[arg(long)]
    pub max_diff_chars: Option<usize>,

    /// Path to a config file (default: ./.revet.yaml if present).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `annotate` command.
#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// Diff file to annotate. Reads stdin when omitted.
    pub path: Option<PathBuf>,

    /// Override the maximum diff size in characters.
    #[arg(long)]
    pub max_diff_chars: Option<usize>,

    /// Keep every file block: skip the test-file and whitespace-only
    /// exclusions.
    #[arg(long)]
    pub no_filter: bool,

    /// Path to a config file (default: ./.revet.yaml if present).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
