//! Diff engine for revet.
//!
//! This module turns a raw unified diff into the two artifacts the review
//! pipeline runs on:
//! - annotated diff text where every post-change line carries its line
//!   number, so the model can anchor comments precisely
//! - the set of (path, line) addresses a comment may legally anchor to
//!
//! Along the way it drops file blocks that are not worth reviewing (test
//! files by configured rule, whitespace-only changes) and caps oversized
//! input by keeping the head and tail of the text.
//!
//! The engine is a single synchronous pass with no state between runs;
//! malformed diff content degrades block by block, never into an error.

mod annotate;
mod api;
mod filter;
mod token;
mod truncate;


// Re-export public API
pub use api::{process_diff, EngineOptions, LineAddress, ProcessedDiff};
pub use filter::{ExcludeRule, PathMatcher};
pub use token::DiffLine;
pub use truncate::ELISION_MARKER;
