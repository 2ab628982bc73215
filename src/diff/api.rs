//! Public API for the diff engine.

use std::borrow::Cow;
use std::collections::HashSet;

use super::annotate::annotate_blocks;
use super::filter::{self, PathMatcher};
use super::token;
use super::truncate;

/// An addressable line in the post-change version of a file: the anchor for
/// an inline comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineAddress {
    /// Repository-relative file path as it appears in the diff.
    pub path: String,
    /// Line number in the new file (1-based).
    pub line: usize,
}

/// Options for one engine run. There are no process-wide defaults: every
/// run owns its configuration.
#[derive(Debug)]
pub struct EngineOptions {
    /// Maximum diff size in characters before head/tail truncation.
    pub max_chars: usize,
    /// Compiled path predicate for block exclusion.
    pub matcher: PathMatcher,
    /// Whether to drop blocks whose only changes are whitespace.
    pub filter_blank: bool,
}

/// Output of one engine run over a diff.
#[derive(Debug, Default)]
pub struct ProcessedDiff {
    /// The diff with every addressable line numbered and each file span
    /// introduced by a `=== File: <path> ===` marker.
    pub annotated: String,
    /// Every (path, line) pair a comment may anchor to. A proposed anchor
    /// not in this set must be degraded to a non-anchored note.
    pub addresses: HashSet<LineAddress>,
    /// Paths excluded by the path predicate, in input order.
    pub excluded_tests: Vec<String>,
    /// Paths excluded as whitespace-only changes, in input order.
    pub excluded_blank: Vec<String>,
    /// Whether the input exceeded the budget and was truncated.
    pub truncated: bool,
}

/// Run the full engine pipeline over raw diff text: truncate, partition
/// into file blocks, filter, annotate.
///
/// One synchronous pass, no shared state between runs. Malformed input
/// never produces an error: a damaged block is excluded from numbering and
/// the rest of the diff is processed normally.
pub fn process_diff(diff: &str, options: &EngineOptions) -> ProcessedDiff {
    let bounded = truncate::truncate(diff, options.max_chars);
    let truncated = matches!(bounded, Cow::Owned(_));

    let tokens = token::tokenize(&bounded);
    let blocks = filter::split_blocks(tokens);
    let outcome = filter::filter_blocks(blocks, &options.matcher, options.filter_blank);
    let (annotated, addresses) = annotate_blocks(&outcome.kept);

    ProcessedDiff {
        annotated,
        addresses,
        excluded_tests: outcome.excluded_tests,
        excluded_blank: outcome.excluded_blank,
        truncated,
    }
}
