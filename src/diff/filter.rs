//! File-block partitioning and exclusion filtering.
//!
//! The token stream is grouped into per-file blocks, then two predicates are
//! applied with short-circuit evaluation: the path predicate first (it needs
//! no scan of the block content), then the blank-only predicate. Excluded
//! blocks are reported by path and reason and removed from the stream before
//! annotation, so they never contribute line addresses.

use crate::error::{Result, RevetError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use super::token::DiffLine;

/// Why a block was removed from the review stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeReason {
    /// Path matched a test-file rule or an exclusion glob.
    TestFile,
    /// Every added/removed line was whitespace-only.
    BlankOnly,
}

/// All diff content belonging to one file: the span from its header to the
/// next file header (or end of input).
///
/// A leading span before any file header forms a block with no path. The
/// path, once set from the header, never changes for the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    /// New-side file path; `None` when the header had no parseable path.
    pub path: Option<String>,
    /// Body tokens of the block (the file header itself is not included).
    pub lines: Vec<DiffLine>,
}

/// A suffix-and-substring exclusion rule, matched case-insensitively.
///
/// The default rule set excludes Go test files: suffix `.go` plus
/// substring `test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeRule {
    /// Path must end with this suffix.
    pub suffix: String,
    /// Path must contain this substring.
    pub substring: String,
}

/// Compiled path predicate for block exclusion.
///
/// Combines the configured suffix+substring rules with optional glob
/// patterns. Compile once per run.
#[derive(Debug)]
pub struct PathMatcher {
    rules: Vec<ExcludeRule>,
    globs: GlobSet,
}

impl PathMatcher {
    /// Compile a matcher from exclusion rules and glob patterns.
    ///
    /// # Errors
    ///
    /// Returns `RevetError::UserError` if a glob pattern fails to compile
    /// (config error, exit 1).
    pub fn new(rules: Vec<ExcludeRule>, glob_patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in glob_patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                RevetError::UserError(format!(
                    "invalid glob pattern in exclude_paths: '{}' - {}\n\
                     Fix: edit .revet.yaml and correct or remove this pattern.",
                    pattern, e
                ))
            })?;
            builder.add(glob);
        }
        let globs = builder.build().map_err(|e| {
            RevetError::UserError(format!("failed to compile exclude_paths globs: {}", e))
        })?;

        Ok(Self { rules, globs })
    }

    /// A matcher that excludes nothing.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            globs: GlobSet::empty(),
        }
    }

    /// Check whether a path is excluded from review.
    pub fn is_excluded(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        let by_rule = self.rules.iter().any(|rule| {
            lower.ends_with(&rule.suffix.to_lowercase())
                && lower.contains(&rule.substring.to_lowercase())
        });
        by_rule || self.globs.is_match(path)
    }
}

/// Result of filtering a block stream: the retained blocks plus the two
/// exclusion reports, each in input order.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Blocks handed on to annotation.
    pub kept: Vec<FileBlock>,
    /// Paths excluded by the path predicate.
    pub excluded_tests: Vec<String>,
    /// Paths excluded as whitespace-only changes.
    pub excluded_blank: Vec<String>,
}

/// Group a token stream into per-file blocks.
pub fn split_blocks(tokens: Vec<DiffLine>) -> Vec<FileBlock> {
    let mut blocks: Vec<FileBlock> = Vec::new();
    let mut current: Option<FileBlock> = None;

    for token in tokens {
        match token {
            DiffLine::FileHeader { path } => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(FileBlock {
                    path,
                    lines: Vec::new(),
                });
            }
            other => {
                // Tokens before the first header belong to a pathless block.
                current
                    .get_or_insert_with(|| FileBlock {
                        path: None,
                        lines: Vec::new(),
                    })
                    .lines
                    .push(other);
            }
        }
    }

    if let Some(block) = current {
        blocks.push(block);
    }

    blocks
}

/// Apply the exclusion predicates to a block stream.
///
/// The path predicate is checked first; blank-only is only evaluated for
/// blocks that pass it. Pathless blocks cannot match either report and are
/// always retained (they produce no addresses downstream anyway).
pub fn filter_blocks(
    blocks: Vec<FileBlock>,
    matcher: &PathMatcher,
    filter_blank: bool,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for block in blocks {
        match classify(&block, matcher, filter_blank) {
            Some(ExcludeReason::TestFile) => {
                if let Some(path) = &block.path {
                    outcome.excluded_tests.push(path.clone());
                }
            }
            Some(ExcludeReason::BlankOnly) => {
                if let Some(path) = &block.path {
                    outcome.excluded_blank.push(path.clone());
                }
            }
            None => outcome.kept.push(block),
        }
    }

    outcome
}

fn classify(
    block: &FileBlock,
    matcher: &PathMatcher,
    filter_blank: bool,
) -> Option<ExcludeReason> {
    let path = block.path.as_deref()?;
    if matcher.is_excluded(path) {
        return Some(ExcludeReason::TestFile);
    }
    if filter_blank && is_blank_only(block) {
        return Some(ExcludeReason::BlankOnly);
    }
    None
}

/// A block is blank-only when it has at least one added/removed line and
/// every added/removed line is empty after trimming. A block with zero
/// changed lines (pure context, e.g. a rename) is not blank-only.
fn is_blank_only(block: &FileBlock) -> bool {
    let mut changed = 0usize;
    for line in &block.lines {
        match line {
            DiffLine::Added(content) | DiffLine::Removed(content) => {
                if !content.trim().is_empty() {
                    return false;
                }
                changed += 1;
            }
            _ => {}
        }
    }
    changed > 0
}
