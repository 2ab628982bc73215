//! Review reply parsing and comment anchoring.
//!
//! The model is asked for a JSON object with a summary and line-anchored
//! comments. Replies are parsed defensively: fenced JSON first, then bare
//! JSON, else the whole reply becomes a plain-text summary. Proposed
//! comments are then checked against the valid address set; an anchor the
//! diff never produced is degraded to a summary note, never dropped and
//! never attached to the wrong line.

use crate::diff::LineAddress;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

/// One proposed inline comment from the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewComment {
    /// File path, expected to match a path from the annotated diff.
    #[serde(default)]
    pub path: String,
    /// Line number in the new version of the file.
    #[serde(default)]
    pub line: usize,
    /// The review remark.
    #[serde(default)]
    pub body: String,
}

impl ReviewComment {
    fn address(&self) -> LineAddress {
        LineAddress {
            path: self.path.clone(),
            line: self.line,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawReview {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    comments: Vec<ReviewComment>,
}

/// A parsed model review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Overall assessment, markdown.
    pub summary: String,
    /// Proposed inline comments, not yet validated against the diff.
    pub comments: Vec<ReviewComment>,
}

const FENCE_PATTERN: &str = r"(?s)```(?:json)?\s*\n(.*?)\n```";

/// Parse the model reply into a structured review.
///
/// Never fails: an unparseable reply degrades to a plain-text summary with
/// no inline comments.
pub fn parse_review(raw: &str) -> Review {
    let text = extract_fenced(raw).unwrap_or_else(|| raw.trim().to_string());

    match serde_json::from_str::<RawReview>(&text) {
        Ok(parsed) => Review {
            summary: parsed
                .summary
                .unwrap_or_else(|| "(no summary returned)".to_string()),
            comments: parsed.comments,
        },
        Err(_) => Review {
            summary: raw.trim().to_string(),
            comments: Vec::new(),
        },
    }
}

/// Extract the body of the first markdown code fence, if any.
fn extract_fenced(raw: &str) -> Option<String> {
    let re = Regex::new(FENCE_PATTERN).ok()?;
    re.captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split proposed comments into those anchored to a real diff line and
/// those whose anchor the diff never produced.
pub fn partition_by_address(
    comments: Vec<ReviewComment>,
    addresses: &HashSet<LineAddress>,
) -> (Vec<ReviewComment>, Vec<ReviewComment>) {
    comments
        .into_iter()
        .partition(|comment| addresses.contains(&comment.address()))
}

/// Append unanchorable comments to the summary as plain notes.
pub fn append_skipped(summary: &str, skipped: &[ReviewComment]) -> String {
    if skipped.is_empty() {
        return summary.to_string();
    }

    let mut out = String::from(summary);
    out.push_str("\n\n### Other findings\n\n");
    for comment in skipped {
        out.push_str(&format!(
            "- **{}:{}** - {}\n",
            comment.path, comment.line, comment.body
        ));
    }
    out
}
