//! Line addressing: numbering the post-change lines of retained blocks.
//!
//! For every added or context line the annotator emits the line prefixed
//! with its line number in the new version of the file, and records the
//! (path, line) pair as a valid anchor for an inline comment. Removed lines
//! have no post-change position and get a blank number field.

use std::collections::HashSet;

use super::api::LineAddress;
use super::filter::FileBlock;
use super::token::DiffLine;

/// Annotate the retained blocks, producing the numbered diff text and the
/// set of line addresses eligible for inline comments.
///
/// A block containing a hunk header whose new-file start could not be parsed
/// is emitted unannotated and contributes no addresses: a damaged block must
/// never produce a wrong anchor. A block with no path is numbered normally
/// but likewise contributes no addresses.
pub(super) fn annotate_blocks(blocks: &[FileBlock]) -> (String, HashSet<LineAddress>) {
    let mut out: Vec<String> = Vec::new();
    let mut addresses = HashSet::new();

    for block in blocks {
        out.push(String::new());
        out.push(format!(
            "=== File: {} ===",
            block.path.as_deref().unwrap_or("(unknown)")
        ));

        if has_malformed_hunk_header(block) {
            for line in &block.lines {
                out.push(raw_line(line));
            }
            continue;
        }

        annotate_block(block, &mut out, &mut addresses);
    }

    (out.join("\n"), addresses)
}

fn annotate_block(block: &FileBlock, out: &mut Vec<String>, addresses: &mut HashSet<LineAddress>) {
    let mut next_line = 0usize;
    let mut in_hunk = false;

    for line in &block.lines {
        match line {
            DiffLine::HunkHeader { new_start, raw } => {
                // Checked by the caller; a None here cannot be reached.
                if let Some(start) = new_start {
                    next_line = *start;
                }
                in_hunk = true;
                out.push(raw.clone());
            }
            _ if !in_hunk => {
                // Stray content between file header and first hunk.
            }
            DiffLine::Added(_) | DiffLine::Context(_) => {
                out.push(format!("  {:>4} | {}", next_line, raw_line(line)));
                if let Some(path) = &block.path {
                    addresses.insert(LineAddress {
                        path: path.clone(),
                        line: next_line,
                    });
                }
                next_line += 1;
            }
            DiffLine::Removed(_) => {
                out.push(format!("       | {}", raw_line(line)));
            }
            DiffLine::NoNewline(raw) => {
                out.push(raw.clone());
            }
            DiffLine::FileHeader { .. } => {
                // Block bodies never contain file headers; splitting
                // consumed them.
            }
        }
    }
}

fn has_malformed_hunk_header(block: &FileBlock) -> bool {
    block.lines.iter().any(|line| {
        matches!(
            line,
            DiffLine::HunkHeader {
                new_start: None,
                ..
            }
        )
    })
}

/// Reconstruct the raw diff line for a token.
fn raw_line(line: &DiffLine) -> String {
    match line {
        DiffLine::FileHeader { path } => match path {
            Some(path) => format!("diff --git a/{} b/{}", path, path),
            None => "diff --git".to_string(),
        },
        DiffLine::HunkHeader { raw, .. } => raw.clone(),
        DiffLine::Added(content) => format!("+{}", content),
        DiffLine::Removed(content) => format!("-{}", content),
        DiffLine::Context(raw) => raw.clone(),
        DiffLine::NoNewline(raw) => raw.clone(),
    }
}
