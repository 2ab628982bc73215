//! Character-budget truncation of raw diff text.
//!
//! Runs before any parsing, so a cut can land mid-line or mid-hunk; the
//! annotator's malformed-hunk-header rule absorbs that without repair.

use std::borrow::Cow;

/// Marker inserted where the middle of an oversized diff was elided.
pub const ELISION_MARKER: &str = "\n\n... [diff truncated: middle omitted] ...\n\n";

/// Cap diff text at `max_chars` characters, keeping the head and tail.
///
/// Input within budget is returned borrowed and unchanged. Over budget, the
/// first `max_chars / 2` and last `max_chars / 2` characters are kept around
/// the elision marker. Counting is by character, so the cut never splits a
/// UTF-8 sequence.
pub fn truncate(diff: &str, max_chars: usize) -> Cow<'_, str> {
    let total = diff.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(diff);
    }

    let half = max_chars / 2;
    let head_end = byte_offset_of_char(diff, half);
    let tail_start = byte_offset_of_char(diff, total - half);

    let mut out = String::with_capacity(head_end + ELISION_MARKER.len() + (diff.len() - tail_start));
    out.push_str(&diff[..head_end]);
    out.push_str(ELISION_MARKER);
    out.push_str(&diff[tail_start..]);
    Cow::Owned(out)
}

/// Byte offset of the `n`-th character (or the end of the string).
fn byte_offset_of_char(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}
