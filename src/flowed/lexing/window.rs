//! Match window detection
//!
//!     Before a phrase pattern runs, the scanner fixes the stretch of text the pattern is
//!     allowed to see. Single-line phrases see everything up to the next line terminator.
//!     Literal blocks cannot know up front whether they hold an object, an array or a quoted
//!     string, so their window runs to the earliest of all permissible closing delimiters.

/// Delimiters that may close a literal block.
pub const CLOSING_DELIMITERS: &[&str] = &["};", "];", "\";"];

/// End offset (exclusive) of the single-line window starting at `offset`.
///
/// The line terminator is not part of the window, nor is a `\r` right before it.
pub fn line_end(source: &str, offset: usize) -> usize {
    let rest = &source[offset..];
    let end = rest.find('\n').map(|i| offset + i).unwrap_or(source.len());
    if end > offset && source.as_bytes()[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

/// End offset (exclusive) of the literal block whose body starts at `body_start`.
///
/// Returns the end of the earliest closing delimiter, or `None` when the block is never
/// closed.
pub fn block_end(source: &str, body_start: usize) -> Option<usize> {
    let rest = &source[body_start..];
    CLOSING_DELIMITERS
        .iter()
        .filter_map(|delimiter| rest.find(delimiter).map(|i| i + delimiter.len()))
        .min()
        .map(|end| body_start + end)
}
