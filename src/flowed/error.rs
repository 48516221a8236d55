//! Error types for compiling flowed documents
//!
//!     All three stages report failures through the types in this module:
//!         - [LexicalError]: no catalog phrase starts at an offset (scanner)
//!         - [DecodeError]: a phrase matched but its literal could not be decoded (scanner)
//!         - [SyntaxError]: the token stream does not fit the grammar (grammar engine)
//!
//!     Every error is fatal for the compile call. Presentation is left to callers; the
//!     [CompileError::render] helper formats an error with a numbered source excerpt.

use crate::flowed::token::TokenKind;
use std::fmt::Write as _;

/// No catalog phrase is recognized at `offset`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no recognized phrase at offset {offset}")]
pub struct LexicalError {
    pub offset: usize,
}

/// A matched literal could not be decoded into a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot decode the value of param '{param_id}': {reason}")]
pub struct DecodeError {
    pub param_id: String,
    pub reason: String,
    /// Offset of the phrase the literal belongs to
    pub offset: usize,
}

/// The grammar expected one of `expected` but found `found` (`None` means end of input).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {} but found {} at offset {offset}", describe_expected(.expected), describe_found(.found))]
pub struct SyntaxError {
    pub expected: Vec<TokenKind>,
    pub found: Option<TokenKind>,
    pub offset: usize,
}

/// Failure modes of the scanner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Failure of one `compile` call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// One or more grammar errors; never empty.
    #[error("{} syntax error(s), first: {}", .0.len(), first_of(.0))]
    Syntax(Vec<SyntaxError>),
}

impl From<ScanError> for CompileError {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::Lexical(e) => CompileError::Lexical(e),
            ScanError::Decode(e) => CompileError::Decode(e),
        }
    }
}

impl CompileError {
    /// Offsets of every individual failure, in report order.
    pub fn offsets(&self) -> Vec<usize> {
        match self {
            CompileError::Lexical(e) => vec![e.offset],
            CompileError::Decode(e) => vec![e.offset],
            CompileError::Syntax(errors) => errors.iter().map(|e| e.offset).collect(),
        }
    }

    /// Render the error with a source excerpt for every failure location.
    pub fn render(&self, source: &str) -> String {
        let messages: Vec<String> = match self {
            CompileError::Lexical(e) => vec![e.to_string()],
            CompileError::Decode(e) => vec![e.to_string()],
            CompileError::Syntax(errors) => errors.iter().map(|e| e.to_string()).collect(),
        };

        let mut report = String::new();
        for (message, offset) in messages.iter().zip(self.offsets()) {
            let position = Position::from_offset(source, offset);
            let _ = writeln!(report, "Error at {}: {}", position, message);
            report.push_str(&format_source_context(source, position.line));
            report.push('\n');
        }
        report
    }
}

/// 1-based line and column of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Offsets past the end of `source` clamp to the end.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut clamped = offset.min(source.len());
        while !source.is_char_boundary(clamped) {
            clamped -= 1;
        }
        let before = &source[..clamped];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Format source code context around a 1-based error line
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
pub fn format_source_context(source: &str, error_line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_idx = error_line.saturating_sub(1);

    let start_line = error_idx.saturating_sub(2);
    let end_line = (error_idx + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_idx { ">>" } else { "  " };
        let _ = writeln!(context, "{} {:3} | {}", marker, line_num + 1, line);
    }
    context
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "end of input".to_string(),
        [only] => only.to_string(),
        many => {
            let names: Vec<String> = many.iter().map(|k| k.to_string()).collect();
            format!("one of {}", names.join(", "))
        }
    }
}

fn describe_found(found: &Option<TokenKind>) -> String {
    match found {
        Some(kind) => kind.to_string(),
        None => "end of input".to_string(),
    }
}

fn first_of(errors: &[SyntaxError]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_default()
}
