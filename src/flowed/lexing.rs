//! Lexing module for the flowed language
//!
//!     The scanner turns raw source text into a flat sequence of phrase tokens. It does not
//!     split text into words first: at every offset it asks the catalog, in priority order,
//!     which phrase starts there, and each candidate matches directly against the raw text.
//!
//!     Scanning proceeds left to right:
//!         1. Skip whitespace (space, tab, carriage return, newline).
//!         2. Try every catalog kind at the current offset. Each kind first checks its leading
//!            words, then fixes its match window (see [window]) and runs its full pattern (see
//!            [matchers]). Payloads are decoded as part of the match (see [literal]).
//!         3. The first kind that matches produces the token; scanning resumes right after it.
//!         4. If no kind matches, scanning stops with a [LexicalError] at that offset.
//!
//!     A [Scanner] holds the position of exactly one scan. Build a new one per source text.

pub mod literal;
pub mod matchers;
pub mod window;

use crate::flowed::error::{LexicalError, ScanError};
use crate::flowed::token::{Token, CATALOG};
use tracing::trace;

/// Tokenize a complete source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScanError> {
    Scanner::new(source).collect()
}

/// Incremental scanner over one source text.
///
/// Yields tokens in source order. After the first error the scanner is exhausted.
pub struct Scanner<'s> {
    source: &'s str,
    offset: usize,
    failed: bool,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            offset: 0,
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.offset..];
        let trimmed = rest.trim_start_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'));
        self.offset += rest.len() - trimmed.len();
    }

    fn scan_token(&mut self) -> Result<Token, ScanError> {
        let start = self.offset;
        for kind in CATALOG {
            if let Some(matched) = matchers::match_kind(*kind, self.source, start)? {
                trace!(kind = %kind, start, end = matched.end, "token");
                self.offset = matched.end;
                return Ok(Token::new(start..matched.end, matched.payload));
            }
        }
        Err(LexicalError { offset: start }.into())
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_whitespace();
        if self.offset >= self.source.len() {
            return None;
        }
        let result = self.scan_token();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
