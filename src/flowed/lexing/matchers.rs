//! Phrase patterns and payload decoding
//!
//!     One matcher per catalog kind. A matcher receives the source and the offset the
//!     scanner is at, checks the kind's leading words, fixes the match window according to the
//!     kind's boundary strategy, runs the full pattern inside that window and decodes the
//!     payload.
//!
//!     Patterns are anchored at the window start but not at its end: a phrase may stop
//!     before the end of its line, and scanning continues right after it.

use super::literal::{decode_keyword, decode_scalar, LiteralShape};
use super::window;
use crate::flowed::error::DecodeError;
use crate::flowed::token::{Boundary, Literal, Mapping, Payload, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

const ID: &str = r"[._a-zA-Z][.\-_a-zA-Z0-9]*";
const RESOLVER_ID: &str = r"[._a-zA-Z][.:\-_a-zA-Z0-9]*";
/// Optional `,` or `;` closing a single-line param phrase
const TRAIL: &str = r"[ \t]*[,;]?";

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid phrase pattern {pattern}: {e}"))
}

static FLOW_HEADER: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"^Define a flow named ({ID}) that has the following tasks:"
    ))
});
static TASK_HEADER: Lazy<Regex> = Lazy::new(|| compile(format!(r"^A task named ({ID})")));
static REQUIRES: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"^that requires the following inputs:[ \t]*({ID}(?:[ \t]*,[ \t]*{ID})*)"
    ))
});
static PROVIDES: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"^that provides the following outputs:[ \t]*({ID}(?:[ \t]*,[ \t]*{ID})*)"
    ))
});
static RESOLVER_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(format!(r"^using a resolver named ({RESOLVER_ID})")));
static PARAMS_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"^with the following mapped inputs:".to_string()));
static RESULTS_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"^with the following mapped outputs:".to_string()));
static MAPPED_PARAM: Lazy<Regex> =
    Lazy::new(|| compile(format!(r"^param ({ID}) mapped from ({ID}){TRAIL}")));
static MAPPED_RESULT: Lazy<Regex> =
    Lazy::new(|| compile(format!(r"^param ({ID}) mapped to ({ID}){TRAIL}")));
static FIXED_SCALAR: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r#"^param ({ID}) with value[ \t]+("[^"\n]*"|[^\s,;"\[{{]+){TRAIL}"#
    ))
});
static FIXED_NULL_OR_BOOL: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"^param ({ID}) with a (?i:(null|true|false)) value{TRAIL}"
    ))
});
static TRANSFORMED_OPENING: Lazy<Regex> =
    Lazy::new(|| compile(format!(r"^param ({ID}) transformed with\s+")));
static FIXED_OBJECT_OPENING: Lazy<Regex> =
    Lazy::new(|| compile(format!(r"^param ({ID}) with value\s*")));

/// A phrase recognized at some offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched {
    /// Offset right after the phrase
    pub end: usize,
    pub payload: Payload,
}

/// Try to recognize `kind` at `offset`.
///
/// `Ok(None)` means the phrase is not there and the scanner should try the next kind.
/// A literal that is present but cannot be decoded is an error, not a mismatch.
pub fn match_kind(
    kind: TokenKind,
    source: &str,
    offset: usize,
) -> Result<Option<Matched>, DecodeError> {
    if !source[offset..].starts_with(kind.prefix()) {
        return Ok(None);
    }
    match kind.boundary() {
        Boundary::Line => match_line(kind, source, offset),
        Boundary::Block => match_block(kind, source, offset),
    }
}

fn match_line(
    kind: TokenKind,
    source: &str,
    offset: usize,
) -> Result<Option<Matched>, DecodeError> {
    let window = &source[offset..window::line_end(source, offset)];

    let regex: &Regex = match kind {
        TokenKind::FlowHeader => &FLOW_HEADER,
        TokenKind::TaskHeader => &TASK_HEADER,
        TokenKind::Requires => &REQUIRES,
        TokenKind::Provides => &PROVIDES,
        TokenKind::ResolverHeader => &RESOLVER_HEADER,
        TokenKind::ParamsHeader => &PARAMS_HEADER,
        TokenKind::ResultsHeader => &RESULTS_HEADER,
        TokenKind::MappedParam => &MAPPED_PARAM,
        TokenKind::MappedResult => &MAPPED_RESULT,
        TokenKind::FixedScalarParam => &FIXED_SCALAR,
        TokenKind::FixedNullOrBoolParam => &FIXED_NULL_OR_BOOL,
        TokenKind::TransformedParam | TokenKind::FixedObjectParam => return Ok(None),
    };

    let Some(caps) = regex.captures(window) else {
        return Ok(None);
    };
    let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default();

    let payload = match kind {
        TokenKind::FlowHeader => Payload::FlowHeader { code: group(1) },
        TokenKind::TaskHeader => Payload::TaskHeader { name: group(1) },
        TokenKind::Requires => Payload::Requires {
            inputs: split_list(&group(1)),
        },
        TokenKind::Provides => Payload::Provides {
            outputs: split_list(&group(1)),
        },
        TokenKind::ResolverHeader => Payload::ResolverHeader { name: group(1) },
        TokenKind::ParamsHeader => Payload::ParamsHeader,
        TokenKind::ResultsHeader => Payload::ResultsHeader,
        TokenKind::MappedParam => Payload::MappedParam(Mapping {
            to: group(1),
            from: group(2),
        }),
        TokenKind::MappedResult => Payload::MappedResult(Mapping {
            to: group(1),
            from: group(2),
        }),
        TokenKind::FixedScalarParam => {
            let to = group(1);
            let value = decode_scalar(&group(2)).map_err(|reason| DecodeError {
                param_id: to.clone(),
                reason,
                offset,
            })?;
            Payload::FixedScalarParam(Literal { to, value })
        }
        TokenKind::FixedNullOrBoolParam => {
            let Some(value) = decode_keyword(&group(2)) else {
                return Ok(None);
            };
            Payload::FixedNullOrBoolParam(Literal { to: group(1), value })
        }
        TokenKind::TransformedParam | TokenKind::FixedObjectParam => return Ok(None),
    };

    let consumed = caps.get(0).map(|m| m.end()).unwrap_or(0);
    Ok(Some(Matched {
        end: offset + consumed,
        payload,
    }))
}

fn match_block(
    kind: TokenKind,
    source: &str,
    offset: usize,
) -> Result<Option<Matched>, DecodeError> {
    let opening: &Regex = match kind {
        TokenKind::TransformedParam => &TRANSFORMED_OPENING,
        TokenKind::FixedObjectParam => &FIXED_OBJECT_OPENING,
        _ => return Ok(None),
    };

    let Some(caps) = opening.captures(&source[offset..]) else {
        return Ok(None);
    };
    let to = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
    let body_start = offset + caps.get(0).map(|m| m.end()).unwrap_or(0);

    // A fixed value is only a block when it opens with a brace or bracket; quoted and
    // numeric values are scalars.
    if kind == TokenKind::FixedObjectParam && !source[body_start..].starts_with(&['{', '['][..]) {
        return Ok(None);
    }

    let Some(end) = window::block_end(source, body_start) else {
        return Ok(None);
    };
    let Some(shape) = LiteralShape::classify(&source[body_start..end]) else {
        return Ok(None);
    };
    if kind == TokenKind::FixedObjectParam && !shape.is_structured() {
        return Ok(None);
    }

    let value = shape.decode().map_err(|reason| DecodeError {
        param_id: to.clone(),
        reason,
        offset,
    })?;
    let literal = Literal { to, value };
    let payload = match kind {
        TokenKind::FixedObjectParam => Payload::FixedObjectParam(literal),
        _ => Payload::TransformedParam(literal),
    };

    Ok(Some(Matched { end, payload }))
}

/// Split a comma separated identifier list, trimming each element.
fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.trim().to_string()).collect()
}
