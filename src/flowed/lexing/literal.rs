//! Literal decoding
//!
//!     Literal blocks are decoded in two explicit steps. Once the window of a block is fixed
//!     (see [window](super::window)), [LiteralShape::classify] decides which of the three
//!     permitted shapes the block has, trying object, then array, then quoted string. Only
//!     then is the content decoded: strings are taken verbatim, objects and arrays go through
//!     a small embedded JSON-literal grammar so failures can be attributed to the param that
//!     owns the literal.
//!
//!     Scalars (`with value 456.789`, `with value "text"`) and keywords
//!     (`with a true value`) are decoded here as well.

use chumsky::prelude::*;
use serde_json::{Map, Number, Value};
use std::char::DecodeUtf16Error;

/// The shape of a literal block, with the text each shape carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralShape<'a> {
    /// `{ ... }`, braces included
    Object(&'a str),
    /// `[ ... ]`, brackets included
    Array(&'a str),
    /// `"..."`, quotes stripped
    Text(&'a str),
}

impl<'a> LiteralShape<'a> {
    /// Classify a block body such as `{ "a": 1 };`.
    ///
    /// The body must end with the `;` of its closing delimiter. Leading and trailing
    /// whitespace around the literal is ignored.
    pub fn classify(body: &'a str) -> Option<Self> {
        let inner = body.trim().strip_suffix(';')?.trim_end();
        if inner.len() >= 2 {
            if inner.starts_with('{') && inner.ends_with('}') {
                return Some(LiteralShape::Object(inner));
            }
            if inner.starts_with('[') && inner.ends_with(']') {
                return Some(LiteralShape::Array(inner));
            }
            if inner.starts_with('"') && inner.ends_with('"') {
                return Some(LiteralShape::Text(&inner[1..inner.len() - 1]));
            }
        }
        None
    }

    /// Object and array shapes hold structured data.
    pub fn is_structured(&self) -> bool {
        !matches!(self, LiteralShape::Text(_))
    }

    /// Decode the literal into a value. Only structured shapes can fail.
    pub fn decode(self) -> Result<Value, String> {
        match self {
            LiteralShape::Object(text) | LiteralShape::Array(text) => parse_json_literal(text),
            LiteralShape::Text(text) => Ok(Value::String(text.to_string())),
        }
    }
}

/// Decode the literal of a `with value` scalar: a quoted string or a number.
pub fn decode_scalar(literal: &str) -> Result<Value, String> {
    if literal.len() >= 2 && literal.starts_with('"') && literal.ends_with('"') {
        return Ok(Value::String(literal[1..literal.len() - 1].to_string()));
    }
    number_value(literal)
        .map(Value::Number)
        .ok_or_else(|| format!("'{}' is not a number", literal))
}

/// Decode a `null`, `true` or `false` keyword, in any letter case.
pub fn decode_keyword(keyword: &str) -> Option<Value> {
    match keyword.to_ascii_lowercase().as_str() {
        "null" => Some(Value::Null),
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integer-shaped literals that fit `i64` stay integers. Other literals are read as `f64`,
/// and those with an integral value (`1e3`, `1.0`) are written back as integers.
fn number_value(literal: &str) -> Option<Number> {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(int) = literal.parse::<i64>() {
            return Some(Number::from(int));
        }
    }
    let float = literal.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float.abs() <= MAX_EXACT_INTEGER {
        return Some(Number::from(float as i64));
    }
    Number::from_f64(float)
}

/// Parse a complete JSON literal, reporting the first error.
pub fn parse_json_literal(text: &str) -> Result<Value, String> {
    json_literal()
        .then_ignore(end())
        .parse(text)
        .map_err(|errors| match errors.first() {
            Some(error) => describe(error),
            None => "malformed literal".to_string(),
        })
}

fn describe(error: &Simple<char>) -> String {
    if let chumsky::error::SimpleReason::Custom(message) = error.reason() {
        return format!("{} at {}", message, error.span().start);
    }
    match error.found() {
        Some(found) => format!(
            "unexpected character '{}' at {}",
            found,
            error.span().start
        ),
        None => "unexpected end of literal".to_string(),
    }
}

/// A string character, or one UTF-16 code unit from a `\uXXXX` escape.
#[derive(Debug, Clone, Copy)]
enum Piece {
    Char(char),
    Unit(u16),
}

/// Join string pieces, pairing escaped surrogates into single characters.
fn assemble(pieces: Vec<Piece>) -> Result<String, DecodeUtf16Error> {
    let mut text = String::with_capacity(pieces.len());
    let mut units = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Unit(unit) => units.push(unit),
            Piece::Char(c) => {
                flush_units(&mut text, &mut units)?;
                text.push(c);
            }
        }
    }
    flush_units(&mut text, &mut units)?;
    Ok(text)
}

fn flush_units(text: &mut String, units: &mut Vec<u16>) -> Result<(), DecodeUtf16Error> {
    for c in char::decode_utf16(units.drain(..)) {
        text.push(c?);
    }
    Ok(())
}

fn json_literal() -> impl Parser<char, Value, Error = Simple<char>> {
    recursive(|value| {
        let frac = just('.').chain(text::digits(10));

        let exp = just('e')
            .or(just('E'))
            .chain(just('+').or(just('-')).or_not())
            .chain::<char, _, _>(text::digits(10));

        let number = just('-')
            .or_not()
            .chain::<char, _, _>(text::int(10))
            .chain::<char, _, _>(frac.or_not().flatten())
            .chain::<char, _, _>(exp.or_not().flatten())
            .collect::<String>()
            .try_map(|digits, span| {
                number_value(&digits)
                    .ok_or_else(|| Simple::custom(span, format!("number {} is out of range", digits)))
            })
            .labelled("number");

        let code_unit = filter(|c: &char| c.is_ascii_hexdigit())
            .repeated()
            .exactly(4)
            .collect::<String>()
            .try_map(|digits, span| {
                u16::from_str_radix(&digits, 16).map_err(|e| Simple::custom(span, e.to_string()))
            });

        let escape = just('\\').ignore_then(
            just('\\')
                .or(just('/'))
                .or(just('"'))
                .or(just('b').to('\x08'))
                .or(just('f').to('\x0C'))
                .or(just('n').to('\n'))
                .or(just('r').to('\r'))
                .or(just('t').to('\t'))
                .map(Piece::Char)
                .or(just('u').ignore_then(code_unit).map(Piece::Unit)),
        );

        // JSON only requires U+0000 to U+001F to be escaped.
        let string = just('"')
            .ignore_then(
                filter(|c: &char| *c != '\\' && *c != '"' && *c >= '\u{20}')
                    .map(Piece::Char)
                    .or(escape)
                    .repeated(),
            )
            .then_ignore(just('"'))
            .try_map(|pieces, span| {
                assemble(pieces)
                    .map_err(|e| Simple::custom(span, format!("invalid unicode escape ({})", e)))
            })
            .labelled("string");

        let array = value
            .clone()
            .chain(just(',').ignore_then(value.clone()).repeated())
            .or_not()
            .flatten()
            .padded()
            .delimited_by(just('['), just(']'))
            .map(Value::Array)
            .labelled("array");

        let member = string.clone().padded().then_ignore(just(':')).then(value);
        let object = member
            .clone()
            .chain(just(',').ignore_then(member).repeated())
            .or_not()
            .flatten()
            .padded()
            .delimited_by(just('{'), just('}'))
            .map(|members| Value::Object(members.into_iter().collect::<Map<String, Value>>()))
            .labelled("object");

        just("null")
            .to(Value::Null)
            .labelled("null")
            .or(just("true").to(Value::Bool(true)).labelled("true"))
            .or(just("false").to(Value::Bool(false)).labelled("false"))
            .or(number.map(Value::Number))
            .or(string.map(Value::String))
            .or(array)
            .or(object)
            .padded()
    })
}
