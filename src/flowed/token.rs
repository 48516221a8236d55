//! Token catalog for the flowed language
//!
//!     Unlike a character-level tokenizer, every token in flowed is a whole phrase:
//!     "A task named firstTask" is one token, and so is a multi-line
//!     `param p4 transformed with { ... };` block. The catalog is the fixed, ordered set of
//!     phrases the scanner knows about.
//!
//!     Each kind carries three pieces of static data:
//!         - its leading words, used as a cheap prefix check before the full match is tried
//!         - a human label, used in error messages and grammar introspection
//!         - its boundary strategy (single line vs. delimited literal block)
//!
//!     The order of [CATALOG] is the priority order the scanner tries kinds in. The patterns
//!     themselves are mutually exclusive at any offset, so the order only matters for cost:
//!     block kinds go before the single-line `param` kinds that share their prefix.
//!
//!     See [matchers](crate::flowed::lexing::matchers) for the patterns and payload decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Range;

/// The kind of a phrase token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    /// `Define a flow named <id> that has the following tasks:`
    FlowHeader,
    /// `A task named <id>`
    TaskHeader,
    /// `that requires the following inputs: <list>`
    Requires,
    /// `that provides the following outputs: <list>`
    Provides,
    /// `using a resolver named <id>`
    ResolverHeader,
    /// `with the following mapped inputs:`
    ParamsHeader,
    /// `param <id> mapped from <id>`
    MappedParam,
    /// `param <id> transformed with <string|object|array>;`
    TransformedParam,
    /// `param <id> with value <number|string>`
    FixedScalarParam,
    /// `param <id> with a <null|true|false> value`
    FixedNullOrBoolParam,
    /// `param <id> with value <object|array>;`
    FixedObjectParam,
    /// `with the following mapped outputs:`
    ResultsHeader,
    /// `param <id> mapped to <id>`
    MappedResult,
}

/// How far a token may extend from its start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The match window ends at the next line terminator.
    Line,
    /// The match window ends at the earliest closing delimiter (`};`, `];` or `";`)
    /// found after the opening phrase.
    Block,
}

/// Scanner priority order.
pub const CATALOG: &[TokenKind] = &[
    TokenKind::FlowHeader,
    TokenKind::TaskHeader,
    TokenKind::Requires,
    TokenKind::Provides,
    TokenKind::ResolverHeader,
    TokenKind::ParamsHeader,
    TokenKind::ResultsHeader,
    TokenKind::TransformedParam,
    TokenKind::FixedObjectParam,
    TokenKind::FixedNullOrBoolParam,
    TokenKind::FixedScalarParam,
    TokenKind::MappedParam,
    TokenKind::MappedResult,
];

impl TokenKind {
    /// Leading words every occurrence of this phrase starts with.
    pub fn prefix(self) -> &'static str {
        match self {
            TokenKind::FlowHeader => "Define a flow named ",
            TokenKind::TaskHeader => "A task named ",
            TokenKind::Requires => "that requires the following inputs:",
            TokenKind::Provides => "that provides the following outputs:",
            TokenKind::ResolverHeader => "using a resolver named ",
            TokenKind::ParamsHeader => "with the following mapped inputs:",
            TokenKind::ResultsHeader => "with the following mapped outputs:",
            TokenKind::MappedParam
            | TokenKind::TransformedParam
            | TokenKind::FixedScalarParam
            | TokenKind::FixedNullOrBoolParam
            | TokenKind::FixedObjectParam
            | TokenKind::MappedResult => "param ",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TokenKind::FlowHeader => "Define a flow named <flowIdentifier> that has the following tasks:",
            TokenKind::TaskHeader => "A task named <taskIdentifier>",
            TokenKind::Requires => "that requires the following inputs: <comma separated identifiers>",
            TokenKind::Provides => "that provides the following outputs: <comma separated identifiers>",
            TokenKind::ResolverHeader => "using a resolver named <resolverName>",
            TokenKind::ParamsHeader => "with the following mapped inputs:",
            TokenKind::MappedParam => "param <resolverParamName> mapped from <flowInputParamName>",
            TokenKind::TransformedParam => {
                "param <resolverParamName> transformed with <\"string\"|{object}|[array]>;"
            }
            TokenKind::FixedScalarParam => "param <resolverParamName> with value <number|\"string\">",
            TokenKind::FixedNullOrBoolParam => "param <resolverParamName> with a <null|true|false> value",
            TokenKind::FixedObjectParam => "param <resolverParamName> with value <{object}|[array]>;",
            TokenKind::ResultsHeader => "with the following mapped outputs:",
            TokenKind::MappedResult => "param <resolverResultName> mapped to <flowOutputParamName>",
        }
    }

    pub fn boundary(self) -> Boundary {
        match self {
            TokenKind::TransformedParam | TokenKind::FixedObjectParam => Boundary::Block,
            _ => Boundary::Line,
        }
    }

    /// Header phrases open a grammar section; tolerant parsing resynchronizes on them.
    pub fn is_header(self) -> bool {
        matches!(
            self,
            TokenKind::FlowHeader
                | TokenKind::TaskHeader
                | TokenKind::ResolverHeader
                | TokenKind::ParamsHeader
                | TokenKind::ResultsHeader
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::FlowHeader => "FLOW_HEADER",
            TokenKind::TaskHeader => "TASK_HEADER",
            TokenKind::Requires => "REQUIRES",
            TokenKind::Provides => "PROVIDES",
            TokenKind::ResolverHeader => "RESOLVER_HEADER",
            TokenKind::ParamsHeader => "PARAMS_HEADER",
            TokenKind::MappedParam => "MAPPED_PARAM",
            TokenKind::TransformedParam => "TRANSFORMED_PARAM",
            TokenKind::FixedScalarParam => "FIXED_SCALAR_PARAM",
            TokenKind::FixedNullOrBoolParam => "FIXED_NULL_OR_BOOL_PARAM",
            TokenKind::FixedObjectParam => "FIXED_OBJECT_PARAM",
            TokenKind::ResultsHeader => "RESULTS_HEADER",
            TokenKind::MappedResult => "MAPPED_RESULT",
        };
        write!(f, "{}", name)
    }
}

/// A destination name bound to a source name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub to: String,
    pub from: String,
}

/// A destination name bound to a decoded literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub to: String,
    pub value: Value,
}

/// Decoded, kind-specific token data.
///
/// Every variant corresponds to exactly one [TokenKind], so the kind of a token is always
/// derivable from its payload (see [Payload::kind]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    FlowHeader { code: String },
    TaskHeader { name: String },
    Requires { inputs: Vec<String> },
    Provides { outputs: Vec<String> },
    ResolverHeader { name: String },
    ParamsHeader,
    MappedParam(Mapping),
    TransformedParam(Literal),
    FixedScalarParam(Literal),
    FixedNullOrBoolParam(Literal),
    FixedObjectParam(Literal),
    ResultsHeader,
    MappedResult(Mapping),
}

impl Payload {
    pub fn kind(&self) -> TokenKind {
        match self {
            Payload::FlowHeader { .. } => TokenKind::FlowHeader,
            Payload::TaskHeader { .. } => TokenKind::TaskHeader,
            Payload::Requires { .. } => TokenKind::Requires,
            Payload::Provides { .. } => TokenKind::Provides,
            Payload::ResolverHeader { .. } => TokenKind::ResolverHeader,
            Payload::ParamsHeader => TokenKind::ParamsHeader,
            Payload::MappedParam(_) => TokenKind::MappedParam,
            Payload::TransformedParam(_) => TokenKind::TransformedParam,
            Payload::FixedScalarParam(_) => TokenKind::FixedScalarParam,
            Payload::FixedNullOrBoolParam(_) => TokenKind::FixedNullOrBoolParam,
            Payload::FixedObjectParam(_) => TokenKind::FixedObjectParam,
            Payload::ResultsHeader => TokenKind::ResultsHeader,
            Payload::MappedResult(_) => TokenKind::MappedResult,
        }
    }
}

/// A recognized phrase together with its location in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range of the phrase in the source text
    pub span: Range<usize>,
    pub payload: Payload,
}

impl Token {
    pub fn new(span: Range<usize>, payload: Payload) -> Self {
        Self {
            kind: payload.kind(),
            span,
            payload,
        }
    }

    /// Byte offset the phrase starts at.
    pub fn offset(&self) -> usize {
        self.span.start
    }
}
