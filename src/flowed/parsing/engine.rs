//! Predictive parser over phrase tokens
//!
//! Every rule of the grammar decides its next step by looking at the kind of the next token
//! only (see [grammar](super::grammar)), so the parser never backtracks.
//!
//! While it runs the parser keeps the set of token kinds it checked for and did not find since
//! the last consumed token. When a required element is missing, that set (plus the element
//! itself) becomes the `expected` list of the [SyntaxError], so messages list every phrase
//! that would have been accepted at that point.
//!
//! Recovery depends on [RecoveryMode]:
//!     - Strict: the first error aborts the parse.
//!     - Tolerant: a missing element is reported and treated as present, and a token that
//!       cannot continue the flow is reported and skipped together with everything up to the
//!       next header phrase. Parsing resumes in the rule that header starts: a params or
//!       results section inside the current resolver, a task at flow level. At most one
//!       error is reported per offset.
//!
//! In both modes any reported error fails the parse; a partial tree is never returned.

use super::grammar::{first, Rule};
use super::tree::{
    FlowNode, ParamEntryNode, ParamsNode, ProvidesNode, RequiresNode, ResolverNode, ResultsNode,
    TaskNode,
};
use super::RecoveryMode;
use crate::flowed::error::SyntaxError;
use crate::flowed::token::{Payload, Token, TokenKind};
use std::iter::Peekable;
use std::vec;
use tracing::{debug, trace};

/// Parsing stopped at a reported error.
struct Abort;

type Step<T> = Result<T, Abort>;

/// Parser state for one token sequence. Consumed by [Parser::parse].
pub struct Parser {
    tokens: Peekable<vec::IntoIter<Token>>,
    mode: RecoveryMode,
    errors: Vec<SyntaxError>,
    /// Kinds checked for since the last consumed token
    expected: Vec<TokenKind>,
    /// Offset reported when the input ends
    end_offset: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, mode: RecoveryMode) -> Self {
        let end_offset = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            tokens: tokens.into_iter().peekable(),
            mode,
            errors: Vec::new(),
            expected: Vec::new(),
            end_offset,
        }
    }

    /// Report end-of-input errors at `offset` instead of the end of the last token.
    pub fn with_end_offset(mut self, offset: usize) -> Self {
        self.end_offset = offset;
        self
    }

    pub fn parse(mut self) -> Result<FlowNode, Vec<SyntaxError>> {
        let result = self.flow();
        match result {
            Ok(flow) if self.errors.is_empty() => Ok(flow),
            _ => Err(self.errors),
        }
    }

    // Rules

    fn flow(&mut self) -> Step<FlowNode> {
        trace!(rule = %Rule::Flow, offset = self.offset(), "enter");
        let code = self
            .expect(TokenKind::FlowHeader)?
            .map(|t| header_name(t.payload))
            .unwrap_or_default();

        let mut tasks = Vec::new();
        if !self.at_any(first(Rule::Task)) {
            self.report()?;
        }
        while self.peek_kind().is_some() {
            if self.at_any(first(Rule::Task)) {
                tasks.push(self.task()?);
            } else {
                self.report()?;
                self.bump();
                self.synchronize();
            }
        }
        Ok(FlowNode { code, tasks })
    }

    fn task(&mut self) -> Step<TaskNode> {
        let offset = self.offset();
        trace!(rule = %Rule::Task, offset, "enter");
        let name = self
            .expect(TokenKind::TaskHeader)?
            .map(|t| header_name(t.payload))
            .unwrap_or_default();

        let requires = self.eat(TokenKind::Requires).and_then(|t| match t.payload {
            Payload::Requires { inputs } => Some(RequiresNode { inputs }),
            _ => None,
        });
        let provides = self.eat(TokenKind::Provides).and_then(|t| match t.payload {
            Payload::Provides { outputs } => Some(ProvidesNode { outputs }),
            _ => None,
        });
        let resolver = if self.at(TokenKind::ResolverHeader) {
            self.resolver()?
        } else {
            // The missing header is inserted where recovery stops.
            self.report()?;
            self.synchronize();
            match self.peek_kind() {
                Some(TokenKind::ResolverHeader) => self.resolver()?,
                _ => self.resolver_sections(String::new())?,
            }
        };

        Ok(TaskNode {
            name,
            requires,
            provides,
            resolver,
            offset,
        })
    }

    fn resolver(&mut self) -> Step<ResolverNode> {
        trace!(rule = %Rule::Resolver, offset = self.offset(), "enter");
        let name = self
            .expect(TokenKind::ResolverHeader)?
            .map(|t| header_name(t.payload))
            .unwrap_or_default();
        self.resolver_sections(name)
    }

    fn resolver_sections(&mut self, name: String) -> Step<ResolverNode> {
        let mut params = if self.at_any(first(Rule::Params)) {
            Some(self.params()?)
        } else {
            None
        };
        let mut results = if self.at_any(first(Rule::Results)) {
            Some(self.results()?)
        } else {
            None
        };

        // Only the next task may follow a resolver.
        while self.peek_kind().is_some() && !self.at_any(first(Rule::Task)) {
            self.report()?;
            self.bump();
            self.synchronize();
            match self.peek_kind() {
                Some(TokenKind::ParamsHeader) => {
                    let section = self.params()?;
                    match params.as_mut() {
                        Some(node) => node.entries.extend(section.entries),
                        None => params = Some(section),
                    }
                }
                Some(TokenKind::ResultsHeader) => {
                    let section = self.results()?;
                    match results.as_mut() {
                        Some(node) => node.entries.extend(section.entries),
                        None => results = Some(section),
                    }
                }
                _ => {}
            }
        }
        Ok(ResolverNode {
            name,
            params,
            results,
        })
    }

    fn params(&mut self) -> Step<ParamsNode> {
        trace!(rule = %Rule::Params, offset = self.offset(), "enter");
        self.expect(TokenKind::ParamsHeader)?;

        let mut entries = Vec::new();
        if !self.at_any(first(Rule::ParamEntry)) {
            self.report()?;
        }
        while self.at_any(first(Rule::ParamEntry)) {
            if let Some(entry) = self.bump().and_then(|t| param_entry(t.payload)) {
                entries.push(entry);
            }
        }
        Ok(ParamsNode { entries })
    }

    fn results(&mut self) -> Step<ResultsNode> {
        trace!(rule = %Rule::Results, offset = self.offset(), "enter");
        self.expect(TokenKind::ResultsHeader)?;

        let mut entries = Vec::new();
        if !self.at(TokenKind::MappedResult) {
            self.report()?;
        }
        while let Some(token) = self.eat(TokenKind::MappedResult) {
            if let Payload::MappedResult(mapping) = token.payload {
                entries.push(mapping);
            }
        }
        Ok(ResultsNode { entries })
    }

    // Token cursor

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.tokens.peek().map(|t| t.kind)
    }

    fn offset(&mut self) -> usize {
        match self.tokens.peek() {
            Some(token) => token.offset(),
            None => self.end_offset,
        }
    }

    fn note(&mut self, kind: TokenKind) {
        if !self.expected.contains(&kind) {
            self.expected.push(kind);
        }
    }

    fn at(&mut self, kind: TokenKind) -> bool {
        self.at_any(&[kind])
    }

    fn at_any(&mut self, kinds: &[TokenKind]) -> bool {
        match self.peek_kind() {
            Some(kind) if kinds.contains(&kind) => true,
            _ => {
                kinds.iter().for_each(|k| self.note(*k));
                false
            }
        }
    }

    fn bump(&mut self) -> Option<Token> {
        self.expected.clear();
        let token = self.tokens.next();
        if let Some(token) = &token {
            trace!(kind = %token.kind, offset = token.offset(), "advance");
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            self.bump()
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Step<Option<Token>> {
        if let Some(token) = self.eat(kind) {
            return Ok(Some(token));
        }
        self.report()?;
        Ok(None)
    }

    /// Record a mismatch between the expected kinds and the next token.
    fn report(&mut self) -> Step<()> {
        let offset = self.offset();
        let found = self.peek_kind();
        let expected = std::mem::take(&mut self.expected);
        if self.errors.last().map_or(true, |e| e.offset != offset) {
            let error = SyntaxError {
                expected,
                found,
                offset,
            };
            debug!(%error, "syntax error");
            self.errors.push(error);
        }
        match self.mode {
            RecoveryMode::Strict => Err(Abort),
            RecoveryMode::Tolerant => Ok(()),
        }
    }

    /// Skip tokens until a header phrase (or the end of input) is next.
    fn synchronize(&mut self) {
        let mut skipped = 0;
        while let Some(kind) = self.peek_kind() {
            if kind.is_header() {
                break;
            }
            self.bump();
            skipped += 1;
        }
        trace!(skipped, offset = self.offset(), "synchronized");
    }
}

fn header_name(payload: Payload) -> String {
    match payload {
        Payload::FlowHeader { code } => code,
        Payload::TaskHeader { name } | Payload::ResolverHeader { name } => name,
        _ => String::new(),
    }
}

fn param_entry(payload: Payload) -> Option<ParamEntryNode> {
    match payload {
        Payload::MappedParam(mapping) => Some(ParamEntryNode::Mapped(mapping)),
        Payload::TransformedParam(literal) => Some(ParamEntryNode::Transformed(literal)),
        Payload::FixedScalarParam(literal) => Some(ParamEntryNode::FixedScalar(literal)),
        Payload::FixedNullOrBoolParam(literal) => Some(ParamEntryNode::FixedNullOrBool(literal)),
        Payload::FixedObjectParam(literal) => Some(ParamEntryNode::FixedObject(literal)),
        _ => None,
    }
}
