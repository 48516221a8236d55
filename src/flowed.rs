//! The flowed language compiler
//!
//!     flowed describes a workflow in plain phrases:
//!
//!         Define a flow named <id> that has the following tasks:
//!           A task named <id>
//!             that requires the following inputs: <list>
//!             that provides the following outputs: <list>
//!             using a resolver named <id>
//!               with the following mapped inputs:
//!                 param <id> mapped from <id>
//!               with the following mapped outputs:
//!                 param <id> mapped to <id>
//!
//!     Compilation runs three stages:
//!         1. [lexing]: raw text to phrase tokens, literals decoded on the way
//!         2. [parsing]: tokens to a typed parse tree
//!         3. [building]: parse tree to the [FlowDocument] consumed by the workflow engine
//!
//!     [Compiler] can stop after any stage, which is what the command line `--emit` flag and
//!     most tests use. A compiler holds nothing but its options; every call builds its own
//!     scanner and parser, so one compiler can be shared freely.

pub mod building;
pub mod config;
pub mod document;
pub mod error;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;

pub use config::CompileOptions;
pub use document::{FlowDocument, ParamValue, ResolverDef, TaskDef};
pub use error::CompileError;
pub use parsing::{GrammarDescription, RecoveryMode};

use parsing::tree::FlowNode;
use parsing::Parser;
use token::Token;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Run the scanner only.
    pub fn tokens(&self, source: &str) -> Result<Vec<Token>, CompileError> {
        let tokens = lexing::tokenize(source)?;
        debug!(count = tokens.len(), "scanned");
        Ok(tokens)
    }

    /// Run the scanner and the grammar engine.
    pub fn tree(&self, source: &str) -> Result<FlowNode, CompileError> {
        let tokens = self.tokens(source)?;
        let tree = Parser::new(tokens, self.options.recovery)
            .with_end_offset(source.len())
            .parse()
            .map_err(CompileError::Syntax)?;
        debug!(tasks = tree.tasks.len(), mode = %self.options.recovery, "parsed");
        Ok(tree)
    }

    /// Compile a complete document.
    pub fn compile(&self, source: &str) -> Result<FlowDocument, CompileError> {
        let document = building::lower(self.tree(source)?);
        debug!(
            code = %document.code,
            tasks = document.tasks.len(),
            params = document.param_count(),
            "lowered"
        );
        Ok(document)
    }
}

/// Compile a document with the default (strict) options.
pub fn compile(source: &str) -> Result<FlowDocument, CompileError> {
    Compiler::default().compile(source)
}

/// Describe the grammar for tooling such as diagram renderers.
pub fn grammar() -> GrammarDescription {
    parsing::grammar::describe()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowed::error::SyntaxError;
    use crate::flowed::token::TokenKind;

    #[test]
    fn test_stages_stop_where_asked() {
        let source = "Define a flow named f that has the following tasks:
  A task named t
    using a resolver named r";
        let compiler = Compiler::default();

        let kinds: Vec<TokenKind> = compiler
            .tokens(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        insta::assert_debug_snapshot!(kinds, @r###"
        [
            FlowHeader,
            TaskHeader,
            ResolverHeader,
        ]
        "###);

        assert_eq!(compiler.tree(source).unwrap().tasks[0].name, "t");
        assert_eq!(compiler.compile(source).unwrap().code, "f");
    }

    #[test]
    fn test_end_of_input_points_past_trailing_whitespace() {
        let source = "Define a flow named f that has the following tasks:\n\n";
        assert_eq!(
            compile(source),
            Err(CompileError::Syntax(vec![SyntaxError {
                expected: vec![TokenKind::TaskHeader],
                found: None,
                offset: source.len(),
            }]))
        );
    }

    #[test]
    fn test_options_select_recovery() {
        let compiler = Compiler::new(CompileOptions::tolerant());
        assert_eq!(compiler.options().recovery, RecoveryMode::Tolerant);
    }

    #[test]
    fn test_grammar_description_renders_ebnf() {
        let ebnf = grammar().to_ebnf();
        assert!(ebnf.starts_with("Flow "));
        assert_eq!(ebnf.lines().count(), 6);
    }
}
