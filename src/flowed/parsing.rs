//! Parsing module for the flowed language
//!
//!     The grammar engine turns the flat token sequence produced by the scanner into a typed
//!     parse tree. The grammar itself lives in [grammar] as a declarative table; [engine] is a
//!     predictive parser that walks it one token at a time; [tree] holds the node types.
//!
//!     Two recovery modes exist (see [RecoveryMode]). Whichever is used, any error means no
//!     tree: callers get either a complete [FlowNode] or the full list of errors.

pub mod engine;
pub mod grammar;
pub mod tree;

pub use engine::Parser;
pub use grammar::{GrammarDescription, GrammarNode, Rule};
pub use tree::FlowNode;

use crate::flowed::error::SyntaxError;
use crate::flowed::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the grammar engine reacts to a structural mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMode {
    /// Stop at the first error.
    #[default]
    Strict,
    /// Recover locally and report every error found.
    Tolerant,
}

impl fmt::Display for RecoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryMode::Strict => write!(f, "strict"),
            RecoveryMode::Tolerant => write!(f, "tolerant"),
        }
    }
}

impl FromStr for RecoveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(RecoveryMode::Strict),
            "tolerant" => Ok(RecoveryMode::Tolerant),
            other => Err(format!("unknown recovery mode '{}'", other)),
        }
    }
}

/// Parse a token sequence into a flow tree.
pub fn parse(tokens: Vec<Token>, mode: RecoveryMode) -> Result<FlowNode, Vec<SyntaxError>> {
    Parser::new(tokens, mode).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_mode_names() {
        assert_eq!("Tolerant".parse::<RecoveryMode>(), Ok(RecoveryMode::Tolerant));
        assert_eq!(RecoveryMode::default(), RecoveryMode::Strict);
        assert_eq!(RecoveryMode::Strict.to_string(), "strict");
        assert!("lenient".parse::<RecoveryMode>().is_err());
    }
}
