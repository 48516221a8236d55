//! # naturally
//!
//! A compiler for flowed, a phrase-structured language for describing workflows, into the
//! JSON flow documents a workflow engine executes.
//!
//! ```rust,ignore
//! let document = naturally::compile(source)?;
//! println!("{}", document.to_json_pretty()?);
//! ```
//!
//! ## Testing
//!
//! Tests read their documents through the [testing module](flowed::testing).

pub mod flowed;

pub use flowed::{
    compile, grammar, CompileError, CompileOptions, Compiler, FlowDocument, GrammarDescription,
    ParamValue, RecoveryMode, ResolverDef, TaskDef,
};
