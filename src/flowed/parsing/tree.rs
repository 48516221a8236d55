//! Concrete parse tree
//!
//! One node type per grammar rule. Nodes own the decoded payloads of the tokens they
//! consumed, so lowering never has to look at tokens again.

use crate::flowed::token::{Literal, Mapping};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub code: String,
    pub tasks: Vec<TaskNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskNode {
    pub name: String,
    pub requires: Option<RequiresNode>,
    pub provides: Option<ProvidesNode>,
    pub resolver: ResolverNode,
    /// Offset of the task header
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiresNode {
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvidesNode {
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolverNode {
    pub name: String,
    pub params: Option<ParamsNode>,
    pub results: Option<ResultsNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamsNode {
    /// Entries in source order; never empty
    pub entries: Vec<ParamEntryNode>,
}

/// One `param ...` line of a resolver's mapped inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParamEntryNode {
    Mapped(Mapping),
    Transformed(Literal),
    FixedScalar(Literal),
    FixedNullOrBool(Literal),
    FixedObject(Literal),
}

impl ParamEntryNode {
    /// Destination param name.
    pub fn destination(&self) -> &str {
        match self {
            ParamEntryNode::Mapped(mapping) => &mapping.to,
            ParamEntryNode::Transformed(literal)
            | ParamEntryNode::FixedScalar(literal)
            | ParamEntryNode::FixedNullOrBool(literal)
            | ParamEntryNode::FixedObject(literal) => &literal.to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsNode {
    /// Entries in source order; never empty
    pub entries: Vec<Mapping>,
}
