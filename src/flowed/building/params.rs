//! Resolver param assembly
//!
//! Params are not applied in plain source order. Entries are grouped by kind and the groups
//! are applied in a fixed order, mapped first and fixed objects last:
//!
//! ```text
//! Mapped < Transformed < FixedScalar < FixedNullOrBool < FixedObject
//! ```
//!
//! Within a group entries keep their source order. Every entry replaces whatever value its
//! destination held before, so a later group beats an earlier one wherever the two appear in
//! the source, and within a group the last entry wins.

use crate::flowed::document::ParamValue;
use crate::flowed::parsing::tree::ParamEntryNode;
use std::collections::BTreeMap;

/// Param kinds in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamGroup {
    Mapped,
    Transformed,
    FixedScalar,
    FixedNullOrBool,
    FixedObject,
}

impl ParamGroup {
    pub fn of(entry: &ParamEntryNode) -> Self {
        match entry {
            ParamEntryNode::Mapped(_) => ParamGroup::Mapped,
            ParamEntryNode::Transformed(_) => ParamGroup::Transformed,
            ParamEntryNode::FixedScalar(_) => ParamGroup::FixedScalar,
            ParamEntryNode::FixedNullOrBool(_) => ParamGroup::FixedNullOrBool,
            ParamEntryNode::FixedObject(_) => ParamGroup::FixedObject,
        }
    }
}

/// Build the params map of one resolver.
pub fn assemble(mut entries: Vec<ParamEntryNode>) -> BTreeMap<String, ParamValue> {
    // Stable: source order survives inside each group.
    entries.sort_by_key(ParamGroup::of);

    let mut params = BTreeMap::new();
    for entry in entries {
        let (destination, value) = param_value(entry);
        params.insert(destination, value);
    }
    params
}

fn param_value(entry: ParamEntryNode) -> (String, ParamValue) {
    match entry {
        ParamEntryNode::Mapped(mapping) => (mapping.to, ParamValue::Mapped(mapping.from)),
        ParamEntryNode::Transformed(literal) => (
            literal.to,
            ParamValue::Transformed {
                transform: literal.value,
            },
        ),
        ParamEntryNode::FixedScalar(literal)
        | ParamEntryNode::FixedNullOrBool(literal)
        | ParamEntryNode::FixedObject(literal) => (
            literal.to,
            ParamValue::Fixed {
                value: literal.value,
            },
        ),
    }
}
