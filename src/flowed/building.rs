//! Building module for the flowed language
//!
//!     Lowering walks a parse tree into the [FlowDocument] handed to the workflow engine.
//!     It cannot fail: every literal was decoded by the scanner and the tree shape is
//!     guaranteed by the grammar engine.
//!
//!     Collisions are resolved by replacement, never by merging:
//!         - A task name used twice keeps only the later task, whole.
//!         - Params follow the group order described in [params].
//!         - Results keep the later mapping for a repeated destination.

pub mod params;

use crate::flowed::document::{FlowDocument, ResolverDef, TaskDef};
use crate::flowed::parsing::tree::{FlowNode, ResolverNode, TaskNode};
use std::collections::BTreeMap;
use tracing::trace;

/// Lower a parse tree into a flow document.
pub fn lower(tree: FlowNode) -> FlowDocument {
    let mut tasks = BTreeMap::new();
    for task in tree.tasks {
        let name = task.name.clone();
        if tasks.insert(name.clone(), lower_task(task)).is_some() {
            trace!(task = %name, "task replaced by a later definition");
        }
    }
    FlowDocument {
        code: tree.code,
        tasks,
    }
}

fn lower_task(task: TaskNode) -> TaskDef {
    TaskDef {
        requires: task.requires.map(|node| node.inputs),
        provides: task.provides.map(|node| node.outputs),
        resolver: lower_resolver(task.resolver),
    }
}

fn lower_resolver(resolver: ResolverNode) -> ResolverDef {
    let params = resolver
        .params
        .map(|node| params::assemble(node.entries))
        .unwrap_or_default();
    let results = resolver
        .results
        .map(|node| {
            node.entries
                .into_iter()
                .map(|mapping| (mapping.to, mapping.from))
                .collect()
        })
        .unwrap_or_default();
    ResolverDef {
        name: resolver.name,
        params,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowed::document::ParamValue;
    use crate::flowed::lexing::tokenize;
    use crate::flowed::parsing::{parse, RecoveryMode};

    fn lower_source(source: &str) -> FlowDocument {
        let tokens = tokenize(source).expect("tokenize failed");
        lower(parse(tokens, RecoveryMode::Strict).expect("parse failed"))
    }

    #[test]
    fn test_duplicate_task_replaces_whole_definition() {
        let document = lower_source(
            "Define a flow named f that has the following tasks:
  A task named t
    that provides the following outputs: a
    using a resolver named first
      with the following mapped inputs:
        param x mapped from y
  A task named t
    using a resolver named second",
        );
        let task = &document.tasks["t"];
        assert_eq!(document.tasks.len(), 1);
        assert_eq!(task.provides, None);
        assert_eq!(task.resolver.name, "second");
        assert!(task.resolver.params.is_empty());
    }

    #[test]
    fn test_missing_sections_lower_to_empty_maps() {
        let document = lower_source(
            "Define a flow named f that has the following tasks:
  A task named t
    using a resolver named r",
        );
        let resolver = &document.tasks["t"].resolver;
        assert!(resolver.params.is_empty());
        assert!(resolver.results.is_empty());
        assert_eq!(document.tasks["t"].requires, None);
    }

    #[test]
    fn test_later_result_mapping_wins() {
        let document = lower_source(
            "Define a flow named f that has the following tasks:
  A task named t
    using a resolver named r
      with the following mapped outputs:
        param out mapped to a
        param out mapped to b",
        );
        assert_eq!(document.tasks["t"].resolver.results["out"], "b");
    }

    #[test]
    fn test_mapped_then_fixed_object() {
        let document = lower_source(
            "Define a flow named f that has the following tasks:
  A task named t
    using a resolver named r
      with the following mapped inputs:
        param p with value { \"k\": true };
        param p mapped from x",
        );
        assert_eq!(
            document.tasks["t"].resolver.params["p"],
            ParamValue::Fixed {
                value: serde_json::json!({"k": true})
            }
        );
    }
}
