//! Compiled flow documents
//!
//! A [FlowDocument] is the output of a compile call and the input of the workflow engine
//! that runs the flow. Its JSON shape:
//!
//! ```text
//! { "code": "<flow>",
//!   "tasks": { "<task>": { "requires"?: [..], "provides"?: [..],
//!              "resolver": { "name": "<resolver>",
//!                            "params": { "<dest>": "<source>" | {"transform": any} | {"value": any} },
//!                            "results": { "<dest>": "<source>" } } } } }
//! ```
//!
//! Maps are ordered by key, so serializing the same document always yields the same text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub code: String,
    pub tasks: BTreeMap<String, TaskDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
    /// `None` when the task has no `requires` clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Vec<String>>,
    /// `None` when the task has no `provides` clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<Vec<String>>,
    pub resolver: ResolverDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverDef {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    #[serde(default)]
    pub results: BTreeMap<String, String>,
}

/// The value bound to one resolver param.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Name of the flow value the param is read from
    Mapped(String),
    /// Expression the workflow engine evaluates
    Transformed { transform: Value },
    /// Constant
    Fixed { value: Value },
}

impl FlowDocument {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Total number of params over all tasks.
    pub fn param_count(&self) -> usize {
        self.tasks.values().map(|t| t.resolver.params.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> FlowDocument {
        let mut params = BTreeMap::new();
        params.insert("p1".to_string(), ParamValue::Mapped("someInput".into()));
        params.insert(
            "p2".to_string(),
            ParamValue::Transformed {
                transform: json!({"a": "{{x}}"}),
            },
        );
        params.insert("p3".to_string(), ParamValue::Fixed { value: Value::Null });

        let mut tasks = BTreeMap::new();
        tasks.insert(
            "t".to_string(),
            TaskDef {
                requires: Some(vec!["someInput".into()]),
                provides: None,
                resolver: ResolverDef {
                    name: "r".into(),
                    params,
                    results: BTreeMap::new(),
                },
            },
        );
        FlowDocument {
            code: "f".into(),
            tasks,
        }
    }

    #[test]
    fn test_json_shape() {
        let value: Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "code": "f",
                "tasks": {
                    "t": {
                        "requires": ["someInput"],
                        "resolver": {
                            "name": "r",
                            "params": {
                                "p1": "someInput",
                                "p2": {"transform": {"a": "{{x}}"}},
                                "p3": {"value": null}
                            },
                            "results": {}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_json_text_is_key_ordered() {
        insta::assert_snapshot!(sample().to_json().unwrap(), @r###"{"code":"f","tasks":{"t":{"requires":["someInput"],"resolver":{"name":"r","params":{"p1":"someInput","p2":{"transform":{"a":"{{x}}"}},"p3":{"value":null}},"results":{}}}}}"###);
    }

    #[test]
    fn test_read_back() {
        let document = sample();
        let text = document.to_json_pretty().unwrap();
        assert_eq!(FlowDocument::from_json(&text).unwrap(), document);
        assert_eq!(document.param_count(), 3);
    }
}
