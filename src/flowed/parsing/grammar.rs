//! Grammar Definitions
//!
//! This module defines the flowed grammar as data. The engine consults it for the token
//! kinds that may start a rule (FIRST sets), which it uses both for predictive dispatch and
//! for the expected-kinds list of syntax errors. Tooling can read the same table through
//! [describe] (structured, serializable) or [to_ebnf] (text).
//!
//! # Grammar
//!
//! ```text
//! Flow        ::= FLOW_HEADER Task+
//! Task        ::= TASK_HEADER REQUIRES? PROVIDES? Resolver
//! Resolver    ::= RESOLVER_HEADER Params? Results?
//! Params      ::= PARAMS_HEADER ParamEntry+
//! ParamEntry  ::= MAPPED_PARAM | TRANSFORMED_PARAM | FIXED_SCALAR_PARAM
//!               | FIXED_NULL_OR_BOOL_PARAM | FIXED_OBJECT_PARAM
//! Results     ::= RESULTS_HEADER MAPPED_RESULT+
//! ```
//!
//! Every alternative of a rule starts with a distinct token kind, so one token of lookahead
//! decides every choice and no backtracking is needed.

use crate::flowed::token::TokenKind;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Grammar rule names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    Flow,
    Task,
    Resolver,
    Params,
    ParamEntry,
    Results,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Flow => "Flow",
            Rule::Task => "Task",
            Rule::Resolver => "Resolver",
            Rule::Params => "Params",
            Rule::ParamEntry => "ParamEntry",
            Rule::Results => "Results",
        };
        write!(f, "{}", name)
    }
}

/// One element of a production body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Terminal(TokenKind),
    NonTerminal(Rule),
    /// Zero or one occurrence
    Optional(&'static Element),
    /// One or more occurrences
    AtLeastOne(&'static Element),
    /// Exactly one of the alternatives
    Alternation(&'static [Element]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    pub rule: Rule,
    pub definition: &'static [Element],
}

/// The flowed grammar. The first production is the start rule.
pub const GRAMMAR: &[Production] = &[
    Production {
        rule: Rule::Flow,
        definition: &[
            Element::Terminal(TokenKind::FlowHeader),
            Element::AtLeastOne(&Element::NonTerminal(Rule::Task)),
        ],
    },
    Production {
        rule: Rule::Task,
        definition: &[
            Element::Terminal(TokenKind::TaskHeader),
            Element::Optional(&Element::Terminal(TokenKind::Requires)),
            Element::Optional(&Element::Terminal(TokenKind::Provides)),
            Element::NonTerminal(Rule::Resolver),
        ],
    },
    Production {
        rule: Rule::Resolver,
        definition: &[
            Element::Terminal(TokenKind::ResolverHeader),
            Element::Optional(&Element::NonTerminal(Rule::Params)),
            Element::Optional(&Element::NonTerminal(Rule::Results)),
        ],
    },
    Production {
        rule: Rule::Params,
        definition: &[
            Element::Terminal(TokenKind::ParamsHeader),
            Element::AtLeastOne(&Element::NonTerminal(Rule::ParamEntry)),
        ],
    },
    Production {
        rule: Rule::ParamEntry,
        definition: &[Element::Alternation(&[
            Element::Terminal(TokenKind::MappedParam),
            Element::Terminal(TokenKind::TransformedParam),
            Element::Terminal(TokenKind::FixedScalarParam),
            Element::Terminal(TokenKind::FixedNullOrBoolParam),
            Element::Terminal(TokenKind::FixedObjectParam),
        ])],
    },
    Production {
        rule: Rule::Results,
        definition: &[
            Element::Terminal(TokenKind::ResultsHeader),
            Element::AtLeastOne(&Element::Terminal(TokenKind::MappedResult)),
        ],
    },
];

static FIRST_SETS: Lazy<HashMap<Rule, Vec<TokenKind>>> = Lazy::new(|| {
    GRAMMAR
        .iter()
        .map(|production| (production.rule, first_of_sequence(production.definition)))
        .collect()
});

/// Look up the production of a rule.
pub fn production(rule: Rule) -> Option<&'static Production> {
    GRAMMAR.iter().find(|p| p.rule == rule)
}

/// Token kinds that can start `rule`.
pub fn first(rule: Rule) -> &'static [TokenKind] {
    FIRST_SETS.get(&rule).map(Vec::as_slice).unwrap_or(&[])
}

fn first_of_sequence(elements: &[Element]) -> Vec<TokenKind> {
    let mut kinds = Vec::new();
    for element in elements {
        let (element_first, nullable) = first_of_element(element);
        for kind in element_first {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if !nullable {
            break;
        }
    }
    kinds
}

/// FIRST set of one element and whether it can match nothing.
fn first_of_element(element: &Element) -> (Vec<TokenKind>, bool) {
    match element {
        Element::Terminal(kind) => (vec![*kind], false),
        Element::NonTerminal(rule) => {
            let definition = production(*rule).map(|p| p.definition).unwrap_or(&[]);
            (first_of_sequence(definition), false)
        }
        Element::Optional(inner) => (first_of_element(inner).0, true),
        Element::AtLeastOne(inner) => first_of_element(inner),
        Element::Alternation(alternatives) => {
            let mut kinds = Vec::new();
            let mut nullable = false;
            for alternative in alternatives.iter() {
                let (alt_first, alt_nullable) = first_of_element(alternative);
                kinds.extend(alt_first);
                nullable |= alt_nullable;
            }
            (kinds, nullable)
        }
    }
}

/// Serializable description of the grammar, shaped after the GAST format railroad-diagram
/// renderers consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarDescription {
    pub start: String,
    pub rules: Vec<GrammarNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GrammarNode {
    Rule {
        name: String,
        definition: Vec<GrammarNode>,
    },
    Terminal {
        name: String,
        label: String,
        pattern: String,
    },
    NonTerminal {
        name: String,
    },
    Option {
        definition: Vec<GrammarNode>,
    },
    RepetitionMandatory {
        definition: Vec<GrammarNode>,
    },
    Alternation {
        definition: Vec<GrammarNode>,
    },
}

/// Describe the grammar. Read-only; builds a fresh description on every call.
pub fn describe() -> GrammarDescription {
    let rules = GRAMMAR
        .iter()
        .map(|production| GrammarNode::Rule {
            name: production.rule.to_string(),
            definition: production.definition.iter().map(describe_element).collect(),
        })
        .collect();
    GrammarDescription {
        start: GRAMMAR
            .first()
            .map(|p| p.rule.to_string())
            .unwrap_or_default(),
        rules,
    }
}

fn describe_element(element: &Element) -> GrammarNode {
    match element {
        Element::Terminal(kind) => GrammarNode::Terminal {
            name: kind.to_string(),
            label: kind.label().to_string(),
            pattern: kind.prefix().trim_end().to_string(),
        },
        Element::NonTerminal(rule) => GrammarNode::NonTerminal {
            name: rule.to_string(),
        },
        Element::Optional(inner) => GrammarNode::Option {
            definition: vec![describe_element(inner)],
        },
        Element::AtLeastOne(inner) => GrammarNode::RepetitionMandatory {
            definition: vec![describe_element(inner)],
        },
        Element::Alternation(alternatives) => GrammarNode::Alternation {
            definition: alternatives.iter().map(describe_element).collect(),
        },
    }
}

/// Render the grammar as EBNF, one production per line.
pub fn to_ebnf() -> String {
    describe().to_ebnf()
}

impl GrammarDescription {
    /// Render the described productions as EBNF, one per line.
    pub fn to_ebnf(&self) -> String {
        let productions: Vec<(&str, String)> = self
            .rules
            .iter()
            .filter_map(|node| match node {
                GrammarNode::Rule { name, definition } => {
                    let body = match definition.as_slice() {
                        [GrammarNode::Alternation { definition }] => join(definition, " | "),
                        sequence => join(sequence, " "),
                    };
                    Some((name.as_str(), body))
                }
                _ => None,
            })
            .collect();
        let width = productions.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        productions
            .iter()
            .map(|(name, body)| format!("{:width$} ::= {}\n", name, body, width = width))
            .collect()
    }
}

fn join(nodes: &[GrammarNode], separator: &str) -> String {
    nodes.iter().map(render).collect::<Vec<_>>().join(separator)
}

fn render(node: &GrammarNode) -> String {
    match node {
        GrammarNode::Rule { name, .. }
        | GrammarNode::Terminal { name, .. }
        | GrammarNode::NonTerminal { name } => name.clone(),
        GrammarNode::Option { definition } => format!("{}?", group(definition)),
        GrammarNode::RepetitionMandatory { definition } => format!("{}+", group(definition)),
        GrammarNode::Alternation { definition } => format!("({})", join(definition, " | ")),
    }
}

/// A single node renders bare; a sequence needs parentheses before a quantifier.
fn group(definition: &[GrammarNode]) -> String {
    match definition {
        [single] => render(single),
        sequence => format!("({})", join(sequence, " ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_non_terminal_has_a_production() {
        fn check(element: &Element) {
            match element {
                Element::NonTerminal(rule) => assert!(production(*rule).is_some(), "{}", rule),
                Element::Optional(inner) | Element::AtLeastOne(inner) => check(inner),
                Element::Alternation(alternatives) => alternatives.iter().for_each(check),
                Element::Terminal(_) => {}
            }
        }
        GRAMMAR
            .iter()
            .flat_map(|p| p.definition.iter())
            .for_each(check);
    }

    #[test]
    fn test_first_sets() {
        assert_eq!(first(Rule::Flow), &[TokenKind::FlowHeader]);
        assert_eq!(first(Rule::Task), &[TokenKind::TaskHeader]);
        assert_eq!(first(Rule::Results), &[TokenKind::ResultsHeader]);
        assert_eq!(
            first(Rule::ParamEntry),
            &[
                TokenKind::MappedParam,
                TokenKind::TransformedParam,
                TokenKind::FixedScalarParam,
                TokenKind::FixedNullOrBoolParam,
                TokenKind::FixedObjectParam,
            ]
        );
    }

    #[test]
    fn test_alternatives_are_disjoint() {
        // One token of lookahead must be enough to pick an alternative.
        let entry = first(Rule::ParamEntry);
        let mut sorted = entry.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), entry.len());
    }

    #[test]
    fn test_describe_start_rule() {
        let description = describe();
        assert_eq!(description.start, "Flow");
        assert_eq!(description.rules.len(), GRAMMAR.len());
        match &description.rules[0] {
            GrammarNode::Rule { name, definition } => {
                assert_eq!(name, "Flow");
                assert!(matches!(definition[1], GrammarNode::RepetitionMandatory { .. }));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_ebnf() {
        insta::assert_snapshot!(to_ebnf(), @r###"
        Flow       ::= FLOW_HEADER Task+
        Task       ::= TASK_HEADER REQUIRES? PROVIDES? Resolver
        Resolver   ::= RESOLVER_HEADER Params? Results?
        Params     ::= PARAMS_HEADER ParamEntry+
        ParamEntry ::= MAPPED_PARAM | TRANSFORMED_PARAM | FIXED_SCALAR_PARAM | FIXED_NULL_OR_BOOL_PARAM | FIXED_OBJECT_PARAM
        Results    ::= RESULTS_HEADER MAPPED_RESULT+
        "###);
    }
}
