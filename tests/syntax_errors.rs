//! Grammar errors in strict and tolerant mode

use naturally::flowed::error::CompileError;
use naturally::flowed::token::TokenKind;
use naturally::{compile, CompileOptions, Compiler};

const THREE_MISTAKES: &str = "Define a flow named f that has the following tasks:
  A task named noResolver
    that requires the following inputs: a
    with the following mapped inputs:
      param x mapped from a
  A task named emptyParams
    using a resolver named r
      with the following mapped inputs:
  A task named providesFirst
    that provides the following outputs: b
    that requires the following inputs: a
    using a resolver named r
";

fn syntax_errors(result: Result<naturally::FlowDocument, CompileError>) -> Vec<(usize, Option<TokenKind>)> {
    match result {
        Err(CompileError::Syntax(errors)) => errors.iter().map(|e| (e.offset, e.found)).collect(),
        other => panic!("expected syntax errors, got {:?}", other),
    }
}

#[test]
fn test_strict_mode_reports_first_error_only() {
    let errors = syntax_errors(compile(THREE_MISTAKES));
    assert_eq!(
        errors,
        vec![(
            THREE_MISTAKES.find("with the following mapped inputs").unwrap(),
            Some(TokenKind::ParamsHeader)
        )]
    );
}

#[test]
fn test_tolerant_mode_reports_every_error() {
    let compiler = Compiler::new(CompileOptions::tolerant());
    let errors = syntax_errors(compiler.compile(THREE_MISTAKES));
    assert_eq!(
        errors,
        vec![
            (
                THREE_MISTAKES.find("with the following mapped inputs").unwrap(),
                Some(TokenKind::ParamsHeader)
            ),
            (
                THREE_MISTAKES.find("A task named providesFirst").unwrap(),
                Some(TokenKind::TaskHeader)
            ),
            (
                THREE_MISTAKES.find("that requires the following inputs: a\n    using").unwrap(),
                Some(TokenKind::Requires)
            ),
        ]
    );
}

const MIXED_UP_SECTIONS: &str = "Define a flow named f that has the following tasks:
  A task named t
    using a resolver named r
      with the following mapped inputs:
        param a mapped from b
        param z mapped to w
      with the following mapped outputs:
        param q mapped from x
  A task named u
    using a resolver named r
      with the following mapped outputs:
";

#[test]
fn test_tolerant_mode_reports_every_error_inside_one_task() {
    let compiler = Compiler::new(CompileOptions::tolerant());
    let errors = syntax_errors(compiler.compile(MIXED_UP_SECTIONS));
    assert_eq!(
        errors,
        vec![
            (
                MIXED_UP_SECTIONS.find("param z").unwrap(),
                Some(TokenKind::MappedResult)
            ),
            (
                MIXED_UP_SECTIONS.find("param q").unwrap(),
                Some(TokenKind::MappedParam)
            ),
            (MIXED_UP_SECTIONS.len(), None),
        ]
    );
}

#[test]
fn test_tolerant_mode_never_returns_a_document() {
    let source = "Define a flow named f that has the following tasks:
  A task named t
    using a resolver named r
      with the following mapped outputs:
  A task named u
    using a resolver named r";
    let compiler = Compiler::new(CompileOptions::tolerant());
    assert!(compiler.compile(source).is_err());
    assert!(compiler.tree(source).is_err());
}

#[test]
fn test_document_must_start_with_flow_header() {
    let source = "A task named t\n  using a resolver named r";
    let errors = syntax_errors(compile(source));
    assert_eq!(errors, vec![(0, Some(TokenKind::TaskHeader))]);
}

#[test]
fn test_error_report() {
    let source = "Define a flow named f that has the following tasks:
  A task named t
    with the following mapped inputs:
      param x mapped from a
";
    let error = compile(source).unwrap_err();
    insta::assert_snapshot!(error.render(source), @r###"
    Error at 3:5: expected one of REQUIRES, PROVIDES, RESOLVER_HEADER but found PARAMS_HEADER at offset 73
         1 | Define a flow named f that has the following tasks:
         2 |   A task named t
    >>   3 |     with the following mapped inputs:
         4 |       param x mapped from a
    "###);
}
