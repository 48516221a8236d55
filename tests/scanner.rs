//! Scanner behavior on whole documents and single phrases

use naturally::flowed::error::{DecodeError, LexicalError, ScanError};
use naturally::flowed::lexing::tokenize;
use naturally::flowed::testing::FlowedSources;
use naturally::flowed::token::{Literal, Payload, TokenKind};
use rstest::rstest;
use serde_json::{json, Value};

fn single_payload(source: &str) -> Payload {
    let mut tokens = tokenize(source).expect("tokenize failed");
    assert_eq!(tokens.len(), 1, "expected one token for {:?}", source);
    tokens.remove(0).payload
}

#[test]
fn test_basic_sample_token_kinds() {
    let source = FlowedSources::get_string("basic.flowed").unwrap();
    let kinds: Vec<TokenKind> = tokenize(&source).unwrap().into_iter().map(|t| t.kind).collect();

    insta::assert_debug_snapshot!(kinds, @r###"
    [
        FlowHeader,
        TaskHeader,
        Requires,
        Provides,
        ResolverHeader,
        ParamsHeader,
        MappedParam,
        MappedParam,
        TransformedParam,
        TransformedParam,
        TransformedParam,
        FixedScalarParam,
        FixedScalarParam,
        FixedScalarParam,
        FixedNullOrBoolParam,
        FixedNullOrBoolParam,
        FixedNullOrBoolParam,
        FixedObjectParam,
        FixedObjectParam,
        ResultsHeader,
        MappedResult,
    ]
    "###);
}

#[test]
fn test_token_spans_are_ordered_and_disjoint() {
    let source = FlowedSources::get_string("conditional.flowed").unwrap();
    let tokens = tokenize(&source).unwrap();
    for pair in tokens.windows(2) {
        assert!(pair[0].span.end <= pair[1].span.start);
    }
    assert!(tokens.iter().all(|t| t.span.end <= source.len()));
}

#[rstest]
#[case::integer("param p with value 123", json!(123))]
#[case::negative("param p with value -42", json!(-42))]
#[case::float("param p with value 456.789", json!(456.789))]
#[case::exponent("param p with value 1e3", json!(1000))]
#[case::integral_float("param p with value 1.0", json!(1))]
#[case::large_exponent("param p with value 1e300", json!(1e300))]
#[case::quoted("param p with value \"sample string\"", json!("sample string"))]
#[case::quoted_verbatim(r#"param p with value "a\nb""#, json!(r"a\nb"))]
#[case::trailing_comma("param p with value 7,", json!(7))]
fn test_fixed_scalar_decoding(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(
        single_payload(source),
        Payload::FixedScalarParam(Literal {
            to: "p".into(),
            value: expected
        })
    );
}

#[rstest]
#[case("param p with a null value", Value::Null)]
#[case("param p with a Null value", Value::Null)]
#[case("param p with a true value", json!(true))]
#[case("param p with a TRUE value;", json!(true))]
#[case("param p with a false value", json!(false))]
fn test_keyword_decoding(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(
        single_payload(source),
        Payload::FixedNullOrBoolParam(Literal {
            to: "p".into(),
            value: expected
        })
    );
}

#[rstest]
#[case::string(r#"param p transformed with "{{a.b}}";"#, json!("{{a.b}}"))]
#[case::object(
    "param p transformed with {\n  \"k\": \"{{a}}\",\n  \"n\": [1, 2]\n};",
    json!({"k": "{{a}}", "n": [1, 2]})
)]
#[case::array("param p transformed with [\"x\", \"y\"];", json!(["x", "y"]))]
#[case::empty_object("param p transformed with {};", json!({}))]
fn test_transformed_decoding(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(
        single_payload(source),
        Payload::TransformedParam(Literal {
            to: "p".into(),
            value: expected
        })
    );
}

#[rstest]
#[case::object("param p with value { \"a1\": \"123\", \"a2\": true };", json!({"a1": "123", "a2": true}))]
#[case::array("param p with value [\n  \"a\",\n  \"b\"\n];", json!(["a", "b"]))]
#[case::nested("param p with value [[1], {\"x\": null}];", json!([[1], {"x": null}]))]
#[case::surrogate_pair("param p with value [\"\\ud83d\\ude00\"];", json!(["\u{1F600}"]))]
#[case::escaped_bmp_char("param p with value { \"k\": \"caf\\u00e9\" };", json!({"k": "caf\u{e9}"}))]
#[case::raw_delete("param p with value [\"a\u{7f}b\"];", json!(["a\u{7f}b"]))]
#[case::raw_c1_control("param p with value [\"\u{85}\u{9f}\"];", json!(["\u{85}\u{9f}"]))]
fn test_fixed_object_decoding(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(
        single_payload(source),
        Payload::FixedObjectParam(Literal {
            to: "p".into(),
            value: expected
        })
    );
}

#[rstest]
#[case::unquoted_key("param p transformed with { k: 1 };")]
#[case::trailing_comma("param p with value [1, 2,];")]
#[case::single_quotes("param p with value ['a'];")]
#[case::bad_number("param p with value 12abc")]
#[case::lone_surrogate("param p with value [\"\\ud83d\"];")]
#[case::raw_tab_in_string("param p transformed with [\"a\tb\"];")]
fn test_decode_failures(#[case] source: &str) {
    match tokenize(source) {
        Err(ScanError::Decode(DecodeError {
            param_id, offset, ..
        })) => {
            assert_eq!(param_id, "p");
            assert_eq!(offset, 0);
        }
        other => panic!("expected a decode error for {:?}, got {:?}", source, other),
    }
}

#[rstest]
#[case::lowercase_header("a task named t", 0)]
#[case::unknown_phrase("A task named t\n  run it", 17)]
#[case::missing_delimiter("param p transformed with { \"k\": 1 }\n", 0)]
#[case::old_fixed_syntax("param p with a fixed value of x", 0)]
fn test_lexical_failures(#[case] source: &str, #[case] offset: usize) {
    assert_eq!(
        tokenize(source),
        Err(ScanError::Lexical(LexicalError { offset }))
    );
}

#[test]
fn test_crlf_line_endings() {
    let source = "Define a flow named f that has the following tasks:\r\n  A task named t\r\n    using a resolver named r\r\n";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(
        tokens[2].payload,
        Payload::ResolverHeader { name: "r".into() }
    );
}
