//! Integration coverage for parser error reporting (§4.2, §8).

use vscript::error::ParseErrorKind;
use vscript::lexer::Lexer;
use vscript::parser::Parser;

fn parse_err(source: &str) -> vscript::error::ParseError {
    let tokens = Lexer::new(source).scan().unwrap();
    Parser::new(tokens).parse().unwrap_err()
}

#[test]
fn assigning_to_a_call_result_is_a_parse_error() {
    let err = parse_err("f() = 1");
    assert_eq!(err.kind, ParseErrorKind::InvalidAssignmentTarget);
}

#[test]
fn assigning_to_a_literal_is_a_parse_error() {
    let err = parse_err("1 = 2");
    assert_eq!(err.kind, ParseErrorKind::InvalidAssignmentTarget);
}

#[test]
fn assigning_to_a_grouping_is_a_parse_error() {
    let err = parse_err("(x) = 1");
    assert_eq!(err.kind, ParseErrorKind::InvalidAssignmentTarget);
}

#[test]
fn more_than_255_parameters_is_a_parse_error() {
    let params: Vec<String> = (0..256).map(|i| format!("p{i}")).collect();
    let source = format!("函数 f({}) {{ }}", params.join(", "));
    let err = parse_err(&source);
    assert_eq!(err.kind, ParseErrorKind::TooManyParameters);
}

#[test]
fn more_than_255_arguments_is_a_parse_error() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("f({})", args.join(", "));
    let err = parse_err(&source);
    assert_eq!(err.kind, ParseErrorKind::TooManyArguments);
}

#[test]
fn error_report_format_is_bit_exact_for_a_named_token() {
    let err = parse_err("就是 = 1");
    let rendered = err.to_string();
    assert!(rendered.starts_with("第 1 行，第 4 列，在 '=' 处："));
}

#[test]
fn error_report_format_uses_eof_sentinel_at_end_of_input() {
    let err = parse_err("如果 (真) {");
    let rendered = err.to_string();
    assert!(rendered.contains("在 文件末尾 处："));
}

#[test]
fn return_expression_boundary_treats_closing_brace_as_no_expression() {
    // `返回` with nothing but `}` following must parse, not error.
    let tokens = Lexer::new("函数 f() { 返回 }").scan().unwrap();
    assert!(Parser::new(tokens).parse().is_ok());
}
