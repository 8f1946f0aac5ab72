//! Integration coverage for the lexer's public contract (§4.1, §8).

use vscript::lexer::Lexer;
use vscript::token::{Literal, Position, TokenKind};

#[test]
fn every_token_stream_ends_in_exactly_one_eof() {
    let sources = [
        "",
        "就是 x = 1",
        "// just a comment",
        "/* block */ 真",
        "函数 f(a, b) { 返回 a + b }",
    ];
    for source in sources {
        let tokens = Lexer::new(source).scan().unwrap();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
            1,
            "source {source:?} produced more than one EOF token"
        );
    }
}

#[test]
fn cjk_identifier_is_not_mistaken_for_a_keyword() {
    // "变量" (variable) shares no prefix with any reserved keyword string.
    let tokens = Lexer::new("就是 变量 = 真").scan().unwrap();
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].lexeme, "变量");
}

#[test]
fn number_literal_round_trips_through_decode() {
    for text in ["0", "42", "3.5", "1000000.125"] {
        let tokens = Lexer::new(text).scan().unwrap();
        assert_eq!(
            tokens[0].literal,
            Some(Literal::Number(text.parse::<f64>().unwrap()))
        );
    }
}

#[test]
fn unexpected_character_error_carries_its_position() {
    let err = Lexer::new("就是 x = @").scan().unwrap_err();
    assert_eq!(err.position, Position::new(1, 8));
}
