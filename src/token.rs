//! Token types produced by the lexer and consumed by the parser.

use std::fmt;

/// A location (line number + column) in the source text. Both are 1-based and
/// point at the first character of the token they are attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Self = Self { line: 1, column: 1 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第 {} 行，第 {} 列", self.line, self.column)
    }
}

/// The decoded literal value carried by number and string tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
}

/// The closed set of lexical categories VScript source can tokenize to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // single-character delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,

    // operators
    Plus,
    Minus,
    Star,
    Percent,
    Slash,
    Assign,
    Equal,
    Bang,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // literals
    Number,
    Str,
    Identifier,

    // keywords
    Function,
    If,
    Else,
    Return,
    For,
    In,
    Let,
    True,
    False,
    Null,
    And,
    Or,
    Not,

    Eof,
}

/// A single lexical unit together with the source slice it came from and its
/// decoded literal (for numbers and strings).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            position,
        }
    }

    pub fn with_literal(
        kind: TokenKind,
        lexeme: impl Into<String>,
        literal: Literal,
        position: Position,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: Some(literal),
            position,
        }
    }

    /// The `'lexeme'` or `文件末尾` fragment used in error reports (§4.2).
    pub fn describe(&self) -> String {
        if self.kind == TokenKind::Eof {
            "文件末尾".to_owned()
        } else {
            format!("'{}'", self.lexeme)
        }
    }
}

/// Maps a maximal alphanumeric run to a keyword kind, if it is one of the
/// reserved keyword strings. Bit-exact with §4.1.
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    Some(match word {
        "函数" => TokenKind::Function,
        "如果" => TokenKind::If,
        "否则" => TokenKind::Else,
        "返回" => TokenKind::Return,
        "对于" => TokenKind::For,
        "在" => TokenKind::In,
        "就是" => TokenKind::Let,
        "真" => TokenKind::True,
        "假" => TokenKind::False,
        "空" => TokenKind::Null,
        "并" => TokenKind::And,
        "或" => TokenKind::Or,
        "非" => TokenKind::Not,
        _ => return None,
    })
}
