//! Error types for the three stages of the pipeline: lexing, parsing and
//! evaluation. Each kind is distinguishable by its `Display` prefix (§7).

use std::error::Error;
use std::fmt;

use crate::token::{Position, Token};
use crate::value::Value;

/// What went wrong while scanning source text into tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    UnexpectedCharacter(char),
    UnterminatedString,
    UnterminatedBlockComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(c) => write!(f, "意外的字符 '{c}'"),
            Self::UnterminatedString => f.write_str("未终止的字符串"),
            Self::UnterminatedBlockComment => f.write_str("未终止的块注释"),
        }
    }
}

/// A lexical error, attributed to the position where the defect begins.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

impl Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}：{}", self.position, self.kind)
    }
}

/// What went wrong while parsing a token stream into statements.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    Lex(LexErrorKind),
    UnexpectedToken(String),
    InvalidAssignmentTarget,
    TooManyParameters,
    TooManyArguments,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(kind) => write!(f, "{kind}"),
            Self::UnexpectedToken(msg) => f.write_str(msg),
            Self::InvalidAssignmentTarget => f.write_str("无效的赋值目标"),
            Self::TooManyParameters => f.write_str("参数数量不能超过 255 个"),
            Self::TooManyArguments => f.write_str("实参数量不能超过 255 个"),
        }
    }
}

/// A parse error, attributed to the token where it was detected. Rendered in
/// the bit-exact `第 L 行，第 C 列，在 WHERE 处：MSG` form required by §4.2.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub token: Token,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, token: Token) -> Self {
        Self { kind, token }
    }
}

impl Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}，在 {} 处：{}",
            self.token.position,
            self.token.describe(),
            self.kind
        )
    }
}

/// What went wrong during tree-walking evaluation. Each variant corresponds
/// to one of the runtime errors enumerated in §7.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    TypeMismatch(String),
    DivisionByZero,
    UndefinedVariable(String),
    NotCallable,
    ArityMismatch { expected: usize, got: usize },
    ForRequiresArray,
    RangeArgsNotNumbers,
    LengthArgInvalid,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch(msg) => f.write_str(msg),
            Self::DivisionByZero => f.write_str("除数不能为零"),
            Self::UndefinedVariable(name) => write!(f, "未定义的变量 '{name}'"),
            Self::NotCallable => f.write_str("只能调用函数"),
            Self::ArityMismatch { expected, got } => {
                write!(f, "期望 {expected} 个参数但得到 {got} 个")
            }
            Self::ForRequiresArray => f.write_str("'对于' 循环需要一个数组"),
            Self::RangeArgsNotNumbers => f.write_str("范围函数需要两个数字参数"),
            Self::LengthArgInvalid => f.write_str("长度函数需要数组或字符串参数"),
        }
    }
}

/// A runtime error, attributed to the token that triggered it (the operator,
/// call paren, or loop variable, per §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub position: Position,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, position: Position) -> Self {
        Self { kind, position }
    }
}

impl Error for RuntimeError {}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "运行时错误（{}）：{}", self.position, self.kind)
    }
}

/// The evaluator's unified outcome signal. `Return` is not a real error: it
/// is the `返回` control-flow unwind threaded through `?` exactly like a
/// propagating error, and is caught at the function-call boundary rather
/// than ever reaching the top-level diagnostic printer (§7, §9).
#[derive(Debug, Clone)]
pub enum Signal {
    Error(RuntimeError),
    Return(Value),
}

impl From<RuntimeError> for Signal {
    fn from(err: RuntimeError) -> Self {
        Self::Error(err)
    }
}

pub type EvalResult<T> = Result<T, Signal>;
