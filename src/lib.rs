//! VScript: a tree-walking interpreter for a small Chinese-keyworded
//! scripting language. See the crate's `src/main.rs` for the CLI/REPL
//! front-end; this library exposes the lexer -> parser -> evaluator
//! pipeline and the runtime value/environment model it runs on.

pub mod ast;
pub mod builtins;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod token;
pub mod value;

use error::{LexError, ParseError, RuntimeError};
use interpreter::Interpreter;
use lexer::Lexer;
use parser::Parser;

/// Any of the three error kinds a single `run` can surface, each
/// distinguishable by its `Display` prefix (§7).
#[derive(Debug)]
pub enum VScriptError {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl std::fmt::Display for VScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for VScriptError {}

impl From<LexError> for VScriptError {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for VScriptError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<RuntimeError> for VScriptError {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}

/// Lex, parse, and evaluate `source` against `interpreter`'s persistent
/// global environment. This is the one-way `run(source)` entry point
/// described in §2 and §7: lex/parse errors abort before any statement
/// runs, and evaluation stops at the first runtime error (statements
/// already executed are not rolled back).
pub fn run(interpreter: &Interpreter, source: &str) -> Result<(), VScriptError> {
    let tokens = Lexer::new(source).scan()?;
    let stmts = Parser::new(tokens).parse()?;
    interpreter.interpret(&stmts)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_output_of_literal_arithmetic() {
        // §8 scenario 1.
        let interpreter = Interpreter::new();
        assert!(run(&interpreter, "输出(1 + 2)").is_ok());
    }

    #[test]
    fn end_to_end_string_concatenation() {
        // §8 scenario 5.
        let interpreter = Interpreter::new();
        assert!(run(&interpreter, r#"输出("你好" + "，世界")"#).is_ok());
    }

    #[test]
    fn end_to_end_division_by_zero_is_reported() {
        // §8 scenario 6.
        let interpreter = Interpreter::new();
        let err = run(&interpreter, "输出(1 / 0)").unwrap_err();
        assert!(err.to_string().contains("除数不能为零"));
    }

    #[test]
    fn repl_style_accumulation_across_separate_run_calls() {
        // A REPL feeds each line through `run` separately but keeps one
        // `Interpreter`, so definitions from earlier calls stay visible.
        let interpreter = Interpreter::new();
        run(&interpreter, "就是 x = 1").unwrap();
        run(&interpreter, "x = x + 1").unwrap();
        assert!(run(&interpreter, "输出(x)").is_ok());
    }

    #[test]
    fn lex_error_aborts_before_any_statement_runs() {
        let interpreter = Interpreter::new();
        let err = run(&interpreter, "就是 x = \"未终止").unwrap_err();
        assert!(matches!(err, VScriptError::Lex(_)));
    }

    #[test]
    fn parse_error_surfaces_bit_exact_location_format() {
        let interpreter = Interpreter::new();
        let err = run(&interpreter, "就是 = 1").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("第"));
        assert!(msg.contains("列"));
        assert!(msg.contains("处"));
    }
}
