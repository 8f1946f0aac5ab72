//! Tokens -> statements (§4.2). Recursive-descent with one function per
//! precedence level, following the grammar in the EBNF exactly: each binary
//! tier's function calls the tier below it for its operands, so precedence is
//! encoded in the call graph rather than a table.

use crate::ast::{Expr, LiteralValue, Stmt};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Literal, Token, TokenKind};

const MAX_PARAMS: usize = 255;
const MAX_ARGS: usize = 255;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

type ParseResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse the whole token stream into a list of statements. On the first
    /// error, synchronizes and rethrows — the caller gets no partial AST
    /// (§4.2: "no statements are returned").
    pub fn parse(mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.synchronize();
                    return Err(err);
                }
            }
        }
        Ok(stmts)
    }

    // ---- cursor primitives ----

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|k| self.check(*k)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, on_missing: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek().clone();
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken(on_missing.to_owned()),
                token,
            ))
        }
    }

    fn error(&self, token: &Token, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, token.clone())
    }

    /// Panic-mode recovery (§4.2): discard tokens until the previous one is
    /// `}` or the next one starts a new declaration.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::RightBrace {
                return;
            }
            if matches!(
                self.peek().kind,
                TokenKind::Function
                    | TokenKind::Let
                    | TokenKind::If
                    | TokenKind::For
                    | TokenKind::Return
            ) {
                return;
            }
            self.advance();
        }
    }

    // ---- declarations ----

    fn declaration(&mut self) -> ParseResult<Stmt> {
        if self.matches(&[TokenKind::Function]) {
            self.function_decl()
        } else if self.matches(&[TokenKind::Let]) {
            self.let_decl()
        } else {
            self.statement()
        }
    }

    fn function_decl(&mut self) -> ParseResult<Stmt> {
        let name = self
            .consume(TokenKind::Identifier, "应为函数名")?
            .clone();
        self.consume(TokenKind::LeftParen, "应为 '('")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_PARAMS {
                    let token = self.peek().clone();
                    return Err(self.error(&token, ParseErrorKind::TooManyParameters));
                }
                params.push(self.consume(TokenKind::Identifier, "应为参数名")?.clone());
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "应为 ')'")?;
        self.consume(TokenKind::LeftBrace, "应为 '{'")?;

        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.declaration()?);
        }
        self.consume(TokenKind::RightBrace, "应为 '}'")?;

        Ok(Stmt::FunctionDecl {
            name,
            params,
            body: body.into(),
        })
    }

    fn let_decl(&mut self) -> ParseResult<Stmt> {
        let name = self
            .consume(TokenKind::Identifier, "应为变量名")?
            .clone();
        let initializer = if self.matches(&[TokenKind::Assign]) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Stmt::Let { name, initializer })
    }

    // ---- statements ----

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(&[TokenKind::If]) {
            self.if_statement()
        } else if self.matches(&[TokenKind::For]) {
            self.for_statement()
        } else if self.matches(&[TokenKind::Return]) {
            self.return_statement()
        } else if self.check(TokenKind::LeftBrace) {
            Ok(Stmt::Block(self.block()?))
        } else {
            self.expression_statement()
        }
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "应为 '('")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "应为 ')'")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&[TokenKind::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let var = self
            .consume(TokenKind::Identifier, "应为循环变量名")?
            .clone();
        self.consume(TokenKind::In, "应为 '在'")?;
        let iterable = self.expression()?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::For {
            var,
            iterable,
            body,
        })
    }

    /// `返回` consumes an expression unless the very next token is `}`
    /// (§4.2's deliberate return-expression boundary).
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if self.check(TokenKind::RightBrace) {
            None
        } else {
            Some(self.expression()?)
        };
        Ok(Stmt::Return { keyword, value })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.consume(TokenKind::LeftBrace, "应为 '{'")?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            stmts.push(self.declaration()?);
        }
        self.consume(TokenKind::RightBrace, "应为 '}'")?;
        Ok(stmts)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        Ok(Stmt::Expression(expr))
    }

    // ---- expressions, highest to lowest precedence as laid out bottom-up
    // in the grammar ----

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    /// `或`/`并` are folded as ordinary left-associative binary expressions
    /// here; short-circuiting is deliberately *not* done at parse time —
    /// it is an evaluator concern, and in fact the evaluator does not
    /// short-circuit either (§4.5, §9).
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.matches(&[TokenKind::Assign]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                _ => Err(self.error(&equals, ParseErrorKind::InvalidAssignmentTarget)),
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;
        while self.matches(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;
        while self.matches(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;
        while self.matches(&[TokenKind::NotEqual, TokenKind::Equal]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        while self.matches(&[
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        while self.matches(&[TokenKind::Plus, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;
        while self.matches(&[TokenKind::Slash, TokenKind::Star, TokenKind::Percent]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::Not, TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }
        self.call()
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.matches(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARGS {
                    let token = self.peek().clone();
                    return Err(self.error(&token, ParseErrorKind::TooManyArguments));
                }
                args.push(self.expression()?);
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "应为 ')'")?.clone();
        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        })
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::False]) {
            return Ok(Expr::Literal(LiteralValue::Boolean(false)));
        }
        if self.matches(&[TokenKind::True]) {
            return Ok(Expr::Literal(LiteralValue::Boolean(true)));
        }
        if self.matches(&[TokenKind::Null]) {
            return Ok(Expr::Literal(LiteralValue::Null));
        }
        if self.matches(&[TokenKind::Number]) {
            let Some(Literal::Number(n)) = self.previous().literal.clone() else {
                unreachable!("lexer always attaches a Literal::Number to a Number token")
            };
            return Ok(Expr::Literal(LiteralValue::Number(n)));
        }
        if self.matches(&[TokenKind::Str]) {
            let Some(Literal::Str(s)) = self.previous().literal.clone() else {
                unreachable!("lexer always attaches a Literal::Str to a Str token")
            };
            return Ok(Expr::Literal(LiteralValue::Str(s)));
        }
        if self.matches(&[TokenKind::LeftBracket]) {
            let mut elements = Vec::new();
            if !self.check(TokenKind::RightBracket) {
                loop {
                    elements.push(self.expression()?);
                    if !self.matches(&[TokenKind::Comma]) {
                        break;
                    }
                }
            }
            self.consume(TokenKind::RightBracket, "应为 ']'")?;
            return Ok(Expr::ArrayLit(elements));
        }
        if self.matches(&[TokenKind::Identifier]) {
            return Ok(Expr::Variable(self.previous().clone()));
        }
        if self.matches(&[TokenKind::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "应为 ')'")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        let token = self.peek().clone();
        Err(self.error(&token, ParseErrorKind::UnexpectedToken("应为表达式".to_owned())))
    }
}
