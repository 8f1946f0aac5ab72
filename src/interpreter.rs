//! Tree-walking evaluator (§4.5). Holds the global environment and the
//! registered built-ins across `interpret` calls so a REPL session
//! accumulates definitions (§2, §5).

use tracing::{debug, trace};

use crate::ast::{Expr, LiteralValue, Stmt};
use crate::builtins;
use crate::error::{EvalResult, RuntimeError, RuntimeErrorKind, Signal};
use crate::scope::Scope;
use crate::token::{Token, TokenKind};
use crate::value::{Callable, Value};
use std::rc::Rc;

pub struct Interpreter {
    globals: Scope,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Scope::new_global();
        builtins::register_all(&globals);
        Self { globals }
    }

    /// Look up a name in the global scope directly, bypassing the AST.
    /// Used by host code embedding the interpreter (and by this crate's own
    /// integration tests) to read back a binding after a `run` call,
    /// mirroring the teacher engine's `Scope::get_value` (`rhai/src/scope.rs`).
    pub fn get_global(&self, name: &str) -> Option<Value> {
        let probe = Token::new(TokenKind::Identifier, name, crate::token::Position::START);
        self.globals.get(&probe).ok()
    }

    /// Execute a parsed program against the persistent global scope.
    /// `返回` escaping all the way to the top level (a top-level `返回`
    /// outside any function) is treated as ordinary completion — there is
    /// no function activation to unwind to.
    pub fn interpret(&self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            match self.execute(stmt, &self.globals) {
                Ok(()) => {}
                Err(Signal::Error(err)) => return Err(err),
                Err(Signal::Return(_)) => return Ok(()),
            }
        }
        Ok(())
    }

    fn execute(&self, stmt: &Stmt, env: &Scope) -> EvalResult<()> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
                Ok(())
            }
            Stmt::Let { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Null,
                };
                trace!(name = %name.lexeme, "就是");
                env.define(&name.lexeme, value);
                Ok(())
            }
            Stmt::FunctionDecl { name, params, body } => {
                let callable = Callable::Function {
                    name: name.lexeme.clone(),
                    params: params.iter().map(|p| p.lexeme.clone()).collect(),
                    body: Rc::clone(body),
                    closure: env.clone(),
                };
                debug!(name = %name.lexeme, "函数声明");
                env.define(&name.lexeme, Value::Callable(Rc::new(callable)));
                Ok(())
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env)?.truthy() {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition, env)?.truthy() {
                    self.execute(body, env)?;
                }
                Ok(())
            }
            Stmt::For {
                var,
                iterable,
                body,
            } => self.execute_for(var, iterable, body, env),
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Null,
                };
                Err(Signal::Return(value))
            }
            Stmt::Block(stmts) => self.execute_block(stmts, &env.child()),
        }
    }

    /// Push a fresh child environment, run every statement in order, pop
    /// unconditionally — including on error or return-unwind (§4.5, §5).
    fn execute_block(&self, stmts: &[Stmt], block_env: &Scope) -> EvalResult<()> {
        for stmt in stmts {
            self.execute(stmt, block_env)?;
        }
        Ok(())
    }

    fn execute_for(&self, var: &Token, iterable: &Expr, body: &Stmt, env: &Scope) -> EvalResult<()> {
        let iterable_value = self.evaluate(iterable, env)?;
        let Value::Array(items) = iterable_value else {
            return Err(RuntimeError::new(RuntimeErrorKind::ForRequiresArray, var.position).into());
        };
        let loop_env = env.child();
        // Snapshot the length up front: the array can only change identity
        // (by reassignment), never grow/shrink in place, so this is safe
        // and avoids holding the RefCell borrow across the loop body.
        let snapshot: Vec<Value> = items.borrow().clone();
        for element in snapshot {
            loop_env.define(&var.lexeme, element);
            self.execute(body, &loop_env)?;
        }
        Ok(())
    }

    fn evaluate(&self, expr: &Expr, env: &Scope) -> EvalResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(literal_to_value(lit)),
            Expr::Grouping(inner) => self.evaluate(inner, env),
            Expr::Variable(name) => Ok(env.get(name)?),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value, env)?;
                env.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right, env),
            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right, env),
            Expr::ArrayLit(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate(element, env)?);
                }
                Ok(Value::array(values))
            }
            Expr::Call {
                callee,
                paren,
                args,
            } => self.evaluate_call(callee, paren, args, env),
        }
    }

    fn evaluate_unary(&self, operator: &Token, right: &Expr, env: &Scope) -> EvalResult<Value> {
        let right = self.evaluate(right, env)?;
        match operator.kind {
            TokenKind::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(type_error(operator, &other, "一元 '-' 需要数字操作数").into()),
            },
            TokenKind::Not | TokenKind::Bang => Ok(Value::Boolean(!right.truthy())),
            other => unreachable!("parser never emits {other:?} as a unary operator"),
        }
    }

    fn evaluate_binary(
        &self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
        env: &Scope,
    ) -> EvalResult<Value> {
        // Both operands are always evaluated left-to-right before the
        // operator fires (§4.5, §8) — this holds even for `并`/`或`, which
        // deliberately do *not* short-circuit (§9, REDESIGN FLAGS: pinned
        // behavior, not "fixed").
        let left = self.evaluate(left, env)?;
        let right = self.evaluate(right, env)?;

        match operator.kind {
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => {
                    Ok(Value::string(format!("{a}{b}")))
                }
                _ => Err(type_error(operator, &left, "'+' 需要两个数字或两个字符串").into()),
            },
            TokenKind::Minus => numeric_binop(operator, &left, &right, |a, b| a - b),
            TokenKind::Star => numeric_binop(operator, &left, &right, |a, b| a * b),
            TokenKind::Percent => numeric_binop(operator, &left, &right, |a, b| a % b),
            TokenKind::Slash => {
                let (a, b) = as_numbers(operator, &left, &right)?;
                if b == 0.0 {
                    return Err(RuntimeError::new(RuntimeErrorKind::DivisionByZero, operator.position).into());
                }
                Ok(Value::Number(a / b))
            }
            TokenKind::Less => numeric_cmp(operator, &left, &right, |a, b| a < b),
            TokenKind::LessEqual => numeric_cmp(operator, &left, &right, |a, b| a <= b),
            TokenKind::Greater => numeric_cmp(operator, &left, &right, |a, b| a > b),
            TokenKind::GreaterEqual => numeric_cmp(operator, &left, &right, |a, b| a >= b),
            TokenKind::Equal => Ok(Value::Boolean(left == right)),
            TokenKind::NotEqual => Ok(Value::Boolean(left != right)),
            TokenKind::And => Ok(Value::Boolean(left.truthy() && right.truthy())),
            TokenKind::Or => Ok(Value::Boolean(left.truthy() || right.truthy())),
            other => unreachable!("parser never emits {other:?} as a binary operator"),
        }
    }

    fn evaluate_call(
        &self,
        callee: &Expr,
        paren: &Token,
        args: &[Expr],
        env: &Scope,
    ) -> EvalResult<Value> {
        let callee_value = self.evaluate(callee, env)?;
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate(arg, env)?);
        }

        let Value::Callable(callable) = callee_value else {
            return Err(RuntimeError::new(RuntimeErrorKind::NotCallable, paren.position).into());
        };

        if arg_values.len() != callable.arity() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ArityMismatch {
                    expected: callable.arity(),
                    got: arg_values.len(),
                },
                paren.position,
            )
            .into());
        }

        match callable.as_ref() {
            Callable::Native { func, .. } => Ok(func(&arg_values, paren.position)?),
            Callable::Function {
                params,
                body,
                closure,
                ..
            } => {
                let call_env = closure.child();
                for (param, value) in params.iter().zip(arg_values) {
                    call_env.define(param, value);
                }
                match self.execute_block(body, &call_env) {
                    Ok(()) => Ok(Value::Null),
                    Err(Signal::Return(value)) => Ok(value),
                    Err(err @ Signal::Error(_)) => Err(err),
                }
            }
        }
    }
}

fn literal_to_value(lit: &LiteralValue) -> Value {
    match lit {
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Str(s) => Value::string(s.clone()),
        LiteralValue::Boolean(b) => Value::Boolean(*b),
        LiteralValue::Null => Value::Null,
    }
}

fn type_error(operator: &Token, _offender: &Value, msg: &str) -> RuntimeError {
    RuntimeError::new(RuntimeErrorKind::TypeMismatch(msg.to_owned()), operator.position)
}

fn as_numbers(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(type_error(operator, left, "需要两个数字操作数")),
    }
}

fn numeric_binop(
    operator: &Token,
    left: &Value,
    right: &Value,
    f: impl Fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    let (a, b) = as_numbers(operator, left, right)?;
    Ok(Value::Number(f(a, b)))
}

fn numeric_cmp(
    operator: &Token,
    left: &Value,
    right: &Value,
    f: impl Fn(f64, f64) -> bool,
) -> EvalResult<Value> {
    let (a, b) = as_numbers(operator, left, right)?;
    Ok(Value::Boolean(f(a, b)))
}
