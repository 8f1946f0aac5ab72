//! Runtime values and callables.

use std::fmt;
use std::rc::Rc;
use std::cell::RefCell;

use crate::ast::Stmt;
use crate::error::RuntimeError;
use crate::scope::Scope;
use crate::token::Position;

/// A mutable-by-reassignment flat array. Identity, not content, is what
/// equality compares (§4.5) — two `Value::Array`s are equal only if they
/// share the same backing cell.
pub type ArrayData = Rc<RefCell<Vec<Value>>>;

/// A host-implemented built-in. Built-ins cannot themselves trigger a
/// `返回` unwind, so they report failure as a plain [`RuntimeError`] rather
/// than the evaluator's [`crate::error::Signal`].
pub type NativeFn = fn(args: &[Value], call_site: Position) -> Result<Value, RuntimeError>;

/// Something that can be called with a fixed number of positional arguments.
pub enum Callable {
    /// One of the fixed built-ins registered at interpreter construction (§4.6).
    Native {
        name: &'static str,
        arity: usize,
        func: NativeFn,
    },
    /// A `函数` declaration, closing over the environment active when it was
    /// declared (§3, §4.5) rather than the environment of its caller.
    Function {
        name: String,
        params: Vec<String>,
        body: Rc<[Stmt]>,
        closure: Scope,
    },
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Self::Native { arity, .. } => *arity,
            Self::Function { params, .. } => params.len(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Native { name, .. } => name,
            Self::Function { name, .. } => name,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<函数 {}>", self.name())
    }
}

/// A VScript runtime value (§3).
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(Rc<str>),
    Boolean(bool),
    Null,
    Array(ArrayData),
    Callable(Rc<Callable>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Self::String(s.into())
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(elements)))
    }

    /// Implicit conversion to boolean used by conditionals and logical
    /// operators (§4.5): `空` is false, a boolean is itself, everything
    /// else (including `0`, `""`, an empty array) is true.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(b) => *b,
            _ => true,
        }
    }

    /// The string tag reported by the `类型` built-in (§4.6).
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Array(_) => "数组",
            Self::Number(_) => "数字",
            Self::String(_) => "字符串",
            Self::Boolean(_) => "布尔",
            Self::Null => "空",
            Self::Callable(_) => "函数",
        }
    }

    /// The human-readable rendering used by `输出` (§4.6): integers print
    /// without a trailing `.0`, arrays recursively render their elements
    /// joined by `, ` and wrapped in brackets.
    pub fn render(&self) -> String {
        match self {
            Self::Number(n) => render_number(*n),
            Self::String(s) => s.to_string(),
            Self::Boolean(true) => "真".to_owned(),
            Self::Boolean(false) => "假".to_owned(),
            Self::Null => "空".to_owned(),
            Self::Array(items) => {
                let rendered: Vec<String> = items.borrow().iter().map(Value::render).collect();
                format!("[{}]", rendered.join(", "))
            }
            Self::Callable(c) => format!("<函数 {}>", c.name()),
        }
    }
}

pub fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl PartialEq for Value {
    /// Per §4.5: `空 == 空` is true, `空` against anything else is false,
    /// otherwise strict value equality (numeric/content/value), and arrays
    /// and callables compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
