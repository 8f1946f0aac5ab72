//! The fixed set of host-implemented callables registered in the global
//! environment at interpreter construction (§4.6).

use std::rc::Rc;

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::scope::Scope;
use crate::token::Position;
use crate::value::{Callable, Value};

/// Register all built-ins into `globals`. Called once per [`Interpreter`]
/// construction.
///
/// [`Interpreter`]: crate::interpreter::Interpreter
pub fn register_all(globals: &Scope) {
    register(globals, "输出", 1, output);
    register(globals, "范围", 2, range);
    register(globals, "长度", 1, length);
    register(globals, "类型", 1, type_of);
}

fn register(globals: &Scope, name: &'static str, arity: usize, func: crate::value::NativeFn) {
    globals.define(
        name,
        Value::Callable(Rc::new(Callable::Native { name, arity, func })),
    );
}

/// `输出`: write a human-readable rendering of the argument to stdout
/// followed by a newline. Cannot fail.
fn output(args: &[Value], _call_site: Position) -> Result<Value, RuntimeError> {
    println!("{}", args[0].render());
    Ok(Value::Null)
}

/// `范围`: `[start, start+1, …]` up to but excluding `end`, empty if
/// `end <= start`. Non-integer numeric arguments coerce via floating
/// arithmetic, stepping by `1.0` from `start` itself — no integer
/// coercion (§9 open question, pinned): `范围(0.5, 3)` yields
/// `[0.5, 1.5, 2.5]`.
fn range(args: &[Value], call_site: Position) -> Result<Value, RuntimeError> {
    let (Value::Number(start), Value::Number(end)) = (&args[0], &args[1]) else {
        return Err(RuntimeError::new(RuntimeErrorKind::RangeArgsNotNumbers, call_site));
    };
    let mut elements = Vec::new();
    let mut i = *start;
    while i < *end {
        elements.push(Value::Number(i));
        i += 1.0;
    }
    Ok(Value::array(elements))
}

/// `长度`: code-unit count of an array or string.
fn length(args: &[Value], call_site: Position) -> Result<Value, RuntimeError> {
    let len = match &args[0] {
        Value::Array(items) => items.borrow().len(),
        Value::String(s) => s.encode_utf16().count(),
        _ => return Err(RuntimeError::new(RuntimeErrorKind::LengthArgInvalid, call_site)),
    };
    Ok(Value::Number(len as f64))
}

/// `类型`: the string tag for any value. Never fails — every [`Value`]
/// variant has a tag (§4.6's "else `未知`" branch is unreachable given the
/// closed value set, but `Value::type_tag` is total over the enum either
/// way).
fn type_of(args: &[Value], _call_site: Position) -> Result<Value, RuntimeError> {
    Ok(Value::string(args[0].type_tag()))
}
