//! Integration coverage for array literals, `范围`, and `长度` (§3, §4.6, §8).

use vscript::interpreter::Interpreter;
use vscript::value::Value;

fn global(interpreter: &Interpreter, name: &str) -> Value {
    interpreter.get_global(name).unwrap()
}

/// Array equality is identity-based (`value.rs`'s `Rc::ptr_eq`), so tests
/// that want to pin *contents* destructure the backing `Vec` instead of
/// comparing `Value::Array`s directly.
fn elements(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.borrow().clone(),
        other => panic!("expected an array, got {other:?}"),
    }
}

#[test]
fn array_literal_holds_heterogeneous_values_in_order() {
    let interpreter = Interpreter::new();
    vscript::run(&interpreter, r#"就是 a = [1, "two", 真, 空]"#).unwrap();
    assert_eq!(
        elements(&global(&interpreter, "a")),
        vec![
            Value::Number(1.0),
            Value::string("two"),
            Value::Boolean(true),
            Value::Null,
        ]
    );
}

#[test]
fn nested_array_literals_are_supported() {
    let interpreter = Interpreter::new();
    vscript::run(&interpreter, "就是 a = [[1, 2], [3, 4]]").unwrap();
    let outer = elements(&global(&interpreter, "a"));
    assert_eq!(
        outer.iter().map(elements).collect::<Vec<_>>(),
        vec![
            vec![Value::Number(1.0), Value::Number(2.0)],
            vec![Value::Number(3.0), Value::Number(4.0)],
        ]
    );
}

#[test]
fn array_equality_is_by_identity_not_content() {
    let interpreter = Interpreter::new();
    vscript::run(
        &interpreter,
        "就是 a = [1, 2]
         就是 b = [1, 2]
         就是 c = a
         就是 same = (c == a)
         就是 different = (a == b)",
    )
    .unwrap();
    assert_eq!(global(&interpreter, "same"), Value::Boolean(true));
    assert_eq!(global(&interpreter, "different"), Value::Boolean(false));
}

#[test]
fn range_produces_a_half_open_interval_of_integers() {
    let interpreter = Interpreter::new();
    vscript::run(&interpreter, "就是 r = 范围(0, 3)").unwrap();
    assert_eq!(
        elements(&global(&interpreter, "r")),
        vec![Value::Number(0.0), Value::Number(1.0), Value::Number(2.0)]
    );
}

#[test]
fn range_with_end_not_greater_than_start_is_empty() {
    let interpreter = Interpreter::new();
    vscript::run(&interpreter, "就是 r = 范围(5, 2)").unwrap();
    assert!(elements(&global(&interpreter, "r")).is_empty());
}

#[test]
fn length_of_array_counts_elements() {
    let interpreter = Interpreter::new();
    vscript::run(&interpreter, "就是 n = 长度([1, 2, 3, 4])").unwrap();
    assert_eq!(global(&interpreter, "n"), Value::Number(4.0));
}

#[test]
fn length_of_string_counts_code_units_not_bytes() {
    let interpreter = Interpreter::new();
    vscript::run(&interpreter, r#"就是 n = 长度("你好")"#).unwrap();
    assert_eq!(global(&interpreter, "n"), Value::Number(2.0));
}

#[test]
fn reassigning_an_array_variable_does_not_mutate_the_original_binding() {
    // There is no element-mutation operator in the surface syntax (§3, §9
    // open question): arrays change only by whole-value reassignment.
    let interpreter = Interpreter::new();
    vscript::run(
        &interpreter,
        "就是 a = [1, 2, 3]
         就是 b = a
         a = [9]",
    )
    .unwrap();
    assert_eq!(
        elements(&global(&interpreter, "b")),
        vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]
    );
}
