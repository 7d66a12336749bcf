//! Tests for `call`, `apply` and `bind`.
//!
//! These drive the binder both through snippets and through the Rust API,
//! checking receiver resolution, argument passing and that receivers are
//! never written to.

extern crate ctxbind;

use ctxbind::runner::api::Engine;
use ctxbind::runner::binder;
use ctxbind::runner::ds::error::{BindError, JErrorType};
use ctxbind::runner::ds::object::{new_array_object, new_object_from, own_entries};
use ctxbind::runner::ds::value::JsValue;
use ctxbind::runner::plugin::config::{EngineConfig, ReceiverPolicy};

const FULL_NAME: &str = "
    var printFullName = function (hometown, state) {
        return this.firstName + ' ' + this.lastName + ' is from ' + hometown + ', ' + state;
    };
    var name = { firstName: 'Kishan', lastName: 'Patel' };
    var name2 = { firstName: 'Sachin', lastName: 'Tendulkar' };
";

fn engine_with_full_name() -> Engine {
    let mut engine = Engine::default();
    engine.eval(FULL_NAME).unwrap();
    engine
}

fn rejecting_engine() -> Engine {
    Engine::new(EngineConfig::default().with_receiver_policy(ReceiverPolicy::Reject))
}

// ============================================================================
// call
// ============================================================================

#[test]
fn test_call_resolves_this_against_receiver() {
    let mut engine = engine_with_full_name();
    let result = engine
        .eval("printFullName.call(name, 'Surendranagar', 'Gujarat');")
        .unwrap();
    assert_eq!(result, JsValue::str("Kishan Patel is from Surendranagar, Gujarat"));
}

#[test]
fn test_call_passes_missing_arguments_as_undefined() {
    let mut engine = engine_with_full_name();
    let result = engine.eval("printFullName.call(name, 'Surendranagar');").unwrap();
    assert_eq!(
        result,
        JsValue::str("Kishan Patel is from Surendranagar, undefined")
    );
}

#[test]
fn test_call_returns_target_result_unchanged() {
    let mut engine = Engine::default();
    let result = engine
        .eval("function pick(a, b) { return b; } var o = {}; pick.call(o, 1, o) === o;")
        .unwrap();
    assert_eq!(result, JsValue::Boolean(true));
}

#[test]
fn test_call_from_rust_api() {
    let mut engine = engine_with_full_name();
    let f = engine.get_binding("printFullName").unwrap();
    let receiver = JsValue::Object(new_object_from(vec![
        ("firstName", JsValue::str("Ada")),
        ("lastName", JsValue::str("Lovelace")),
    ]));
    let result = binder::call(
        engine.context(),
        &f,
        Some(receiver),
        vec![JsValue::str("London"), JsValue::str("England")],
    )
    .unwrap();
    assert_eq!(result, JsValue::str("Ada Lovelace is from London, England"));
}

#[test]
fn test_call_on_non_callable_fails() {
    let mut engine = Engine::default();
    let err = binder::call(engine.context(), &JsValue::int(5), None, vec![]).unwrap_err();
    assert_eq!(err, JErrorType::Binding(BindError::NotCallable("5".to_string())));
}

#[test]
fn test_call_through_borrowed_intrinsic_on_non_function() {
    let mut engine = engine_with_full_name();
    let err = engine.eval("var c = printFullName.call; c.call(name);").unwrap_err();
    assert!(matches!(err, JErrorType::Binding(BindError::NotCallable(_))));
}

#[test]
fn test_call_with_frozen_receiver() {
    let mut engine = engine_with_full_name();
    let result = engine
        .eval("Object.freeze(name); printFullName.call(name, 'Surendranagar', 'Gujarat');")
        .unwrap();
    assert_eq!(result, JsValue::str("Kishan Patel is from Surendranagar, Gujarat"));
    assert_eq!(engine.eval("Object.isFrozen(name);").unwrap(), JsValue::Boolean(true));
}

#[test]
fn test_call_is_reentrant_on_same_receiver() {
    let mut engine = Engine::default();
    let result = engine
        .eval(
            "var r = { n: 3 };
             function depth(k) {
                 if (k === 0) { return this.n; }
                 return depth.call(this, k - 1) + 1;
             }
             depth.call(r, 4);",
        )
        .unwrap();
    assert_eq!(result, JsValue::int(7));
    assert_eq!(engine.eval("Object.keys(r).length;").unwrap(), JsValue::int(1));
}

// ============================================================================
// apply
// ============================================================================

#[test]
fn test_apply_spreads_array() {
    let mut engine = engine_with_full_name();
    let result = engine
        .eval("printFullName.apply(name, ['Surendranagar', 'Maharastra']);")
        .unwrap();
    assert_eq!(result, JsValue::str("Kishan Patel is from Surendranagar, Maharastra"));
}

#[test]
fn test_apply_with_nullish_sequence_passes_no_arguments() {
    let mut engine = Engine::default();
    engine.eval("function count(a) { return typeof a; }").unwrap();
    assert_eq!(
        engine.eval("count.apply({}, null);").unwrap(),
        JsValue::str("undefined")
    );
    assert_eq!(
        engine.eval("count.apply({});").unwrap(),
        JsValue::str("undefined")
    );
}

#[test]
fn test_apply_accepts_array_like() {
    let mut engine = Engine::default();
    let result = engine
        .eval("function join(a, b) { return a + b; } join.apply(null, { length: 2, 0: 'x', 1: 'y' });")
        .unwrap();
    assert_eq!(result, JsValue::str("xy"));
}

#[test]
fn test_apply_rejects_primitive_sequence() {
    let mut engine = engine_with_full_name();
    let err = engine.eval("printFullName.apply(name, 'Gujarat');").unwrap_err();
    assert!(matches!(
        err,
        JErrorType::Binding(BindError::InvalidArgumentSequence(_))
    ));
}

#[test]
fn test_apply_argument_limit() {
    let mut engine = engine_with_full_name();
    let f = engine.get_binding("printFullName").unwrap();
    let too_many = JsValue::Object(new_array_object(vec![
        JsValue::Undefined;
        binder::MAX_APPLY_ARGUMENTS + 1
    ]));
    let err = binder::apply(engine.context(), &f, None, Some(&too_many)).unwrap_err();
    assert!(matches!(err, JErrorType::RangeError(_)));
}

#[test]
fn test_apply_does_not_mutate_argument_array() {
    let mut engine = Engine::default();
    engine
        .eval("var args = [1, 2]; function sum(a, b) { return a + b; } var s = sum.apply(null, args);")
        .unwrap();
    assert_eq!(engine.get_binding("s").unwrap(), JsValue::int(3));
    assert_eq!(engine.eval("args.length;").unwrap(), JsValue::int(2));
}

// ============================================================================
// bind
// ============================================================================

#[test]
fn test_bind_fixes_receiver_and_prefix() {
    let mut engine = engine_with_full_name();
    let result = engine
        .eval("var printMyName = printFullName.bind(name, 'Surendranagar'); printMyName('Maharastra');")
        .unwrap();
    assert_eq!(result, JsValue::str("Kishan Patel is from Surendranagar, Maharastra"));
}

#[test]
fn test_bound_function_reuses_captured_state() {
    let mut engine = Engine::default();
    engine
        .eval(
            "function f(p1, p2, t) { return this.tag + ':' + p1 + p2 + t; }
             var r = { tag: 'r' };
             var g = f.bind(r, 'a', 'b');",
        )
        .unwrap();
    assert_eq!(engine.eval("g('1');").unwrap(), JsValue::str("r:ab1"));
    assert_eq!(engine.eval("g('2');").unwrap(), JsValue::str("r:ab2"));
}

#[test]
fn test_bound_receiver_is_captured_at_bind_time() {
    let mut engine = Engine::default();
    engine
        .eval(
            "function who() { return this.id; }
             var r = { id: 1 };
             var g = who.bind(r);
             r = { id: 2 };",
        )
        .unwrap();
    assert_eq!(engine.eval("g();").unwrap(), JsValue::int(1));
}

#[test]
fn test_binds_to_two_receivers_are_independent() {
    let mut engine = engine_with_full_name();
    engine
        .eval(
            "var boundA = printFullName.bind(name, 'Surendranagar');
             var boundB = printFullName.bind(name2, 'Mumbai');",
        )
        .unwrap();
    assert_eq!(
        engine.eval("boundA('Gujarat');").unwrap(),
        JsValue::str("Kishan Patel is from Surendranagar, Gujarat")
    );
    assert_eq!(
        engine.eval("boundB('Maharastra');").unwrap(),
        JsValue::str("Sachin Tendulkar is from Mumbai, Maharastra")
    );
    assert_eq!(engine.eval("boundA === boundB;").unwrap(), JsValue::Boolean(false));
}

#[test]
fn test_bind_never_writes_to_receiver() {
    let mut engine = engine_with_full_name();
    let receiver = engine.get_binding("name").unwrap();
    let receiver_obj = receiver.as_object().unwrap().clone();
    let before = own_entries(&receiver_obj);

    engine
        .eval(
            "var g = printFullName.bind(name, 'Surendranagar');
             g('Gujarat');
             printFullName.call(name, 'a', 'b');
             printFullName.apply(name, ['a', 'b']);",
        )
        .unwrap();

    assert_eq!(own_entries(&receiver_obj), before);
}

#[test]
fn test_rebinding_keeps_first_receiver_and_concatenates_prefixes() {
    let mut engine = Engine::default();
    engine
        .eval(
            "function f(a, b, c) { return this.tag + a + b + c; }
             var first = f.bind({ tag: 'first:' }, 1);
             var second = first.bind({ tag: 'second:' }, 2);",
        )
        .unwrap();
    assert_eq!(engine.eval("second(3);").unwrap(), JsValue::str("first:123"));
    assert_eq!(engine.eval("first(2, 3);").unwrap(), JsValue::str("first:123"));
    assert_eq!(engine.eval("second === first;").unwrap(), JsValue::Boolean(false));
}

#[test]
fn test_call_on_bound_function_ignores_supplied_receiver() {
    let mut engine = Engine::default();
    engine
        .eval("function who() { return this.id; } var g = who.bind({ id: 'bound' });")
        .unwrap();
    assert_eq!(
        engine.eval("g.call({ id: 'other' });").unwrap(),
        JsValue::str("bound")
    );
    assert_eq!(
        engine.eval("g.apply({ id: 'other' }, []);").unwrap(),
        JsValue::str("bound")
    );
}

#[test]
fn test_bound_function_name_and_length() {
    let mut engine = engine_with_full_name();
    engine
        .eval("function three(a, b, c) {} var g = three.bind(null, 1); var h = g.bind(null, 2, 3, 4);")
        .unwrap();
    assert_eq!(engine.eval("g.name;").unwrap(), JsValue::str("bound three"));
    assert_eq!(engine.eval("g.length;").unwrap(), JsValue::int(2));
    assert_eq!(engine.eval("h.name;").unwrap(), JsValue::str("bound bound three"));
    assert_eq!(engine.eval("h.length;").unwrap(), JsValue::int(0));
    assert_eq!(
        engine.eval("printFullName.bind(name).name;").unwrap(),
        JsValue::str("bound printFullName")
    );
}

#[test]
fn test_bind_on_non_callable_fails() {
    let mut engine = Engine::default();
    let target = JsValue::Object(new_object_from(vec![("a", JsValue::int(1))]));
    let err = binder::bind(engine.context(), &target, None, vec![]).unwrap_err();
    assert_eq!(
        err,
        JErrorType::Binding(BindError::NotCallable("{ a: 1 }".to_string()))
    );
}

// ============================================================================
// Receiver policy
// ============================================================================

#[test]
fn test_absent_receiver_substitutes_global_object() {
    let mut engine = Engine::default();
    let result = engine
        .eval("function self() { return this; } self.call(undefined) === globalThis;")
        .unwrap();
    assert_eq!(result, JsValue::Boolean(true));
    assert_eq!(
        engine.eval("self.call(null) === globalThis;").unwrap(),
        JsValue::Boolean(true)
    );
    assert_eq!(
        engine.eval("self.bind()() === globalThis;").unwrap(),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_reject_policy_requires_receiver() {
    let mut engine = rejecting_engine();
    engine.eval("function f() { return 1; }").unwrap();
    for snippet in &["f.call();", "f.call(null);", "f.apply(undefined, []);", "f.bind();"] {
        let err = engine.eval(snippet).unwrap_err();
        assert_eq!(err, JErrorType::Binding(BindError::MissingReceiver), "{}", snippet);
    }
    assert_eq!(engine.eval("f.call({});").unwrap(), JsValue::int(1));
}

#[test]
fn test_reject_policy_leaves_plain_call_this_undefined() {
    let mut engine = rejecting_engine();
    let result = engine
        .eval("function self() { return this; } typeof self();")
        .unwrap();
    assert_eq!(result, JsValue::str("undefined"));
}

#[test]
fn test_primitive_receiver_is_passed_through() {
    let mut engine = rejecting_engine();
    let result = engine
        .eval("function self() { return this; } self.call(7);")
        .unwrap();
    assert_eq!(result, JsValue::int(7));
}
