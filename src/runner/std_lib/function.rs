//! `call`, `apply` and `bind` as seen from snippets.
//!
//! Every function value resolves these names to one shared native function
//! each, which receives the function being invoked as `this` and forwards
//! to [`crate::runner::binder`].

use std::collections::HashMap;

use crate::runner::binder;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::{EvalContext, NativeFn};

lazy_static! {
    /// Intrinsic name to (implementation, declared `length`).
    pub static ref FUNCTION_INTRINSICS: HashMap<&'static str, (NativeFn, usize)> = {
        let mut m: HashMap<&'static str, (NativeFn, usize)> = HashMap::new();
        m.insert("call", (function_call as NativeFn, 1));
        m.insert("apply", (function_apply as NativeFn, 2));
        m.insert("bind", (function_bind as NativeFn, 1));
        m
    };
}

/// `f.call(thisArg, ...args)`
fn function_call(ctx: &mut EvalContext, this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    let mut args = args.into_iter();
    let receiver = args.next();
    binder::call(ctx, &this, receiver, args.collect())
}

/// `f.apply(thisArg, argArray)`
fn function_apply(ctx: &mut EvalContext, this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    let mut args = args.into_iter();
    let receiver = args.next();
    let arg_sequence = args.next();
    binder::apply(ctx, &this, receiver, arg_sequence.as_ref())
}

/// `f.bind(thisArg, ...prefix)`
fn function_bind(ctx: &mut EvalContext, this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    let mut args = args.into_iter();
    let receiver = args.next();
    binder::bind(ctx, &this, receiver, args.collect())
}
