//! Receiver binding: invoking a callable against an explicit receiver and
//! producing bound callables with a fixed receiver and argument prefix.
//!
//! These are free functions over an explicit target. The snippet language
//! reaches them through the `call`/`apply`/`bind` intrinsics that every
//! function value resolves (see [`crate::runner::std_lib::function`]).
//! The receiver reaches the target only as the `this` of a fresh function
//! environment; neither the target nor the receiver is written to.
//!
//! ```
//! use ctxbind::runner::binder;
//! use ctxbind::runner::ds::object::new_object_from;
//! use ctxbind::runner::ds::value::JsValue;
//! use ctxbind::runner::api::Engine;
//!
//! let mut engine = Engine::default();
//! let greet = engine
//!     .eval("function greet(greeting) { return greeting + ', ' + this.name; } greet;")
//!     .unwrap();
//! let receiver = JsValue::Object(new_object_from(vec![("name", JsValue::str("Kishan"))]));
//!
//! let result = binder::call(engine.context(), &greet, Some(receiver), vec![JsValue::str("Hello")]);
//! assert_eq!(result.unwrap(), JsValue::str("Hello, Kishan"));
//! ```

use tracing::{debug, warn};

use crate::runner::ds::error::{BindError, JErrorType};
use crate::runner::ds::function_object::new_bound_function;
use crate::runner::ds::object::{JsObjectType, ObjectType};
use crate::runner::ds::operations::type_conversion::{to_number, type_of};
use crate::runner::ds::value::JsValue;
use crate::runner::eval::function::call_function;
use crate::runner::plugin::types::EvalContext;
use crate::runner::std_lib::console::inspect;

/// Upper bound on the number of arguments `apply` will spread.
pub const MAX_APPLY_ARGUMENTS: usize = 65_535;

/// Invokes `target` with `receiver` as `this` and `args` positionally.
pub fn call(
    ctx: &mut EvalContext,
    target: &JsValue,
    receiver: Option<JsValue>,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let function = require_callable(target)?;
    let this = resolve_receiver(ctx, receiver)?;
    debug!(
        target = %function_name(&function),
        receiver = %describe_receiver(&this),
        argc = args.len(),
        "call"
    );
    call_function(ctx, &function, this, args)
}

/// Like [`call`], with the arguments given as one array or array-like value.
/// An absent, `undefined` or `null` sequence means no arguments.
pub fn apply(
    ctx: &mut EvalContext,
    target: &JsValue,
    receiver: Option<JsValue>,
    arg_sequence: Option<&JsValue>,
) -> Result<JsValue, JErrorType> {
    let function = require_callable(target)?;
    let this = resolve_receiver(ctx, receiver)?;
    let args = match arg_sequence {
        Some(seq) => create_list_from_array_like(seq)?,
        None => vec![],
    };
    debug!(
        target = %function_name(&function),
        receiver = %describe_receiver(&this),
        argc = args.len(),
        "apply"
    );
    call_function(ctx, &function, this, args)
}

/// Returns a new function that calls `target` against `receiver` with
/// `prefix` followed by whatever arguments it is later called with.
///
/// Binding a bound function links straight to the innermost target: the
/// receiver stays the first bound one and the prefixes concatenate.
pub fn bind(
    ctx: &mut EvalContext,
    target: &JsValue,
    receiver: Option<JsValue>,
    prefix: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let function = require_callable(target)?;
    let this = resolve_receiver(ctx, receiver)?;

    let (name, length, inner) = {
        let borrowed = function.borrow();
        let f = match &*borrowed {
            ObjectType::Function(f) => f,
            _ => return Err(BindError::NotCallable(inspect(target)).into()),
        };
        let inner = f.as_bound().map(|b| {
            (
                b.bound_target_function.clone(),
                b.bound_this.clone(),
                b.bound_arguments.clone(),
            )
        });
        (f.name.clone(), f.length, inner)
    };

    let length = length.saturating_sub(prefix.len());
    let (bound_target, bound_this, bound_arguments) = match inner {
        Some((inner_target, inner_this, mut inner_args)) => {
            inner_args.extend(prefix);
            (inner_target, inner_this, inner_args)
        }
        None => (function, this, prefix),
    };
    debug!(
        target = %name,
        receiver = %describe_receiver(&bound_this),
        prefix = bound_arguments.len(),
        "bind"
    );
    Ok(JsValue::Object(new_bound_function(
        bound_target,
        &name,
        length,
        bound_this,
        bound_arguments,
    )))
}

fn require_callable(target: &JsValue) -> Result<JsObjectType, BindError> {
    match target {
        JsValue::Object(o) if o.borrow().is_callable() => Ok(o.clone()),
        _ => Err(BindError::NotCallable(inspect(target))),
    }
}

fn resolve_receiver(ctx: &EvalContext, receiver: Option<JsValue>) -> Result<JsValue, BindError> {
    let absent = receiver.as_ref().map_or(true, |r| r.is_nullish());
    match ctx.substitute_receiver(receiver) {
        Some(this) => {
            if absent {
                warn!("no receiver supplied, substituting the global object");
            }
            Ok(this)
        }
        None => Err(BindError::MissingReceiver),
    }
}

/// Spreads an array or array-like object into an argument list.
pub fn create_list_from_array_like(value: &JsValue) -> Result<Vec<JsValue>, JErrorType> {
    match value {
        JsValue::Undefined | JsValue::Null => Ok(vec![]),
        JsValue::Object(o) => {
            let o = o.borrow();
            if let ObjectType::Array(a) = &*o {
                if a.elements.len() > MAX_APPLY_ARGUMENTS {
                    return Err(too_many_arguments());
                }
                return Ok(a.elements.clone());
            }
            let length = to_number(&o.get("length")).as_f64();
            let length = if length.is_nan() || length <= 0.0 {
                0
            } else {
                length.floor() as usize
            };
            if length > MAX_APPLY_ARGUMENTS {
                return Err(too_many_arguments());
            }
            Ok((0..length).map(|i| o.get(&i.to_string())).collect())
        }
        _ => Err(BindError::InvalidArgumentSequence(format!(
            "{} {}",
            type_of(value),
            inspect(value)
        ))
        .into()),
    }
}

fn too_many_arguments() -> JErrorType {
    JErrorType::RangeError("Too many arguments in function call".to_string())
}

fn function_name(function: &JsObjectType) -> String {
    function
        .borrow()
        .as_function()
        .map(|f| f.name.clone())
        .unwrap_or_default()
}

fn describe_receiver(receiver: &JsValue) -> String {
    match receiver {
        JsValue::Object(o) => format!("object#{}", o.borrow().id()),
        other => inspect(other),
    }
}
