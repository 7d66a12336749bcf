//! Function call execution.
//!
//! [`call_function`] is the [[Call]] internal method shared by plain calls,
//! method calls and the binder.

use std::rc::Rc;

use tracing::trace;

use crate::parser::ast::FunctionData;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::FunctionKind;
use crate::runner::ds::lex_env::{new_function_environment, JsLexEnvironmentType};
use crate::runner::ds::object::{JsObjectType, ObjectType};
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::config::MAX_CALL_DEPTH_LIMIT;
use crate::runner::plugin::types::{EvalContext, NativeFn};

use super::statement::{execute_function_body, run_in_environment};
use super::types::ValueResult;

/// What a call resolves to once the function object is no longer borrowed.
enum CallTarget {
    Script(Rc<FunctionData>, JsLexEnvironmentType),
    Native(NativeFn),
    Bound(JsObjectType, JsValue, Vec<JsValue>),
}

/// Call a function object with the given receiver and arguments.
pub fn call_function(
    ctx: &mut EvalContext,
    function: &JsObjectType,
    this_value: JsValue,
    args: Vec<JsValue>,
) -> ValueResult {
    let (name, target) = {
        let borrowed = function.borrow();
        let f = match &*borrowed {
            ObjectType::Function(f) => f,
            other => {
                return Err(JErrorType::TypeError(format!(
                    "{} is not a function",
                    other.to_string()
                )))
            }
        };
        let target = match &f.kind {
            FunctionKind::Script { data, environment } => {
                CallTarget::Script(data.clone(), environment.clone())
            }
            FunctionKind::Native(n) => CallTarget::Native(*n),
            FunctionKind::Bound(b) => CallTarget::Bound(
                b.bound_target_function.clone(),
                b.bound_this.clone(),
                b.bound_arguments.clone(),
            ),
        };
        (f.name.clone(), target)
    };

    match target {
        CallTarget::Native(f) => f(ctx, this_value, args),
        CallTarget::Bound(target, bound_this, bound_args) => {
            let mut full_args = bound_args;
            full_args.extend(args);
            call_function(ctx, &target, bound_this, full_args)
        }
        CallTarget::Script(data, closure_env) => {
            if ctx.call_depth >= ctx.config.max_call_depth.min(MAX_CALL_DEPTH_LIMIT) {
                return Err(JErrorType::RangeError(
                    "Maximum call stack size exceeded".to_string(),
                ));
            }
            trace!(function = %name, depth = ctx.call_depth, "entering function");
            let env = new_function_environment(&closure_env, this_value);
            {
                let mut e = env.borrow_mut();
                let mut args = args.into_iter();
                for param in &data.params {
                    e.create_mutable_binding(param.name.clone());
                    e.initialize_binding(&param.name, args.next().unwrap_or(JsValue::Undefined))?;
                }
            }
            ctx.call_depth += 1;
            let result = run_in_environment(ctx, env, |ctx| execute_function_body(&data.body, ctx));
            ctx.call_depth -= 1;
            result
        }
    }
}
