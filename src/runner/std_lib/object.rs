//! Object built-in.
//!
//! Provides the `Object.keys`, `Object.freeze` and `Object.isFrozen` statics.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::new_array_object;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::{BuiltInObject, EvalContext};

/// Register the Object built-in with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let object = BuiltInObject::new("Object")
        .add_method("keys", 1, object_keys)
        .add_method("freeze", 1, object_freeze)
        .add_method("isFrozen", 1, object_is_frozen);

    registry.register_object(object);
}

fn first_arg(args: &[JsValue]) -> JsValue {
    args.first().cloned().unwrap_or(JsValue::Undefined)
}

/// Object.keys
fn object_keys(_ctx: &mut EvalContext, _this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    match first_arg(&args) {
        JsValue::Object(o) => {
            let keys = o.borrow().own_keys().into_iter().map(JsValue::String).collect();
            Ok(JsValue::Object(new_array_object(keys)))
        }
        JsValue::Undefined | JsValue::Null => Err(JErrorType::TypeError(
            "Cannot convert undefined or null to object".to_string(),
        )),
        JsValue::String(s) => {
            let keys = (0..s.chars().count())
                .map(|i| JsValue::String(i.to_string()))
                .collect();
            Ok(JsValue::Object(new_array_object(keys)))
        }
        _ => Ok(JsValue::Object(new_array_object(vec![]))),
    }
}

/// Object.freeze - primitives are returned unchanged.
fn object_freeze(_ctx: &mut EvalContext, _this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    let target = first_arg(&args);
    if let JsValue::Object(o) = &target {
        o.borrow_mut().freeze();
    }
    Ok(target)
}

/// Object.isFrozen - primitives count as frozen.
fn object_is_frozen(_ctx: &mut EvalContext, _this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Boolean(match first_arg(&args) {
        JsValue::Object(o) => o.borrow().is_frozen(),
        _ => true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::object::new_object_from;

    #[test]
    fn test_keys_in_insertion_order() {
        let mut ctx = EvalContext::default();
        let o = new_object_from(vec![("b", JsValue::int(1)), ("a", JsValue::int(2))]);
        let keys = object_keys(&mut ctx, JsValue::Undefined, vec![JsValue::Object(o)]).unwrap();
        let keys = keys.as_object().unwrap().borrow();
        assert_eq!(keys.get("length"), JsValue::int(2));
        assert_eq!(keys.get("0"), JsValue::str("b"));
        assert_eq!(keys.get("1"), JsValue::str("a"));
    }

    #[test]
    fn test_freeze_then_is_frozen() {
        let mut ctx = EvalContext::default();
        let o = JsValue::Object(new_object_from(vec![("a", JsValue::int(1))]));
        let before = object_is_frozen(&mut ctx, JsValue::Undefined, vec![o.clone()]).unwrap();
        assert_eq!(before, JsValue::Boolean(false));
        let returned = object_freeze(&mut ctx, JsValue::Undefined, vec![o.clone()]).unwrap();
        assert_eq!(returned, o);
        let after = object_is_frozen(&mut ctx, JsValue::Undefined, vec![o]).unwrap();
        assert_eq!(after, JsValue::Boolean(true));
    }

    #[test]
    fn test_keys_of_null_is_type_error() {
        let mut ctx = EvalContext::default();
        let err = object_keys(&mut ctx, JsValue::Undefined, vec![JsValue::Null]).unwrap_err();
        assert!(matches!(err, JErrorType::TypeError(_)));
    }
}
