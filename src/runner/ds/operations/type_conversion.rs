use crate::runner::ds::object::ObjectType;
use crate::runner::ds::value::{JsNumberType, JsValue};

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";

/// The `typeof` tag of a value.
pub fn type_of(a: &JsValue) -> &'static str {
    match a {
        JsValue::Undefined => TYPE_STR_UNDEFINED,
        JsValue::Null => TYPE_STR_OBJECT,
        JsValue::Boolean(_) => TYPE_STR_BOOLEAN,
        JsValue::String(_) => TYPE_STR_STRING,
        JsValue::Number(_) => TYPE_STR_NUMBER,
        JsValue::Object(o) => match *o.borrow() {
            ObjectType::Function(_) => TYPE_STR_FUNCTION,
            ObjectType::Ordinary(_) | ObjectType::Array(_) => TYPE_STR_OBJECT,
        },
    }
}

pub fn to_boolean(value: &JsValue) -> bool {
    match value {
        JsValue::Undefined => false,
        JsValue::Null => false,
        JsValue::Boolean(b) => *b,
        JsValue::Number(n) => match n {
            JsNumberType::Integer(0) => false,
            JsNumberType::Float(f) if *f == 0.0 || f.is_nan() => false,
            JsNumberType::NaN => false,
            _ => true,
        },
        JsValue::String(s) => !s.is_empty(),
        JsValue::Object(_) => true,
    }
}

pub fn to_number(value: &JsValue) -> JsNumberType {
    match value {
        JsValue::Undefined => JsNumberType::NaN,
        JsValue::Null => JsNumberType::Integer(0),
        JsValue::Boolean(true) => JsNumberType::Integer(1),
        JsValue::Boolean(false) => JsNumberType::Integer(0),
        JsValue::Number(n) => n.clone(),
        JsValue::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                JsNumberType::Integer(0)
            } else if let Ok(i) = s.parse::<i64>() {
                JsNumberType::Integer(i)
            } else if let Ok(f) = s.parse::<f64>() {
                JsNumberType::from_f64(f)
            } else {
                JsNumberType::NaN
            }
        }
        // Arrays go through their joined string form.
        JsValue::Object(o) => {
            let o = o.borrow();
            match &*o {
                ObjectType::Array(_) => to_number(&JsValue::String(o.to_string())),
                _ => JsNumberType::NaN,
            }
        }
    }
}

pub fn to_string(value: &JsValue) -> String {
    match value {
        JsValue::Undefined => TYPE_STR_UNDEFINED.to_string(),
        JsValue::Null => TYPE_STR_NULL.to_string(),
        JsValue::Boolean(true) => "true".to_string(),
        JsValue::Boolean(false) => "false".to_string(),
        JsValue::Number(n) => n.to_string(),
        JsValue::String(s) => s.clone(),
        JsValue::Object(o) => o.borrow().to_string(),
    }
}

/// Parses an array index key (`"0"`, `"12"`, but not `"01"` or `"-1"`).
pub fn canonical_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<usize>().ok()
}

/// Converts a value used as a property key into its string form.
pub fn to_property_key(value: &JsValue) -> String {
    match value {
        JsValue::Number(JsNumberType::Float(f)) if f.fract() == 0.0 => {
            JsNumberType::from_f64(*f).to_string()
        }
        _ => to_string(value),
    }
}
