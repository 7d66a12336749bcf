use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::operations::type_conversion::{TYPE_STR_NULL, TYPE_STR_UNDEFINED};

pub enum JsValue {
    Undefined,
    Null,
    Boolean(bool),
    String(String),
    Number(JsNumberType),
    Object(JsObjectType),
}
impl JsValue {
    pub fn int(i: i64) -> Self {
        JsValue::Number(JsNumberType::Integer(i))
    }

    pub fn str(s: impl Into<String>) -> Self {
        JsValue::String(s.into())
    }

    /// `undefined` and `null` both count as "no value" wherever a receiver or
    /// an argument sequence is optional.
    pub fn is_nullish(&self) -> bool {
        matches!(self, JsValue::Undefined | JsValue::Null)
    }

    pub fn as_object(&self) -> Option<&JsObjectType> {
        match self {
            JsValue::Object(o) => Some(o),
            _ => None,
        }
    }
}
impl Clone for JsValue {
    fn clone(&self) -> Self {
        match self {
            JsValue::Undefined => JsValue::Undefined,
            JsValue::String(d) => JsValue::String(d.to_string()),
            JsValue::Boolean(d) => JsValue::Boolean(*d),
            JsValue::Null => JsValue::Null,
            JsValue::Number(d) => JsValue::Number(d.clone()),
            JsValue::Object(o) => JsValue::Object(o.clone()),
        }
    }
}
impl Display for JsValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                JsValue::Undefined => TYPE_STR_UNDEFINED.to_string(),
                JsValue::Null => TYPE_STR_NULL.to_string(),
                JsValue::Boolean(b) => format!("bool({})", b),
                JsValue::String(s) => format!("\"{}\"", s),
                JsValue::Number(n) => n.to_string(),
                JsValue::Object(o) => o.borrow().to_string(),
            }
        )
    }
}

impl fmt::Debug for JsValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "JsValue::Undefined"),
            JsValue::Null => write!(f, "JsValue::Null"),
            JsValue::Boolean(b) => write!(f, "JsValue::Boolean({})", b),
            JsValue::String(s) => write!(f, "JsValue::String({:?})", s),
            JsValue::Number(n) => write!(f, "JsValue::Number({:?})", n),
            JsValue::Object(o) => write!(f, "JsValue::Object({})", o.borrow().id()),
        }
    }
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Null, JsValue::Null) => true,
            (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
            (JsValue::String(a), JsValue::String(b)) => a == b,
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (JsValue::Object(a), JsValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(s.to_string())
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::String(s)
    }
}

impl From<i64> for JsValue {
    fn from(i: i64) -> Self {
        JsValue::Number(JsNumberType::Integer(i))
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Boolean(b)
    }
}

impl From<JsObjectType> for JsValue {
    fn from(o: JsObjectType) -> Self {
        JsValue::Object(o)
    }
}

#[derive(Debug, PartialEq)]
pub enum JsNumberType {
    Integer(i64),
    Float(f64),
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}
impl JsNumberType {
    pub fn as_f64(&self) -> f64 {
        match self {
            JsNumberType::Integer(i) => *i as f64,
            JsNumberType::Float(f) => *f,
            JsNumberType::NaN => f64::NAN,
            JsNumberType::PositiveInfinity => f64::INFINITY,
            JsNumberType::NegativeInfinity => f64::NEG_INFINITY,
        }
    }

    /// Normalizes an `f64` result back into the tagged representation,
    /// folding whole values into `Integer`.
    pub fn from_f64(f: f64) -> Self {
        if f.is_nan() {
            JsNumberType::NaN
        } else if f == f64::INFINITY {
            JsNumberType::PositiveInfinity
        } else if f == f64::NEG_INFINITY {
            JsNumberType::NegativeInfinity
        } else if f.fract() == 0.0 && f.abs() < 9.0e15 {
            JsNumberType::Integer(f as i64)
        } else {
            JsNumberType::Float(f)
        }
    }
}
impl Display for JsNumberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JsNumberType::Integer(i) => write!(f, "{}", i),
            JsNumberType::Float(nf) => write!(f, "{}", nf),
            JsNumberType::NaN => write!(f, "NaN"),
            JsNumberType::PositiveInfinity => write!(f, "Infinity"),
            JsNumberType::NegativeInfinity => write!(f, "-Infinity"),
        }
    }
}
impl Clone for JsNumberType {
    fn clone(&self) -> Self {
        match self {
            JsNumberType::Integer(i) => JsNumberType::Integer(*i),
            JsNumberType::Float(nf) => JsNumberType::Float(*nf),
            JsNumberType::NaN => JsNumberType::NaN,
            JsNumberType::PositiveInfinity => JsNumberType::PositiveInfinity,
            JsNumberType::NegativeInfinity => JsNumberType::NegativeInfinity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_folds_whole_numbers() {
        assert_eq!(JsNumberType::from_f64(4.0), JsNumberType::Integer(4));
        assert_eq!(JsNumberType::from_f64(2.5), JsNumberType::Float(2.5));
        assert_eq!(JsNumberType::from_f64(f64::NAN), JsNumberType::NaN);
        assert_eq!(
            JsNumberType::from_f64(f64::NEG_INFINITY),
            JsNumberType::NegativeInfinity
        );
    }

    #[test]
    fn test_nullish() {
        assert!(JsValue::Undefined.is_nullish());
        assert!(JsValue::Null.is_nullish());
        assert!(!JsValue::int(0).is_nullish());
    }
}
