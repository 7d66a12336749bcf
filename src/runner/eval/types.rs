//! Core types for the evaluation engine.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;

/// Completion record type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionType {
    /// Normal completion - execution continues.
    Normal,
    /// Return completion - function returns.
    Return,
}

/// Completion record.
/// Every statement evaluation returns a completion record.
#[derive(Debug, Clone)]
pub struct Completion {
    pub completion_type: CompletionType,
    pub value: Option<JsValue>,
}

impl Completion {
    /// Create a normal completion with no value.
    pub fn normal() -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: None,
        }
    }

    /// Create a normal completion with a value.
    pub fn normal_with_value(value: JsValue) -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: Some(value),
        }
    }

    /// Create a return completion.
    pub fn return_value(value: JsValue) -> Self {
        Completion {
            completion_type: CompletionType::Return,
            value: Some(value),
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self.completion_type, CompletionType::Normal)
    }

    pub fn is_abrupt(&self) -> bool {
        !self.is_normal()
    }

    /// Get the value, or undefined if none.
    pub fn get_value(&self) -> JsValue {
        self.value.clone().unwrap_or(JsValue::Undefined)
    }
}

/// Result of evaluating a statement.
pub type EvalResult = Result<Completion, JErrorType>;

/// Result of evaluating an expression.
pub type ValueResult = Result<JsValue, JErrorType>;
