use thiserror::Error;

/// Failures raised by the receiver-binding operations (`call`, `apply`, `bind`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("{0} is not a function")]
    NotCallable(String),
    #[error("CreateListFromArrayLike called on non-object: {0}")]
    InvalidArgumentSequence(String),
    #[error("a receiver is required by the `reject` receiver policy")]
    MissingReceiver,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JErrorType {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
    #[error("Uncaught syntax error: {0}.")]
    SyntaxError(String),
    #[error("Uncaught type error: {0}.")]
    Binding(#[from] BindError),
}
impl JErrorType {
    /// The JavaScript error class name this error surfaces as.
    pub fn name(&self) -> &'static str {
        match self {
            JErrorType::ReferenceError(_) => "ReferenceError",
            JErrorType::TypeError(_) | JErrorType::Binding(_) => "TypeError",
            JErrorType::RangeError(_) => "RangeError",
            JErrorType::SyntaxError(_) => "SyntaxError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_errors_surface_as_type_errors() {
        let err: JErrorType = BindError::NotCallable("obj.greet".to_string()).into();
        assert_eq!(err.name(), "TypeError");
        assert_eq!(
            err.to_string(),
            "Uncaught type error: obj.greet is not a function."
        );
    }
}
