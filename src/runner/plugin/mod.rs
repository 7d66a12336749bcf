//! Evaluation context, built-in registry and engine configuration.
//!
//! Built-ins are described as [`BuiltInObject`]s, collected in a
//! [`BuiltInRegistry`] and materialized into the global environment by
//! [`EvalContext::install_core_builtins`](types::EvalContext::install_core_builtins).
//! Registering an object under an existing name replaces it:
//!
//! ```
//! use ctxbind::runner::plugin::registry::BuiltInRegistry;
//! use ctxbind::runner::plugin::types::{BuiltInObject, EvalContext};
//! use ctxbind::runner::ds::value::JsValue;
//! use ctxbind::runner::ds::error::JErrorType;
//!
//! fn silent(_: &mut EvalContext, _: JsValue, _: Vec<JsValue>) -> Result<JsValue, JErrorType> {
//!     Ok(JsValue::Undefined)
//! }
//!
//! let mut registry = BuiltInRegistry::with_core();
//! registry.register_object(BuiltInObject::new("console").add_method("log", 0, silent));
//!
//! let mut ctx = EvalContext::default();
//! ctx.install_core_builtins(registry);
//! assert!(ctx.get_binding("console").is_ok());
//! ```

pub mod config;
pub mod registry;
pub mod types;

pub use config::{ConfigError, EngineConfig, ReceiverPolicy};
pub use registry::BuiltInRegistry;
pub use types::{BuiltInObject, ConsoleSink, EvalContext, NativeFn};
