//! Core built-ins registration.
//!
//! This module provides the function to register all core built-in objects
//! with the BuiltInRegistry.

use crate::runner::ds::value::JsValue;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInObject;

use super::console;
use super::object;

/// Register all core built-in objects with the registry.
pub fn register_core_builtins(registry: &mut BuiltInRegistry) {
    object::register(registry);
    console::register(registry);
    registry.register_object(BuiltInObject::new("undefined").with_value(JsValue::Undefined));
}
