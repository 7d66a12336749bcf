//! Built-in registry for collecting built-in objects before they are
//! installed into an [`EvalContext`](super::types::EvalContext).

use std::collections::HashMap;

use super::types::BuiltInObject;
use crate::runner::std_lib::register_core_builtins;

/// Registry for built-in objects.
pub struct BuiltInRegistry {
    objects: HashMap<String, BuiltInObject>,
}

impl BuiltInRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        BuiltInRegistry {
            objects: HashMap::new(),
        }
    }

    /// Create a registry with core built-ins (`console`, `Object`, `undefined`).
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        register_core_builtins(&mut registry);
        registry
    }

    /// Adds `obj`, replacing any object registered under the same name.
    pub fn register_object(&mut self, obj: BuiltInObject) {
        self.objects.insert(obj.name.clone(), obj);
    }

    pub(crate) fn into_objects(self) -> HashMap<String, BuiltInObject> {
        self.objects
    }
}

impl Default for BuiltInRegistry {
    fn default() -> Self {
        Self::with_core()
    }
}
