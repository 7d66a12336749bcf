use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type JsLexEnvironmentType = Rc<RefCell<LexEnvironment>>;

pub enum BindingFlag {
    Mutable,
    Immutable,
}

struct Binding {
    /// `None` until the declaration has been evaluated (temporal dead zone).
    value: Option<JsValue>,
    flag: BindingFlag,
}

pub struct LexEnvironment {
    bindings: HashMap<String, Binding>,
    /// Present on function and global environments only.
    this_value: Option<JsValue>,
    pub outer: Option<JsLexEnvironmentType>,
}
impl LexEnvironment {
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn has_this_binding(&self) -> bool {
        self.this_value.is_some()
    }

    pub fn create_mutable_binding(&mut self, name: String) {
        self.bindings.entry(name).or_insert(Binding {
            value: None,
            flag: BindingFlag::Mutable,
        });
    }

    pub fn create_immutable_binding(&mut self, name: String) {
        self.bindings.insert(
            name,
            Binding {
                value: None,
                flag: BindingFlag::Immutable,
            },
        );
    }

    pub fn initialize_binding(&mut self, name: &str, value: JsValue) -> Result<(), JErrorType> {
        match self.bindings.get_mut(name) {
            Some(b) => {
                b.value = Some(value);
                Ok(())
            }
            None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
        }
    }

    pub fn set_mutable_binding(&mut self, name: &str, value: JsValue) -> Result<(), JErrorType> {
        match self.bindings.get_mut(name) {
            Some(b) => {
                if b.value.is_none() {
                    return Err(tdz_error(name));
                }
                if let BindingFlag::Immutable = b.flag {
                    return Err(JErrorType::TypeError(
                        "Assignment to constant variable".to_string(),
                    ));
                }
                b.value = Some(value);
                Ok(())
            }
            None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
        }
    }

    pub fn get_binding_value(&self, name: &str) -> Result<JsValue, JErrorType> {
        match self.bindings.get(name) {
            Some(Binding { value: Some(v), .. }) => Ok(v.clone()),
            Some(Binding { value: None, .. }) => Err(tdz_error(name)),
            None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
        }
    }

    pub fn is_initialized(&self, name: &str) -> bool {
        matches!(self.bindings.get(name), Some(Binding { value: Some(_), .. }))
    }
}

fn tdz_error(name: &str) -> JErrorType {
    JErrorType::ReferenceError(format!("Cannot access '{}' before initialization", name))
}

fn new_environment(outer: Option<JsLexEnvironmentType>, this_value: Option<JsValue>) -> JsLexEnvironmentType {
    Rc::new(RefCell::new(LexEnvironment {
        bindings: HashMap::new(),
        this_value,
        outer,
    }))
}

pub fn new_global_environment(this_value: JsValue) -> JsLexEnvironmentType {
    new_environment(None, Some(this_value))
}

pub fn new_declarative_environment(outer: &JsLexEnvironmentType) -> JsLexEnvironmentType {
    new_environment(Some(outer.clone()), None)
}

pub fn new_function_environment(outer: &JsLexEnvironmentType, this_value: JsValue) -> JsLexEnvironmentType {
    new_environment(Some(outer.clone()), Some(this_value))
}

/// Finds the innermost environment holding `name`.
pub fn resolve_binding(env: &JsLexEnvironmentType, name: &str) -> Option<JsLexEnvironmentType> {
    let mut current = Some(env.clone());
    while let Some(e) = current {
        if e.borrow().has_binding(name) {
            return Some(e);
        }
        current = e.borrow().outer.clone();
    }
    None
}

pub fn get_identifier_value(env: &JsLexEnvironmentType, name: &str) -> Result<JsValue, JErrorType> {
    match resolve_binding(env, name) {
        Some(e) => e.borrow().get_binding_value(name),
        None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
    }
}

pub fn set_identifier_value(
    env: &JsLexEnvironmentType,
    name: &str,
    value: JsValue,
) -> Result<(), JErrorType> {
    match resolve_binding(env, name) {
        Some(e) => e.borrow_mut().set_mutable_binding(name, value),
        None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
    }
}

/// `this` of the nearest function (or global) environment.
pub fn resolve_this_binding(env: &JsLexEnvironmentType) -> JsValue {
    let mut current = Some(env.clone());
    while let Some(e) = current {
        if let Some(this) = &e.borrow().this_value {
            return this.clone();
        }
        current = e.borrow().outer.clone();
    }
    JsValue::Undefined
}
