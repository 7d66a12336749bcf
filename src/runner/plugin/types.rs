//! Core types shared by the interpreter and the built-ins.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::config::{EngineConfig, ReceiverPolicy};
use super::registry::BuiltInRegistry;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::new_native_function;
use crate::runner::ds::lex_env::{
    get_identifier_value, new_global_environment, JsLexEnvironmentType,
};
use crate::runner::ds::object::{new_ordinary_object, JsObjectType};
use crate::runner::ds::value::JsValue;
use crate::runner::std_lib::function::FUNCTION_INTRINSICS;

/// Function signature for built-in methods.
/// Native functions receive the evaluation context, `this` value, and arguments.
pub type NativeFn = fn(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
}

/// Where `console.*` output goes.
#[derive(Clone)]
pub enum ConsoleSink {
    /// `log`/`info` to stdout, `warn`/`error` to stderr.
    Stdio,
    /// Every line is appended to a shared buffer.
    Captured(Rc<RefCell<Vec<String>>>),
}

/// Execution context passed to the interpreter and native functions.
pub struct EvalContext {
    pub config: EngineConfig,
    pub global_object: JsObjectType,
    pub global_env: JsLexEnvironmentType,
    /// Environment of the code currently running.
    pub current_env: JsLexEnvironmentType,
    pub console: ConsoleSink,
    pub call_depth: usize,
    /// `call`/`apply`/`bind` function objects, created on first lookup.
    intrinsics: HashMap<&'static str, JsObjectType>,
}

impl EvalContext {
    pub fn new(config: EngineConfig) -> Self {
        let global_object = new_ordinary_object();
        let top_level_this = match config.receiver_policy {
            ReceiverPolicy::SubstituteGlobal => JsValue::Object(global_object.clone()),
            ReceiverPolicy::Reject => JsValue::Undefined,
        };
        let global_env = new_global_environment(top_level_this);
        EvalContext {
            config,
            global_object,
            current_env: global_env.clone(),
            global_env,
            console: ConsoleSink::Stdio,
            call_depth: 0,
            intrinsics: HashMap::new(),
        }
    }

    pub fn with_console(mut self, console: ConsoleSink) -> Self {
        self.console = console;
        self
    }

    /// Materializes every registered built-in object as a global constant.
    pub fn install_core_builtins(&mut self, registry: BuiltInRegistry) {
        for (name, builtin) in registry.into_objects() {
            let value = match builtin.value {
                Some(v) => v,
                None => {
                    let obj = new_ordinary_object();
                    let mut methods: Vec<(String, NativeFn, usize)> = builtin
                        .methods
                        .into_iter()
                        .map(|(k, (f, len))| (k, f, len))
                        .collect();
                    methods.sort_by(|a, b| a.0.cmp(&b.0));
                    for (method_name, f, length) in methods {
                        let func = new_native_function(method_name.clone(), length, f);
                        // Freshly created, so never frozen.
                        let _ = obj.borrow_mut().set(&method_name, JsValue::Object(func));
                    }
                    JsValue::Object(obj)
                }
            };
            let mut env = self.global_env.borrow_mut();
            env.create_immutable_binding(name.clone());
            let _ = env.initialize_binding(&name, value);
        }
        let global = JsValue::Object(self.global_object.clone());
        let mut env = self.global_env.borrow_mut();
        env.create_immutable_binding("globalThis".to_string());
        let _ = env.initialize_binding("globalThis", global);
    }

    /// Resolves a function intrinsic (`call`, `apply`, `bind`) to a shared
    /// function object, so `f.call === g.call` holds.
    pub fn function_intrinsic(&mut self, name: &str) -> Option<JsObjectType> {
        let (key, (f, length)) = FUNCTION_INTRINSICS.get_key_value(name)?;
        let func = self
            .intrinsics
            .entry(*key)
            .or_insert_with(|| new_native_function(*key, *length, *f));
        Some(func.clone())
    }

    pub fn get_binding(&self, name: &str) -> Result<JsValue, JErrorType> {
        get_identifier_value(&self.current_env, name)
    }

    pub fn global_this(&self) -> JsValue {
        JsValue::Object(self.global_object.clone())
    }

    pub fn receiver_policy(&self) -> ReceiverPolicy {
        self.config.receiver_policy
    }

    /// Applies the receiver policy to a `this` value that is absent or nullish.
    /// Returns `None` under `Reject`; callers decide whether that is an error.
    pub fn substitute_receiver(&self, this: Option<JsValue>) -> Option<JsValue> {
        match this {
            Some(v) if !v.is_nullish() => Some(v),
            _ => match self.config.receiver_policy {
                ReceiverPolicy::SubstituteGlobal => Some(self.global_this()),
                ReceiverPolicy::Reject => None,
            },
        }
    }

    pub fn console_write(&self, level: ConsoleLevel, line: String) {
        match &self.console {
            ConsoleSink::Stdio => match level {
                ConsoleLevel::Log | ConsoleLevel::Info => println!("{}", line),
                ConsoleLevel::Warn => eprintln!("Warning: {}", line),
                ConsoleLevel::Error => eprintln!("{}", line),
            },
            ConsoleSink::Captured(lines) => lines.borrow_mut().push(line),
        }
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Built-in object definition, e.g. `console` or `Object`.
pub struct BuiltInObject {
    /// Name of the global binding.
    pub name: String,

    /// Methods with their declared `length`.
    pub methods: HashMap<String, (NativeFn, usize)>,

    /// A ready-made value, used instead of `methods` when set.
    pub value: Option<JsValue>,
}

impl BuiltInObject {
    pub fn new(name: impl Into<String>) -> Self {
        BuiltInObject {
            name: name.into(),
            methods: HashMap::new(),
            value: None,
        }
    }

    pub fn add_method(mut self, name: impl Into<String>, length: usize, func: NativeFn) -> Self {
        self.methods.insert(name.into(), (func, length));
        self
    }

    pub fn with_value(mut self, value: JsValue) -> Self {
        self.value = Some(value);
        self
    }
}
