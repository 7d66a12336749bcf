//! Console built-in object.
//!
//! Provides console.log, console.error, console.warn, and console.info methods,
//! plus the value formatter they share with diagnostics.

use std::collections::HashSet;

use uuid::Uuid;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::ObjectType;
use crate::runner::ds::value::{JsNumberType, JsValue};
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::{BuiltInObject, ConsoleLevel, EvalContext};

/// Nesting beyond this prints as `[Object]` / `[Array]`.
const MAX_INSPECT_DEPTH: usize = 2;

/// Register the console object with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let console = BuiltInObject::new("console")
        .add_method("log", 0, console_log)
        .add_method("error", 0, console_error)
        .add_method("warn", 0, console_warn)
        .add_method("info", 0, console_info);

    registry.register_object(console);
}

/// Formats a value the way `console.log` prints it: strings bare at the top
/// level, quoted inside containers.
pub fn inspect(value: &JsValue) -> String {
    match value {
        JsValue::String(s) => s.clone(),
        _ => inspect_nested(value, 0, &mut HashSet::new()),
    }
}

fn inspect_nested(value: &JsValue, depth: usize, seen: &mut HashSet<Uuid>) -> String {
    match value {
        JsValue::Undefined => "undefined".to_string(),
        JsValue::Null => "null".to_string(),
        JsValue::Boolean(b) => b.to_string(),
        JsValue::Number(JsNumberType::Float(f)) if *f == 0.0 && f.is_sign_negative() => {
            "-0".to_string()
        }
        JsValue::Number(n) => n.to_string(),
        JsValue::String(s) => format!("'{}'", s.replace('\'', "\\'")),
        JsValue::Object(o) => {
            let o = o.borrow();
            let id = o.id();
            if seen.contains(&id) {
                return "[Circular]".to_string();
            }
            match &*o {
                ObjectType::Function(f) => {
                    if f.name.is_empty() {
                        "[Function (anonymous)]".to_string()
                    } else {
                        format!("[Function: {}]", f.name)
                    }
                }
                ObjectType::Array(a) => {
                    if a.elements.is_empty() {
                        return "[]".to_string();
                    }
                    if depth > MAX_INSPECT_DEPTH {
                        return "[Array]".to_string();
                    }
                    seen.insert(id);
                    let items: Vec<String> = a
                        .elements
                        .iter()
                        .map(|e| inspect_nested(e, depth + 1, seen))
                        .collect();
                    seen.remove(&id);
                    format!("[ {} ]", items.join(", "))
                }
                ObjectType::Ordinary(_) => {
                    let keys = o.own_keys();
                    if keys.is_empty() {
                        return "{}".to_string();
                    }
                    if depth > MAX_INSPECT_DEPTH {
                        return "[Object]".to_string();
                    }
                    seen.insert(id);
                    let items: Vec<String> = keys
                        .iter()
                        .map(|k| {
                            format!(
                                "{}: {}",
                                format_key(k),
                                inspect_nested(&o.get(k), depth + 1, seen)
                            )
                        })
                        .collect();
                    seen.remove(&id);
                    format!("{{ {} }}", items.join(", "))
                }
            }
        }
    }
}

fn format_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if is_identifier {
        key.to_string()
    } else {
        format!("'{}'", key)
    }
}

/// Format all arguments for console output.
fn format_args(args: &[JsValue]) -> String {
    args.iter().map(inspect).collect::<Vec<_>>().join(" ")
}

/// console.log - Log to stdout.
fn console_log(ctx: &mut EvalContext, _this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    ctx.console_write(ConsoleLevel::Log, format_args(&args));
    Ok(JsValue::Undefined)
}

/// console.error - Log to stderr.
fn console_error(ctx: &mut EvalContext, _this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    ctx.console_write(ConsoleLevel::Error, format_args(&args));
    Ok(JsValue::Undefined)
}

/// console.warn - Log warning to stderr.
fn console_warn(ctx: &mut EvalContext, _this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    ctx.console_write(ConsoleLevel::Warn, format_args(&args));
    Ok(JsValue::Undefined)
}

/// console.info - Log info to stdout.
fn console_info(ctx: &mut EvalContext, _this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    ctx.console_write(ConsoleLevel::Info, format_args(&args));
    Ok(JsValue::Undefined)
}
