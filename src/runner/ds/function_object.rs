use std::cell::RefCell;
use std::rc::Rc;

use crate::parser::ast::FunctionData;
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{JsObjectType, ObjectBase, ObjectType};
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::NativeFn;

pub enum FunctionKind {
    /// A function written in the snippet language, closing over the
    /// environment it was created in.
    Script {
        data: Rc<FunctionData>,
        environment: JsLexEnvironmentType,
    },
    Native(NativeFn),
    Bound(BoundFunctionData),
}

/// State captured by `bind`. Nothing here changes after creation.
pub struct BoundFunctionData {
    pub bound_target_function: JsObjectType,
    pub bound_this: JsValue,
    pub bound_arguments: Vec<JsValue>,
}

pub struct FunctionObject {
    pub name: String,
    pub length: usize,
    pub kind: FunctionKind,
    object_base: ObjectBase,
}
impl FunctionObject {
    pub fn get_object_base(&self) -> &ObjectBase {
        &self.object_base
    }

    pub fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.object_base
    }

    pub fn as_bound(&self) -> Option<&BoundFunctionData> {
        match &self.kind {
            FunctionKind::Bound(b) => Some(b),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match &self.kind {
            FunctionKind::Script { data, .. } => data.meta.to_formatted_code(),
            FunctionKind::Native(_) => format!("function {}() {{ [native code] }}", self.name),
            FunctionKind::Bound(_) => "function () { [native code] }".to_string(),
        }
    }
}

fn wrap(function: FunctionObject) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Function(function)))
}

pub fn new_script_function(data: Rc<FunctionData>, environment: JsLexEnvironmentType) -> JsObjectType {
    let name = data
        .id
        .as_ref()
        .map(|id| id.name.clone())
        .unwrap_or_default();
    let length = data.params.len();
    wrap(FunctionObject {
        name,
        length,
        kind: FunctionKind::Script { data, environment },
        object_base: ObjectBase::new(),
    })
}

pub fn new_native_function(name: impl Into<String>, length: usize, f: NativeFn) -> JsObjectType {
    wrap(FunctionObject {
        name: name.into(),
        length,
        kind: FunctionKind::Native(f),
        object_base: ObjectBase::new(),
    })
}

/// Creates the bound function exotic object. `target_name` and `length` are
/// worked out by the caller so the target is never borrowed while the new
/// object is built.
pub fn new_bound_function(
    target: JsObjectType,
    target_name: &str,
    length: usize,
    bound_this: JsValue,
    bound_arguments: Vec<JsValue>,
) -> JsObjectType {
    wrap(FunctionObject {
        name: format!("bound {}", target_name),
        length,
        kind: FunctionKind::Bound(BoundFunctionData {
            bound_target_function: target,
            bound_this,
            bound_arguments,
        }),
        object_base: ObjectBase::new(),
    })
}

/// True exactly for values that support [[Call]].
pub fn is_callable(value: &JsValue) -> bool {
    match value {
        JsValue::Object(o) => o.borrow().is_callable(),
        _ => false,
    }
}
