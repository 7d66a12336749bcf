use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::FunctionObject;
use crate::runner::ds::operations::type_conversion::{canonical_index, to_string};
use crate::runner::ds::value::JsValue;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use uuid::Uuid;

pub type JsObjectType = Rc<RefCell<ObjectType>>;

lazy_static! {
    pub static ref LENGTH_PROP: String = "length".to_string();
}

/// Largest `length` an array can have (2^32 - 1).
pub const MAX_ARRAY_LENGTH: usize = u32::MAX as usize;

/// Arrays are stored densely; growing past this many elements fails.
pub const MAX_DENSE_ELEMENTS: usize = 1 << 24;

/// Index keys of arrays stop below `MAX_ARRAY_LENGTH`; larger integer keys
/// are ordinary properties.
fn array_index(key: &str) -> Option<usize> {
    canonical_index(key).filter(|i| *i < MAX_ARRAY_LENGTH)
}

pub enum ObjectType {
    Ordinary(ObjectBase),
    Array(ArrayObject),
    Function(FunctionObject),
}
impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
impl ObjectType {
    pub fn is_callable(&self) -> bool {
        matches!(self, ObjectType::Function(_))
    }

    pub fn as_function(&self) -> Option<&FunctionObject> {
        match self {
            ObjectType::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn get_object_base(&self) -> &ObjectBase {
        match self {
            ObjectType::Ordinary(o) => o,
            ObjectType::Array(a) => &a.object_base,
            ObjectType::Function(f) => f.get_object_base(),
        }
    }

    pub fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        match self {
            ObjectType::Ordinary(o) => o,
            ObjectType::Array(a) => &mut a.object_base,
            ObjectType::Function(f) => f.get_object_base_mut(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.get_object_base().id
    }

    /// [[Get]] restricted to own properties plus the exotic `length`/index
    /// keys of arrays and the `name`/`length` of functions.
    pub fn get(&self, key: &str) -> JsValue {
        match self {
            ObjectType::Array(a) => {
                if key == LENGTH_PROP.as_str() {
                    return JsValue::int(a.elements.len() as i64);
                }
                if let Some(idx) = array_index(key) {
                    return a.elements.get(idx).cloned().unwrap_or(JsValue::Undefined);
                }
            }
            ObjectType::Function(f) => {
                if !f.get_object_base().has_own(key) {
                    match key {
                        "name" => return JsValue::String(f.name.clone()),
                        "length" => return JsValue::int(f.length as i64),
                        _ => {}
                    }
                }
            }
            ObjectType::Ordinary(_) => {}
        }
        self.get_object_base()
            .get_own(key)
            .cloned()
            .unwrap_or(JsValue::Undefined)
    }

    pub fn set(&mut self, key: &str, value: JsValue) -> Result<(), JErrorType> {
        if let ObjectType::Array(a) = self {
            if a.object_base.frozen {
                return Err(read_only_error(key));
            }
            if key == LENGTH_PROP.as_str() {
                return a.set_length(&value);
            }
            if let Some(idx) = array_index(key) {
                if idx >= a.elements.len() {
                    if !a.object_base.extensible {
                        return Err(not_extensible_error(key));
                    }
                    a.grow_to(idx + 1)?;
                }
                a.elements[idx] = value;
                return Ok(());
            }
        }
        self.get_object_base_mut().set_own(key, value)
    }

    pub fn has_own(&self, key: &str) -> bool {
        match self {
            ObjectType::Array(a) => {
                key == LENGTH_PROP.as_str()
                    || array_index(key).map_or(false, |i| i < a.elements.len())
                    || a.object_base.has_own(key)
            }
            _ => self.get_object_base().has_own(key),
        }
    }

    /// Enumerable own keys in insertion order. Array indices come first.
    pub fn own_keys(&self) -> Vec<String> {
        let mut keys = vec![];
        if let ObjectType::Array(a) = self {
            keys.extend((0..a.elements.len()).map(|i| i.to_string()));
        }
        keys.extend(self.get_object_base().keys.iter().cloned());
        keys
    }

    pub fn freeze(&mut self) {
        let base = self.get_object_base_mut();
        base.frozen = true;
        base.extensible = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.get_object_base().frozen
    }

    pub fn to_string(&self) -> String {
        self.to_string_guarded(&mut HashSet::new())
    }

    /// `joining` holds the arrays whose conversion is in progress; meeting
    /// one of them again yields `""`.
    fn to_string_guarded(&self, joining: &mut HashSet<Uuid>) -> String {
        match self {
            ObjectType::Ordinary(_) => "[object Object]".to_string(),
            ObjectType::Array(a) => {
                let id = a.object_base.id;
                if !joining.insert(id) {
                    return String::new();
                }
                let joined = a
                    .elements
                    .iter()
                    .map(|e| match e {
                        JsValue::Undefined | JsValue::Null => String::new(),
                        JsValue::Object(o) => o.borrow().to_string_guarded(joining),
                        _ => to_string(e),
                    })
                    .collect::<Vec<String>>()
                    .join(",");
                joining.remove(&id);
                joined
            }
            ObjectType::Function(f) => f.to_string(),
        }
    }
}

pub struct ObjectBase {
    id: Uuid,
    properties: HashMap<String, JsValue>,
    keys: Vec<String>,
    extensible: bool,
    frozen: bool,
}
impl ObjectBase {
    pub fn new() -> Self {
        ObjectBase {
            id: Uuid::new_v4(),
            properties: HashMap::new(),
            keys: vec![],
            extensible: true,
            frozen: false,
        }
    }

    pub fn get_own(&self, key: &str) -> Option<&JsValue> {
        self.properties.get(key)
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn set_own(&mut self, key: &str, value: JsValue) -> Result<(), JErrorType> {
        if self.frozen {
            return Err(read_only_error(key));
        }
        match self.properties.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                if !self.extensible {
                    return Err(not_extensible_error(key));
                }
                self.keys.push(key.to_string());
                self.properties.insert(key.to_string(), value);
            }
        }
        Ok(())
    }
}
impl Default for ObjectBase {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ArrayObject {
    pub elements: Vec<JsValue>,
    object_base: ObjectBase,
}
impl ArrayObject {
    fn set_length(&mut self, value: &JsValue) -> Result<(), JErrorType> {
        let new_len = match value {
            JsValue::Number(n) => {
                let f = n.as_f64();
                if !f.is_finite() || f < 0.0 || f.fract() != 0.0 || f > MAX_ARRAY_LENGTH as f64 {
                    return Err(invalid_length_error());
                }
                f as usize
            }
            _ => return Err(invalid_length_error()),
        };
        if new_len > self.elements.len() {
            self.grow_to(new_len)
        } else {
            self.elements.truncate(new_len);
            Ok(())
        }
    }

    fn grow_to(&mut self, new_len: usize) -> Result<(), JErrorType> {
        if new_len > MAX_DENSE_ELEMENTS {
            return Err(JErrorType::RangeError(
                "Array length exceeds engine limit".to_string(),
            ));
        }
        self.elements.resize(new_len, JsValue::Undefined);
        Ok(())
    }
}

fn invalid_length_error() -> JErrorType {
    JErrorType::RangeError("Invalid array length".to_string())
}

fn read_only_error(key: &str) -> JErrorType {
    JErrorType::TypeError(format!(
        "Cannot assign to read only property '{}' of object",
        key
    ))
}

fn not_extensible_error(key: &str) -> JErrorType {
    JErrorType::TypeError(format!(
        "Cannot add property {}, object is not extensible",
        key
    ))
}

pub fn new_ordinary_object() -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Ordinary(ObjectBase::new())))
}

/// Builds an ordinary object from `(key, value)` pairs, keeping their order.
pub fn new_object_from<K: Into<String>>(
    properties: impl IntoIterator<Item = (K, JsValue)>,
) -> JsObjectType {
    let mut base = ObjectBase::new();
    for (k, v) in properties {
        let k = k.into();
        // A fresh object is never frozen, so this cannot fail.
        let _ = base.set_own(&k, v);
    }
    Rc::new(RefCell::new(ObjectType::Ordinary(base)))
}

pub fn new_array_object(elements: Vec<JsValue>) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Array(ArrayObject {
        elements,
        object_base: ObjectBase::new(),
    })))
}

/// Snapshot of an object's own `(key, value)` pairs, used to check that an
/// operation left an object untouched.
pub fn own_entries(obj: &JsObjectType) -> Vec<(String, JsValue)> {
    let o = obj.borrow();
    o.own_keys()
        .into_iter()
        .map(|k| {
            let v = o.get(&k);
            (k, v)
        })
        .collect()
}
