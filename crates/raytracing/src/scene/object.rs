use std::{cell::RefCell, fmt, rc::Rc};

use serde_json::Value;

use super::{Scene, SceneError};

/// Handle to an object that several others may reference at once, e.g. one
/// material bound to many primitives. Identity is `Rc::ptr_eq`, never the name
pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Common contract of everything a scene document can describe
pub trait SceneObject: fmt::Debug {
    /// Tag this object is registered under, written as its `type` field
    fn type_tag(&self) -> &'static str;

    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);

    /// Overwrites the fields present in `value`. References to other objects
    /// are resolved against `scene`, which must already hold anything that
    /// is referenced by name
    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError>;

    /// Serialized form; `scene` decides whether references are written as
    /// names or inline
    fn to_json(&self, scene: &Scene) -> Value;
}

/// The capability families a type tag is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Primitive,
    Bsdf,
    Medium,
    Camera,
    Integrator,
    Texture,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Primitive => "primitive",
            Family::Bsdf => "bsdf",
            Family::Medium => "medium",
            Family::Camera => "camera",
            Family::Integrator => "integrator",
            Family::Texture => "texture",
        };
        f.write_str(name)
    }
}
