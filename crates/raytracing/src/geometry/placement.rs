use serde_json::{json, Value};

use crate::scene::{json, SceneError};

use super::Vec3;

/// Where an object sits in the world, as written in a document's `transform`
/// block. Rotation is a set of euler angles in degrees, applied x, y, then z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Placement {
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: Vec3::splat(1.0),
        }
    }
}

impl Placement {
    pub fn is_identity(&self) -> bool {
        *self == Placement::default()
    }

    pub fn from_json(&mut self, value: &Value) -> Result<(), SceneError> {
        json::read(value, "position", &mut self.position)?;
        json::read(value, "rotation", &mut self.rotation)?;
        json::read(value, "scale", &mut self.scale)?;
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "position": json::vec3(self.position),
            "rotation": json::vec3(self.rotation),
            "scale": json::vec3(self.scale),
        })
    }
}
