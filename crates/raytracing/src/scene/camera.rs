use serde_json::Value;

use crate::{
    geometry::Vec3,
    macros::forward_name,
    materials::{DiskTexture, SharedTexture, TexelConversion},
};

use super::{
    json,
    object::{shared, SceneObject, Shared},
    Scene, SceneError,
};

pub trait Camera: SceneObject {
    /// Output image size in pixels, width then height
    fn resolution(&self) -> [u32; 2];

    fn aspect_ratio(&self) -> f32 {
        let [width, height] = self.resolution();
        width as f32 / height as f32
    }
}

pub type SharedCamera = Shared<dyn Camera>;

/// Placement and film shared by every camera model
#[derive(Debug, Clone)]
pub struct CameraBase {
    pub name: String,
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub resolution: [u32; 2],
    // horizontal field of view, degrees
    pub fov: f32,
}

impl Default for CameraBase {
    fn default() -> Self {
        CameraBase {
            name: String::new(),
            position: Vec3(0.0, 0.0, -1.0),
            look_at: Vec3::zero(),
            up: Vec3(0.0, 1.0, 0.0),
            resolution: [1000, 563],
            fov: 60.0,
        }
    }
}

impl CameraBase {
    fn from_json(&mut self, value: &Value) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        json::read(value, "position", &mut self.position)?;
        json::read(value, "look_at", &mut self.look_at)?;
        json::read(value, "up", &mut self.up)?;
        json::read(value, "resolution", &mut self.resolution)?;
        json::read(value, "fov", &mut self.fov)?;

        if self.resolution.contains(&0) {
            return Err(SceneError::invalid("resolution", "two non-zero integers"));
        }
        Ok(())
    }

    fn to_json(&self, type_tag: &str) -> serde_json::Map<String, Value> {
        let mut v = json::header(type_tag, &self.name);
        v.insert("position".into(), json::vec3(self.position));
        v.insert("look_at".into(), json::vec3(self.look_at));
        v.insert("up".into(), json::vec3(self.up));
        v.insert("resolution".into(), Value::from(self.resolution.to_vec()));
        v.insert("fov".into(), json::float(self.fov));
        v
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinholeCamera {
    pub base: CameraBase,
}

impl SceneObject for PinholeCamera {
    fn type_tag(&self) -> &'static str {
        "pinhole"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value)
    }

    fn to_json(&self, _scene: &Scene) -> Value {
        Value::Object(self.base.to_json(self.type_tag()))
    }
}

impl Camera for PinholeCamera {
    fn resolution(&self) -> [u32; 2] {
        self.base.resolution
    }
}

/// Pinhole camera with a finite lens; the aperture shape is a texture
/// (a disk by default, or e.g. a bladed diaphragm)
#[derive(Debug)]
pub struct ThinlensCamera {
    pub base: CameraBase,
    pub focus_distance: f32,
    pub aperture_size: f32,
    // strength of the cat's eye (optical vignetting) effect, 0 disables it
    pub cat_eye: f32,
    pub aperture: SharedTexture,
}

impl Default for ThinlensCamera {
    fn default() -> Self {
        ThinlensCamera {
            base: CameraBase::default(),
            focus_distance: 1.0,
            aperture_size: 0.001,
            cat_eye: 0.0,
            aperture: shared(DiskTexture::default()),
        }
    }
}

impl SceneObject for ThinlensCamera {
    fn type_tag(&self) -> &'static str {
        "thinlens"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value)?;
        json::read(value, "focus_distance", &mut self.focus_distance)?;
        json::read(value, "aperture_size", &mut self.aperture_size)?;
        json::read(value, "cat_eye", &mut self.cat_eye)?;
        if let Some(aperture) = scene.texture_from_member(value, "aperture", TexelConversion::Average)? {
            self.aperture = aperture;
        }
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag());
        v.insert("focus_distance".into(), json::float(self.focus_distance));
        v.insert("aperture_size".into(), json::float(self.aperture_size));
        v.insert("cat_eye".into(), json::float(self.cat_eye));
        v.insert("aperture".into(), self.aperture.borrow().to_json(scene));
        Value::Object(v)
    }
}

impl Camera for ThinlensCamera {
    fn resolution(&self) -> [u32; 2] {
        self.base.resolution
    }
}
