//! Value sources sampled during shading. Textures belong to whoever holds
//! them (or to the texture cache, for bitmaps) rather than to a scene, so
//! they are always written inline.

use std::f32::consts::PI;

use serde_json::Value;

use crate::{
    geometry::Vec3,
    macros::forward_name,
    scene::{json, Scene, SceneError, SceneObject, Shared},
};

pub trait Texture: SceneObject {
    /// Mean value over the unit square
    fn average(&self) -> Vec3;

    fn is_constant(&self) -> bool {
        false
    }
}

pub type SharedTexture = Shared<dyn Texture>;

#[derive(Debug, Clone)]
pub struct ConstantTexture {
    pub name: String,
    pub value: Vec3,
}

impl ConstantTexture {
    pub fn new(value: Vec3) -> Self {
        ConstantTexture {
            name: String::new(),
            value,
        }
    }

    pub fn scalar(value: f32) -> Self {
        Self::new(Vec3::splat(value))
    }
}

impl Default for ConstantTexture {
    fn default() -> Self {
        Self::scalar(1.0)
    }
}

impl SceneObject for ConstantTexture {
    fn type_tag(&self) -> &'static str {
        "constant"
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        json::read(value, "value", &mut self.value)?;
        Ok(())
    }

    // written in the short form: a bare number, or a 3-array
    fn to_json(&self, _scene: &Scene) -> Value {
        if self.value.is_uniform() {
            json::float(self.value.x())
        } else {
            json::vec3(self.value)
        }
    }
}

impl Texture for ConstantTexture {
    fn average(&self) -> Vec3 {
        self.value
    }

    fn is_constant(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct CheckerTexture {
    pub name: String,
    pub on_color: Vec3,
    pub off_color: Vec3,
    pub res_u: u32,
    pub res_v: u32,
}

impl Default for CheckerTexture {
    fn default() -> Self {
        CheckerTexture {
            name: String::new(),
            on_color: Vec3::splat(0.8),
            off_color: Vec3::splat(0.2),
            res_u: 20,
            res_v: 20,
        }
    }
}

impl SceneObject for CheckerTexture {
    fn type_tag(&self) -> &'static str {
        "checker"
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        json::read(value, "on_color", &mut self.on_color)?;
        json::read(value, "off_color", &mut self.off_color)?;
        json::read(value, "res_u", &mut self.res_u)?;
        json::read(value, "res_v", &mut self.res_v)?;
        Ok(())
    }

    fn to_json(&self, _scene: &Scene) -> Value {
        let mut v = json::header(self.type_tag(), &self.name);
        v.insert("on_color".into(), json::vec3(self.on_color));
        v.insert("off_color".into(), json::vec3(self.off_color));
        v.insert("res_u".into(), Value::from(self.res_u));
        v.insert("res_v".into(), Value::from(self.res_v));
        Value::Object(v)
    }
}

impl Texture for CheckerTexture {
    fn average(&self) -> Vec3 {
        // an odd cell count has one more "on" cell than "off" cells
        let cells = self.res_u as u64 * self.res_v as u64;
        if cells == 0 {
            return self.on_color;
        }
        let on = cells.div_ceil(2) as f32 / cells as f32;
        self.on_color * on + self.off_color * (1.0 - on)
    }
}

/// 1 inside the disk inscribed in the unit square, 0 outside. Used as the
/// default camera aperture
#[derive(Debug, Clone, Default)]
pub struct DiskTexture {
    pub name: String,
}

impl SceneObject for DiskTexture {
    fn type_tag(&self) -> &'static str {
        "disk"
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        Ok(())
    }

    fn to_json(&self, _scene: &Scene) -> Value {
        Value::Object(json::header(self.type_tag(), &self.name))
    }
}

impl Texture for DiskTexture {
    fn average(&self) -> Vec3 {
        Vec3::splat(PI * 0.25)
    }
}

/// Regular polygon inscribed in the unit square, the shape of a bladed
/// diaphragm
#[derive(Debug, Clone)]
pub struct BladeTexture {
    pub name: String,
    pub blades: u32,
    // rotation of the polygon, radians
    pub angle: f32,
}

impl Default for BladeTexture {
    fn default() -> Self {
        BladeTexture {
            name: String::new(),
            blades: 6,
            angle: 0.5 * PI / 6.0,
        }
    }
}

impl SceneObject for BladeTexture {
    fn type_tag(&self) -> &'static str {
        "blade"
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        if json::read(value, "blades", &mut self.blades)? && value.get("angle").is_none() {
            self.angle = 0.5 * PI / self.blades as f32;
        }
        json::read(value, "angle", &mut self.angle)?;

        if self.blades < 3 {
            return Err(SceneError::invalid("blades", "an integer of at least 3"));
        }
        Ok(())
    }

    fn to_json(&self, _scene: &Scene) -> Value {
        let mut v = json::header(self.type_tag(), &self.name);
        v.insert("blades".into(), Value::from(self.blades));
        v.insert("angle".into(), json::float(self.angle));
        Value::Object(v)
    }
}

impl Texture for BladeTexture {
    fn average(&self) -> Vec3 {
        // polygon of circumradius 1/2
        let n = self.blades as f32;
        Vec3::splat(0.5 * n * 0.25 * f32::sin(2.0 * PI / n))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn assert_approx_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_constant_short_form() {
        let scene = Scene::new();
        assert_eq!(ConstantTexture::scalar(0.5).to_json(&scene), json!(0.5));
        assert_eq!(
            ConstantTexture::new(Vec3(0.1, 0.2, 0.3)).to_json(&scene),
            json!([0.1, 0.2, 0.3])
        );
    }

    #[test]
    fn test_checker_average() {
        let mut checker = CheckerTexture::default();
        assert_approx_eq(checker.average().x(), 0.5);

        checker.res_u = 3;
        checker.res_v = 1;
        checker.on_color = Vec3::splat(1.0);
        checker.off_color = Vec3::zero();
        assert_approx_eq(checker.average().y(), 2.0 / 3.0);
    }

    #[test]
    fn test_blade_count_validation() {
        let scene = Scene::new();
        let mut blade = BladeTexture::default();
        let err = blade.from_json(&json!({ "blades": 2 }), &scene).unwrap_err();
        assert!(matches!(err, SceneError::InvalidValue { .. }));
    }

    #[test]
    fn test_blade_angle_follows_count() {
        let scene = Scene::new();
        let mut blade = BladeTexture::default();
        blade.from_json(&json!({ "blades": 8 }), &scene).unwrap();
        assert_approx_eq(blade.angle, 0.5 * PI / 8.0);

        blade.from_json(&json!({ "blades": 5, "angle": 0.25 }), &scene).unwrap();
        assert_approx_eq(blade.angle, 0.25);
    }

    #[test]
    fn test_many_blades_approach_disk() {
        let blade = BladeTexture {
            blades: 512,
            ..Default::default()
        };
        assert!((blade.average().x() - DiskTexture::default().average().x()).abs() < 1e-3);
    }
}
