use serde_json::Value;

use crate::{
    macros::forward_name,
    materials::{ConstantTexture, SharedTexture, TexelConversion},
    scene::{json, shared, Scene, SceneError, SceneObject},
};

use super::BsdfBase;

#[derive(Debug, Default)]
pub struct LambertBsdf {
    pub base: BsdfBase,
}

impl SceneObject for LambertBsdf {
    fn type_tag(&self) -> &'static str {
        "lambert"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        Value::Object(self.base.to_json(self.type_tag(), scene))
    }
}

impl_bsdf!(LambertBsdf);

/// Diffuse lobe with a glossy Phong lobe on top; `diffuse_ratio` is the
/// fraction of energy in the diffuse part
#[derive(Debug)]
pub struct PhongBsdf {
    pub base: BsdfBase,
    pub exponent: f32,
    pub diffuse_ratio: f32,
}

impl Default for PhongBsdf {
    fn default() -> Self {
        PhongBsdf {
            base: BsdfBase::default(),
            exponent: 64.0,
            diffuse_ratio: 0.2,
        }
    }
}

impl SceneObject for PhongBsdf {
    fn type_tag(&self) -> &'static str {
        "phong"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        json::read(value, "exponent", &mut self.exponent)?;
        json::read(value, "diffuse_ratio", &mut self.diffuse_ratio)?;

        if !(0.0..=1.0).contains(&self.diffuse_ratio) {
            return Err(SceneError::invalid("diffuse_ratio", "a number between 0 and 1"));
        }
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("exponent".into(), json::float(self.exponent));
        v.insert("diffuse_ratio".into(), json::float(self.diffuse_ratio));
        Value::Object(v)
    }
}

impl_bsdf!(PhongBsdf);

#[derive(Debug)]
pub struct OrenNayarBsdf {
    pub base: BsdfBase,
    pub roughness: SharedTexture,
}

impl Default for OrenNayarBsdf {
    fn default() -> Self {
        OrenNayarBsdf {
            base: BsdfBase::default(),
            roughness: shared(ConstantTexture::scalar(1.0)),
        }
    }
}

impl SceneObject for OrenNayarBsdf {
    fn type_tag(&self) -> &'static str {
        "oren_nayar"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        if let Some(roughness) = scene.texture_from_member(value, "roughness", TexelConversion::Average)? {
            self.roughness = roughness;
        }
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("roughness".into(), self.roughness.borrow().to_json(scene));
        Value::Object(v)
    }
}

impl_bsdf!(OrenNayarBsdf);
