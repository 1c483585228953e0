//! Materials defined in terms of other materials, and the two that do not
//! scatter at all.

use serde_json::Value;

use crate::{
    macros::forward_name,
    materials::{ConstantTexture, LambertBsdf, SharedBsdf, SharedTexture, TexelConversion},
    scene::{json, shared, Scene, SceneError, SceneObject},
};

use super::BsdfBase;

/// Blend of two materials; `ratio` is the weight of `bsdf0`
#[derive(Debug)]
pub struct MixedBsdf {
    pub base: BsdfBase,
    pub bsdf0: SharedBsdf,
    pub bsdf1: SharedBsdf,
    pub ratio: SharedTexture,
}

impl Default for MixedBsdf {
    fn default() -> Self {
        MixedBsdf {
            base: BsdfBase::default(),
            bsdf0: shared(LambertBsdf::default()),
            bsdf1: shared(LambertBsdf::default()),
            ratio: shared(ConstantTexture::scalar(0.5)),
        }
    }
}

impl SceneObject for MixedBsdf {
    fn type_tag(&self) -> &'static str {
        "mixed"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.bsdf0 = scene.fetch_bsdf(json::member(value, "bsdf0")?)?;
        self.bsdf1 = scene.fetch_bsdf(json::member(value, "bsdf1")?)?;
        if let Some(ratio) = scene.texture_from_member(value, "ratio", TexelConversion::Average)? {
            self.ratio = ratio;
        }
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("bsdf0".into(), scene.bsdf_reference(&self.bsdf0));
        v.insert("bsdf1".into(), scene.bsdf_reference(&self.bsdf1));
        v.insert("ratio".into(), self.ratio.borrow().to_json(scene));
        Value::Object(v)
    }
}

impl_bsdf!(MixedBsdf);

/// Cut-out: where `opacity` is below one, light passes straight through
/// `base`
#[derive(Debug)]
pub struct TransparencyBsdf {
    pub base: BsdfBase,
    pub opacity: SharedTexture,
    pub base_bsdf: SharedBsdf,
}

impl Default for TransparencyBsdf {
    fn default() -> Self {
        TransparencyBsdf {
            base: BsdfBase::default(),
            opacity: shared(ConstantTexture::scalar(1.0)),
            base_bsdf: shared(LambertBsdf::default()),
        }
    }
}

impl SceneObject for TransparencyBsdf {
    fn type_tag(&self) -> &'static str {
        "transparency"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        if let Some(opacity) = scene.texture_from_member(value, "opacity", TexelConversion::Auto)? {
            self.opacity = opacity;
        }
        self.base_bsdf = scene.fetch_bsdf(json::member(value, "base")?)?;
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("opacity".into(), self.opacity.borrow().to_json(scene));
        v.insert("base".into(), scene.bsdf_reference(&self.base_bsdf));
        Value::Object(v)
    }
}

impl_bsdf!(TransparencyBsdf);

/// Invisible surface; used for emitters and medium boundaries
#[derive(Debug, Default)]
pub struct NullBsdf {
    pub base: BsdfBase,
}

impl SceneObject for NullBsdf {
    fn type_tag(&self) -> &'static str {
        "null"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        Value::Object(self.base.to_json(self.type_tag(), scene))
    }
}

impl_bsdf!(NullBsdf);

/// Passes light through unchanged; only the media on its two sides matter
#[derive(Debug, Default)]
pub struct ForwardBsdf {
    pub base: BsdfBase,
}

impl SceneObject for ForwardBsdf {
    fn type_tag(&self) -> &'static str {
        "forward"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        Value::Object(self.base.to_json(self.type_tag(), scene))
    }
}

impl_bsdf!(ForwardBsdf);
