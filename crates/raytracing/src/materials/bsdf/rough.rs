//! Microfacet counterparts of the smooth conductor, dielectric, plastic and
//! coat: the same parameters plus a normal distribution and its roughness.

use serde_json::Value;

use crate::{
    macros::forward_name,
    materials::{ConstantTexture, LambertBsdf, SharedBsdf},
    scene::{shared, Scene, SceneError, SceneObject},
};

use super::{
    layered::{read_substrate, Layer},
    specular::{ComplexIor, Refraction},
    BsdfBase, Distribution, Microfacet,
};

#[derive(Debug, Default)]
pub struct RoughConductorBsdf {
    pub base: BsdfBase,
    pub(super) ior: ComplexIor,
    pub microfacet: Microfacet,
}

impl SceneObject for RoughConductorBsdf {
    fn type_tag(&self) -> &'static str {
        "rough_conductor"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.ior.from_json(value)?;
        self.microfacet.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.ior.write(&mut v);
        self.microfacet.write(&mut v, scene);
        Value::Object(v)
    }
}

impl_bsdf!(RoughConductorBsdf);

#[derive(Debug, Default)]
pub struct RoughDielectricBsdf {
    pub base: BsdfBase,
    pub(super) refraction: Refraction,
    pub microfacet: Microfacet,
}

impl SceneObject for RoughDielectricBsdf {
    fn type_tag(&self) -> &'static str {
        "rough_dielectric"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.refraction.from_json(value)?;
        self.microfacet.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.refraction.write(&mut v);
        self.microfacet.write(&mut v, scene);
        Value::Object(v)
    }
}

impl_bsdf!(RoughDielectricBsdf);

#[derive(Debug)]
pub struct RoughPlasticBsdf {
    pub base: BsdfBase,
    pub(super) layer: Layer,
    pub microfacet: Microfacet,
}

impl Default for RoughPlasticBsdf {
    fn default() -> Self {
        RoughPlasticBsdf {
            base: BsdfBase::default(),
            layer: Layer::with_ior(1.5),
            microfacet: Microfacet::default(),
        }
    }
}

impl SceneObject for RoughPlasticBsdf {
    fn type_tag(&self) -> &'static str {
        "rough_plastic"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.layer.from_json(value)?;
        self.microfacet.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.layer.write(&mut v);
        self.microfacet.write(&mut v, scene);
        Value::Object(v)
    }
}

impl_bsdf!(RoughPlasticBsdf);

#[derive(Debug)]
pub struct RoughCoatBsdf {
    pub base: BsdfBase,
    pub(super) layer: Layer,
    pub substrate: SharedBsdf,
    pub microfacet: Microfacet,
}

impl Default for RoughCoatBsdf {
    fn default() -> Self {
        RoughCoatBsdf {
            base: BsdfBase::default(),
            layer: Layer::with_ior(1.3),
            substrate: shared(LambertBsdf::default()),
            microfacet: Microfacet {
                distribution: Distribution::Ggx,
                roughness: shared(ConstantTexture::scalar(0.02)),
            },
        }
    }
}

impl SceneObject for RoughCoatBsdf {
    fn type_tag(&self) -> &'static str {
        "rough_coat"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.layer.from_json(value)?;
        read_substrate(value, scene, &mut self.substrate)?;
        self.microfacet.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.layer.write(&mut v);
        v.insert("substrate".into(), scene.bsdf_reference(&self.substrate));
        self.microfacet.write(&mut v, scene);
        Value::Object(v)
    }
}

impl_bsdf!(RoughCoatBsdf);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rough_fields_round_trip() {
        let scene = Scene::new();
        let mut glass = RoughDielectricBsdf::default();
        glass
            .from_json(&json!({ "distribution": "beckmann", "roughness": 0.3, "ior": 1.45 }), &scene)
            .unwrap();
        assert_eq!(glass.microfacet.distribution, Distribution::Beckmann);

        let v = glass.to_json(&scene);
        assert_eq!(v["distribution"], "beckmann");
        assert_eq!(v["roughness"], json!(0.3));
        assert_eq!(v["ior"], json!(1.45));
        assert_eq!(v["enable_refraction"], json!(true));
    }

    #[test]
    fn test_rough_coat_inline_substrate() {
        let scene = Scene::new();
        let mut coat = RoughCoatBsdf::default();
        coat.from_json(
            &json!({ "substrate": { "type": "rough_conductor", "material": "Al" } }),
            &scene,
        )
        .unwrap();
        let v = coat.to_json(&scene);
        assert_eq!(v["substrate"]["type"], "rough_conductor");
        assert_eq!(v["substrate"]["material"], "Al");
        assert_eq!(v["roughness"], json!(0.02));
    }
}
