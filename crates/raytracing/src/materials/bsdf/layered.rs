//! Materials built from a dielectric layer over something else: a diffuse
//! base for plastics, an arbitrary substrate BSDF for coats.

use serde_json::{Map, Value};

use crate::{
    geometry::Vec3,
    macros::forward_name,
    materials::{LambertBsdf, SharedBsdf},
    scene::{json, shared, Scene, SceneError, SceneObject},
};

use super::BsdfBase;

/// The absorbing dielectric layer on top
#[derive(Debug, Clone, Copy)]
pub(super) struct Layer {
    pub ior: f32,
    pub thickness: f32,
    pub sigma_a: Vec3,
}

impl Layer {
    pub fn with_ior(ior: f32) -> Self {
        Layer {
            ior,
            thickness: 1.0,
            sigma_a: Vec3::zero(),
        }
    }

    pub fn from_json(&mut self, value: &Value) -> Result<(), SceneError> {
        json::read(value, "ior", &mut self.ior)?;
        json::read(value, "thickness", &mut self.thickness)?;
        json::read(value, "sigma_a", &mut self.sigma_a)?;
        Ok(())
    }

    pub fn write(&self, v: &mut Map<String, Value>) {
        v.insert("ior".into(), json::float(self.ior));
        v.insert("thickness".into(), json::float(self.thickness));
        v.insert("sigma_a".into(), json::vec3(self.sigma_a));
    }
}

/// Reads the `substrate` reference of a coat, if present
pub(super) fn read_substrate(value: &Value, scene: &Scene, dst: &mut SharedBsdf) -> Result<(), SceneError> {
    if let Some(substrate) = value.get("substrate") {
        *dst = scene.fetch_bsdf(substrate)?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct PlasticBsdf {
    pub base: BsdfBase,
    pub(super) layer: Layer,
}

impl Default for PlasticBsdf {
    fn default() -> Self {
        PlasticBsdf {
            base: BsdfBase::default(),
            layer: Layer::with_ior(1.5),
        }
    }
}

impl PlasticBsdf {
    pub fn ior(&self) -> f32 {
        self.layer.ior
    }
}

impl SceneObject for PlasticBsdf {
    fn type_tag(&self) -> &'static str {
        "plastic"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.layer.from_json(value)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.layer.write(&mut v);
        Value::Object(v)
    }
}

impl_bsdf!(PlasticBsdf);

#[derive(Debug)]
pub struct SmoothCoatBsdf {
    pub base: BsdfBase,
    pub(super) layer: Layer,
    pub substrate: SharedBsdf,
}

impl Default for SmoothCoatBsdf {
    fn default() -> Self {
        SmoothCoatBsdf {
            base: BsdfBase::default(),
            layer: Layer::with_ior(1.3),
            substrate: shared(LambertBsdf::default()),
        }
    }
}

impl SceneObject for SmoothCoatBsdf {
    fn type_tag(&self) -> &'static str {
        "smooth_coat"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.layer.from_json(value)?;
        read_substrate(value, scene, &mut self.substrate)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.layer.write(&mut v);
        v.insert("substrate".into(), scene.bsdf_reference(&self.substrate));
        Value::Object(v)
    }
}

impl_bsdf!(SmoothCoatBsdf);

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_substrate_by_name() {
        let mut scene = Scene::new();
        let copper = scene
            .instantiate_bsdf("conductor", &json!({ "type": "conductor", "name": "copper" }))
            .unwrap();
        scene.add_bsdf(&copper);

        let mut coat = SmoothCoatBsdf::default();
        coat.from_json(&json!({ "substrate": "copper", "ior": 1.5 }), &scene).unwrap();
        assert!(Rc::ptr_eq(&coat.substrate, &copper));
        assert_eq!(coat.layer.ior, 1.5);

        let v = coat.to_json(&scene);
        assert_eq!(v["substrate"], "copper");
        assert_eq!(v["thickness"], json!(1.0));
    }
}
