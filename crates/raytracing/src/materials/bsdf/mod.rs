//! Surface scattering models. Every variant carries the same base block
//! (albedo, bump map, the media on either side) followed by its own
//! parameters; `impl_bsdf!` wires the base into the `Bsdf` trait.

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::{
    media::SharedMedium,
    scene::{json, shared, FromJson, Scene, SceneError, SceneObject, Shared},
};

use super::{ConstantTexture, SharedTexture, TexelConversion};

macro_rules! impl_bsdf {
    ($ty:ty) => {
        impl $crate::materials::Bsdf for $ty {
            fn base(&self) -> &$crate::materials::BsdfBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::materials::BsdfBase {
                &mut self.base
            }
        }
    };
}

mod composite;
mod diffuse;
mod layered;
mod rough;
mod specular;

pub use composite::{ForwardBsdf, MixedBsdf, NullBsdf, TransparencyBsdf};
pub use diffuse::{LambertBsdf, OrenNayarBsdf, PhongBsdf};
pub use layered::{PlasticBsdf, SmoothCoatBsdf};
pub use rough::{
    RoughCoatBsdf, RoughConductorBsdf, RoughDielectricBsdf, RoughPlasticBsdf,
};
pub use specular::{lookup_conductor, ConductorBsdf, DielectricBsdf, MirrorBsdf, ThinSheetBsdf};

pub trait Bsdf: SceneObject {
    fn base(&self) -> &BsdfBase;
    fn base_mut(&mut self) -> &mut BsdfBase;

    /// Medium on the side the surface normal points away from
    fn int_medium(&self) -> Option<SharedMedium> {
        self.base().int_medium.clone()
    }

    fn ext_medium(&self) -> Option<SharedMedium> {
        self.base().ext_medium.clone()
    }

    fn set_int_medium(&mut self, medium: Option<SharedMedium>) {
        self.base_mut().int_medium = medium;
    }

    fn set_ext_medium(&mut self, medium: Option<SharedMedium>) {
        self.base_mut().ext_medium = medium;
    }

    fn albedo(&self) -> SharedTexture {
        Rc::clone(&self.base().albedo)
    }
}

pub type SharedBsdf = Shared<dyn Bsdf>;

#[derive(Debug)]
pub struct BsdfBase {
    pub name: String,
    pub albedo: SharedTexture,
    pub bump: Option<SharedTexture>,
    pub bump_strength: f32,
    pub int_medium: Option<SharedMedium>,
    pub ext_medium: Option<SharedMedium>,
}

impl Default for BsdfBase {
    fn default() -> Self {
        BsdfBase {
            name: String::new(),
            albedo: shared(ConstantTexture::scalar(1.0)),
            bump: None,
            bump_strength: 1.0,
            int_medium: None,
            ext_medium: None,
        }
    }
}

impl BsdfBase {
    pub fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        if let Some(albedo) = scene.texture_from_member(value, "albedo", TexelConversion::Rgb)? {
            self.albedo = albedo;
        }
        if let Some(bump) = scene.texture_from_member(value, "bump", TexelConversion::Average)? {
            self.bump = Some(bump);
        }
        json::read(value, "bump_strength", &mut self.bump_strength)?;

        if let Some(medium) = value.get("int_medium") {
            self.int_medium = Some(scene.fetch_medium(medium)?);
        }
        if let Some(medium) = value.get("ext_medium") {
            self.ext_medium = Some(scene.fetch_medium(medium)?);
        }
        Ok(())
    }

    pub fn to_json(&self, type_tag: &str, scene: &Scene) -> Map<String, Value> {
        let mut v = json::header(type_tag, &self.name);
        v.insert("albedo".into(), self.albedo.borrow().to_json(scene));
        if let Some(bump) = &self.bump {
            v.insert("bump".into(), bump.borrow().to_json(scene));
            v.insert("bump_strength".into(), json::float(self.bump_strength));
        }
        if let Some(medium) = &self.int_medium {
            v.insert("int_medium".into(), scene.medium_reference(medium));
        }
        if let Some(medium) = &self.ext_medium {
            v.insert("ext_medium".into(), scene.medium_reference(medium));
        }
        v
    }
}

/// Microfacet normal distribution of the rough variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    Beckmann,
    Phong,
    #[default]
    Ggx,
}

impl Distribution {
    pub fn as_str(self) -> &'static str {
        match self {
            Distribution::Beckmann => "beckmann",
            Distribution::Phong => "phong",
            Distribution::Ggx => "ggx",
        }
    }
}

impl FromJson for Distribution {
    const EXPECTED: &'static str = "one of 'beckmann', 'phong' or 'ggx'";

    fn from_json(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "beckmann" => Some(Distribution::Beckmann),
            "phong" => Some(Distribution::Phong),
            "ggx" => Some(Distribution::Ggx),
            _ => None,
        }
    }
}

/// Fields of every variant that scatters off a microfacet surface
#[derive(Debug)]
pub struct Microfacet {
    pub distribution: Distribution,
    pub roughness: SharedTexture,
}

impl Default for Microfacet {
    fn default() -> Self {
        Microfacet {
            distribution: Distribution::Ggx,
            roughness: shared(ConstantTexture::scalar(0.1)),
        }
    }
}

impl Microfacet {
    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "distribution", &mut self.distribution)?;
        if let Some(roughness) = scene.texture_from_member(value, "roughness", TexelConversion::Average)? {
            self.roughness = roughness;
        }
        Ok(())
    }

    fn write(&self, v: &mut Map<String, Value>, scene: &Scene) {
        v.insert("distribution".into(), Value::from(self.distribution.as_str()));
        v.insert("roughness".into(), self.roughness.borrow().to_json(scene));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_distribution_is_invalid() {
        let scene = Scene::new();
        let mut bsdf = RoughConductorBsdf::default();
        let err = bsdf
            .from_json(&json!({ "distribution": "blinn" }), &scene)
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidValue { field, .. } if field == "distribution"));
    }

    #[test]
    fn test_base_fields() {
        let scene = Scene::new();
        let mut bsdf = LambertBsdf::default();
        bsdf.from_json(
            &json!({
                "name": "floor",
                "albedo": [0.2, 0.4, 0.6],
                "bump": 0.5,
                "bump_strength": 2,
                "int_medium": { "type": "homogeneous", "name": "fog" },
            }),
            &scene,
        )
        .unwrap();
        assert_eq!(bsdf.name(), "floor");
        assert_eq!(bsdf.base.bump_strength, 2.0);
        assert!(bsdf.ext_medium().is_none());
        assert_eq!(bsdf.int_medium().unwrap().borrow().name(), "fog");

        let v = bsdf.to_json(&scene);
        assert_eq!(v["type"], "lambert");
        assert_eq!(v["albedo"], json!([0.2, 0.4, 0.6]));
        assert_eq!(v["bump"], json!(0.5));
        // the medium is not part of the scene, so it is written inline
        assert_eq!(v["int_medium"]["name"], "fog");
    }

    #[test]
    fn test_medium_reference_must_exist() {
        let scene = Scene::new();
        let mut bsdf = LambertBsdf::default();
        let err = bsdf.from_json(&json!({ "ext_medium": "smoke" }), &scene).unwrap_err();
        assert!(matches!(err, SceneError::MissingReference { name, .. } if name == "smoke"));
    }
}
