use serde_json::{Map, Value};

use crate::{
    geometry::Vec3,
    macros::forward_name,
    materials::{ConstantTexture, SharedTexture, TexelConversion},
    scene::{json, shared, Scene, SceneError, SceneObject},
};

use super::BsdfBase;

#[derive(Debug, Default)]
pub struct MirrorBsdf {
    pub base: BsdfBase,
}

impl SceneObject for MirrorBsdf {
    fn type_tag(&self) -> &'static str {
        "mirror"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        Value::Object(self.base.to_json(self.type_tag(), scene))
    }
}

impl_bsdf!(MirrorBsdf);

/// Index of refraction and whether transmission is traced at all, shared by
/// the smooth and rough dielectrics
#[derive(Debug, Clone, Copy)]
pub(super) struct Refraction {
    pub ior: f32,
    pub enable_refraction: bool,
}

impl Default for Refraction {
    fn default() -> Self {
        Refraction {
            ior: 1.5,
            enable_refraction: true,
        }
    }
}

impl Refraction {
    pub fn from_json(&mut self, value: &Value) -> Result<(), SceneError> {
        json::read(value, "ior", &mut self.ior)?;
        json::read(value, "enable_refraction", &mut self.enable_refraction)?;
        if self.ior <= 0.0 {
            return Err(SceneError::invalid("ior", "a positive number"));
        }
        Ok(())
    }

    pub fn write(&self, v: &mut Map<String, Value>) {
        v.insert("ior".into(), json::float(self.ior));
        v.insert("enable_refraction".into(), Value::from(self.enable_refraction));
    }
}

#[derive(Debug, Default)]
pub struct DielectricBsdf {
    pub base: BsdfBase,
    pub(super) refraction: Refraction,
}

impl DielectricBsdf {
    pub fn ior(&self) -> f32 {
        self.refraction.ior
    }

    pub fn enable_refraction(&self) -> bool {
        self.refraction.enable_refraction
    }
}

impl SceneObject for DielectricBsdf {
    fn type_tag(&self) -> &'static str {
        "dielectric"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.refraction.from_json(value)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.refraction.write(&mut v);
        Value::Object(v)
    }
}

impl_bsdf!(DielectricBsdf);

// complex index of refraction (eta, k) of a few common metals, sampled at
// the red, green and blue primaries
const CONDUCTORS: &[(&str, Vec3, Vec3)] = &[
    ("Ag", Vec3(0.155265, 0.116723, 0.138342), Vec3(4.82835, 3.12225, 2.14696)),
    ("Al", Vec3(1.65746, 0.880369, 0.521229), Vec3(9.22387, 6.26952, 4.837)),
    ("Au", Vec3(0.143119, 0.374957, 1.44248), Vec3(3.98316, 2.38572, 1.60322)),
    ("Cr", Vec3(4.36968, 2.9167, 1.6547), Vec3(5.20637, 4.23140, 3.75495)),
    ("Cu", Vec3(0.200438, 0.924033, 1.10221), Vec3(3.91295, 2.45285, 2.14219)),
];

pub fn lookup_conductor(material: &str) -> Option<(Vec3, Vec3)> {
    CONDUCTORS
        .iter()
        .find(|(name, _, _)| *name == material)
        .map(|&(_, eta, k)| (eta, k))
}

/// A metal, either named (`material`, looked up in a table of measured
/// values) or given explicitly by `eta` and `k`
#[derive(Debug, Clone)]
pub(super) struct ComplexIor {
    // empty for explicitly given values
    pub material: String,
    pub eta: Vec3,
    pub k: Vec3,
}

impl Default for ComplexIor {
    fn default() -> Self {
        ComplexIor {
            material: "Cu".to_owned(),
            eta: Vec3(0.200438, 0.924033, 1.10221),
            k: Vec3(3.91295, 2.45285, 2.14219),
        }
    }
}

impl ComplexIor {
    pub fn from_json(&mut self, value: &Value) -> Result<(), SceneError> {
        let mut material = String::new();
        if json::read(value, "material", &mut material)? {
            let (eta, k) = lookup_conductor(&material)
                .ok_or_else(|| SceneError::invalid("material", "the name of a known conductor"))?;
            self.material = material;
            self.eta = eta;
            self.k = k;
        } else {
            let eta_given = json::read(value, "eta", &mut self.eta)?;
            let k_given = json::read(value, "k", &mut self.k)?;
            if eta_given || k_given {
                self.material.clear();
            }
        }
        Ok(())
    }

    pub fn write(&self, v: &mut Map<String, Value>) {
        if self.material.is_empty() {
            v.insert("eta".into(), json::vec3(self.eta));
            v.insert("k".into(), json::vec3(self.k));
        } else {
            v.insert("material".into(), Value::from(self.material.as_str()));
        }
    }
}

#[derive(Debug, Default)]
pub struct ConductorBsdf {
    pub base: BsdfBase,
    pub(super) ior: ComplexIor,
}

impl ConductorBsdf {
    pub fn eta(&self) -> Vec3 {
        self.ior.eta
    }

    pub fn k(&self) -> Vec3 {
        self.ior.k
    }
}

impl SceneObject for ConductorBsdf {
    fn type_tag(&self) -> &'static str {
        "conductor"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        self.ior.from_json(value)
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        self.ior.write(&mut v);
        Value::Object(v)
    }
}

impl_bsdf!(ConductorBsdf);

/// Infinitely thin dielectric film, e.g. a soap bubble
#[derive(Debug)]
pub struct ThinSheetBsdf {
    pub base: BsdfBase,
    pub ior: f32,
    pub thickness: SharedTexture,
    pub sigma_a: Vec3,
    pub enable_interference: bool,
}

impl Default for ThinSheetBsdf {
    fn default() -> Self {
        ThinSheetBsdf {
            base: BsdfBase::default(),
            ior: 1.5,
            thickness: shared(ConstantTexture::scalar(0.5)),
            sigma_a: Vec3::zero(),
            enable_interference: false,
        }
    }
}

impl SceneObject for ThinSheetBsdf {
    fn type_tag(&self) -> &'static str {
        "thinsheet"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        json::read(value, "ior", &mut self.ior)?;
        if let Some(thickness) = scene.texture_from_member(value, "thickness", TexelConversion::Average)? {
            self.thickness = thickness;
        }
        json::read(value, "sigma_a", &mut self.sigma_a)?;
        json::read(value, "enable_interference", &mut self.enable_interference)?;
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("ior".into(), json::float(self.ior));
        v.insert("thickness".into(), self.thickness.borrow().to_json(scene));
        v.insert("sigma_a".into(), json::vec3(self.sigma_a));
        v.insert("enable_interference".into(), Value::from(self.enable_interference));
        Value::Object(v)
    }
}

impl_bsdf!(ThinSheetBsdf);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_named_conductor() {
        let scene = Scene::new();
        let mut gold = ConductorBsdf::default();
        gold.from_json(&json!({ "material": "Au" }), &scene).unwrap();
        assert_eq!(gold.eta(), lookup_conductor("Au").unwrap().0);

        let v = gold.to_json(&scene);
        assert_eq!(v["material"], "Au");
        assert!(v.get("eta").is_none());
    }

    #[test]
    fn test_explicit_conductor_drops_material() {
        let scene = Scene::new();
        let mut metal = ConductorBsdf::default();
        metal.from_json(&json!({ "eta": 1.5, "k": [1, 2, 3] }), &scene).unwrap();
        assert_eq!(metal.k(), Vec3(1.0, 2.0, 3.0));

        let v = metal.to_json(&scene);
        assert!(v.get("material").is_none());
        assert_eq!(v["eta"], json!([1.5, 1.5, 1.5]));
    }

    #[test]
    fn test_unknown_conductor() {
        let scene = Scene::new();
        let mut metal = ConductorBsdf::default();
        assert!(matches!(
            metal.from_json(&json!({ "material": "Unobtainium" }), &scene),
            Err(SceneError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_dielectric_rejects_non_positive_ior() {
        let scene = Scene::new();
        let mut glass = DielectricBsdf::default();
        assert!(glass.from_json(&json!({ "ior": 0 }), &scene).is_err());

        let mut glass = DielectricBsdf::default();
        glass.from_json(&json!({ "ior": 1.33, "enable_refraction": false }), &scene).unwrap();
        assert!(!glass.enable_refraction());
        assert_eq!(glass.to_json(&scene)["ior"], json!(1.33));
    }
}
