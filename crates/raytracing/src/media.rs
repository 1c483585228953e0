//! Participating media. A medium is attached to the inside or outside of a
//! material and may be shared by any number of materials.

use serde_json::Value;

use crate::{
    geometry::Vec3,
    macros::forward_name,
    scene::{json, Scene, SceneError, SceneObject, Shared},
};

pub trait Medium: SceneObject {
    /// Extinction coefficient at the densest point of the medium
    fn sigma_t(&self) -> Vec3;

    fn is_homogeneous(&self) -> bool {
        false
    }
}

pub type SharedMedium = Shared<dyn Medium>;

/// Absorption and scattering coefficients, scaled by a density multiplier
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    sigma_a: Vec3,
    sigma_s: Vec3,
    density: f32,
}

impl Default for Coefficients {
    fn default() -> Self {
        Coefficients {
            sigma_a: Vec3::zero(),
            sigma_s: Vec3::zero(),
            density: 1.0,
        }
    }
}

impl Coefficients {
    fn from_json(&mut self, value: &Value) -> Result<(), SceneError> {
        json::read(value, "sigma_a", &mut self.sigma_a)?;
        json::read(value, "sigma_s", &mut self.sigma_s)?;
        json::read(value, "density", &mut self.density)?;
        if self.density < 0.0 {
            return Err(SceneError::invalid("density", "a non-negative number"));
        }
        Ok(())
    }

    fn write(&self, v: &mut serde_json::Map<String, Value>) {
        v.insert("sigma_a".into(), json::vec3(self.sigma_a));
        v.insert("sigma_s".into(), json::vec3(self.sigma_s));
        v.insert("density".into(), json::float(self.density));
    }

    fn sigma_t(&self) -> Vec3 {
        (self.sigma_a + self.sigma_s) * self.density
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomogeneousMedium {
    pub name: String,
    coefficients: Coefficients,
    // Henyey-Greenstein asymmetry, 0 is isotropic
    pub phase_g: f32,
}

impl HomogeneousMedium {
    pub fn sigma_a(&self) -> Vec3 {
        self.coefficients.sigma_a
    }

    pub fn sigma_s(&self) -> Vec3 {
        self.coefficients.sigma_s
    }
}

impl SceneObject for HomogeneousMedium {
    fn type_tag(&self) -> &'static str {
        "homogeneous"
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        self.coefficients.from_json(value)?;
        json::read(value, "phase_g", &mut self.phase_g)?;
        if !(-1.0..=1.0).contains(&self.phase_g) {
            return Err(SceneError::invalid("phase_g", "a number between -1 and 1"));
        }
        Ok(())
    }

    fn to_json(&self, _scene: &Scene) -> Value {
        let mut v = json::header(self.type_tag(), &self.name);
        self.coefficients.write(&mut v);
        v.insert("phase_g".into(), json::float(self.phase_g));
        Value::Object(v)
    }
}

impl Medium for HomogeneousMedium {
    fn sigma_t(&self) -> Vec3 {
        self.coefficients.sigma_t()
    }

    fn is_homogeneous(&self) -> bool {
        true
    }
}

/// Spherical shell of gas whose density falls off exponentially with height
/// above `center`
#[derive(Debug, Clone)]
pub struct AtmosphericMedium {
    pub name: String,
    pub center: Vec3,
    pub radius: f32,
    coefficients: Coefficients,
    pub falloff_scale: f32,
}

impl Default for AtmosphericMedium {
    fn default() -> Self {
        AtmosphericMedium {
            name: String::new(),
            center: Vec3::zero(),
            radius: 1.0,
            coefficients: Coefficients::default(),
            falloff_scale: 1.0,
        }
    }
}

impl SceneObject for AtmosphericMedium {
    fn type_tag(&self) -> &'static str {
        "atmosphere"
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        json::read(value, "center", &mut self.center)?;
        json::read(value, "radius", &mut self.radius)?;
        self.coefficients.from_json(value)?;
        json::read(value, "falloff_scale", &mut self.falloff_scale)?;
        if self.radius <= 0.0 {
            return Err(SceneError::invalid("radius", "a positive number"));
        }
        Ok(())
    }

    fn to_json(&self, _scene: &Scene) -> Value {
        let mut v = json::header(self.type_tag(), &self.name);
        v.insert("center".into(), json::vec3(self.center));
        v.insert("radius".into(), json::float(self.radius));
        self.coefficients.write(&mut v);
        v.insert("falloff_scale".into(), json::float(self.falloff_scale));
        Value::Object(v)
    }
}

impl Medium for AtmosphericMedium {
    fn sigma_t(&self) -> Vec3 {
        self.coefficients.sigma_t()
    }
}
