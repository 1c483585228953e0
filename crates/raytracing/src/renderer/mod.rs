//! Light transport algorithms, as configured by a document's `integrator`
//! object. The integration loop itself lives outside this crate.

use serde_json::Value;

use crate::{
    macros::forward_name,
    scene::{json, Scene, SceneError, SceneObject, Shared},
};

pub trait Integrator: SceneObject {
    /// Path length limits, inclusive
    fn bounce_range(&self) -> (u32, u32);
}

pub type SharedIntegrator = Shared<dyn Integrator>;

#[derive(Debug, Clone)]
pub struct PathTraceIntegrator {
    pub name: String,
    pub min_bounces: u32,
    pub max_bounces: u32,
    pub enable_light_sampling: bool,
    pub enable_volume_light_sampling: bool,
    pub enable_consistency_checks: bool,
    pub enable_two_sided_shading: bool,
}

impl Default for PathTraceIntegrator {
    fn default() -> Self {
        PathTraceIntegrator {
            name: String::new(),
            min_bounces: 0,
            max_bounces: 64,
            enable_light_sampling: true,
            enable_volume_light_sampling: true,
            enable_consistency_checks: false,
            enable_two_sided_shading: true,
        }
    }
}

impl SceneObject for PathTraceIntegrator {
    fn type_tag(&self) -> &'static str {
        "path_trace"
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, _scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        json::read(value, "min_bounces", &mut self.min_bounces)?;
        json::read(value, "max_bounces", &mut self.max_bounces)?;
        json::read(value, "enable_light_sampling", &mut self.enable_light_sampling)?;
        json::read(value, "enable_volume_light_sampling", &mut self.enable_volume_light_sampling)?;
        json::read(value, "enable_consistency_checks", &mut self.enable_consistency_checks)?;
        json::read(value, "enable_two_sided_shading", &mut self.enable_two_sided_shading)?;

        if self.min_bounces > self.max_bounces {
            return Err(SceneError::invalid(
                "min_bounces",
                "an integer no larger than max_bounces",
            ));
        }
        Ok(())
    }

    fn to_json(&self, _scene: &Scene) -> Value {
        let mut v = json::header(self.type_tag(), &self.name);
        v.insert("min_bounces".into(), Value::from(self.min_bounces));
        v.insert("max_bounces".into(), Value::from(self.max_bounces));
        v.insert("enable_light_sampling".into(), Value::from(self.enable_light_sampling));
        v.insert(
            "enable_volume_light_sampling".into(),
            Value::from(self.enable_volume_light_sampling),
        );
        v.insert(
            "enable_consistency_checks".into(),
            Value::from(self.enable_consistency_checks),
        );
        v.insert(
            "enable_two_sided_shading".into(),
            Value::from(self.enable_two_sided_shading),
        );
        Value::Object(v)
    }
}

impl Integrator for PathTraceIntegrator {
    fn bounce_range(&self) -> (u32, u32) {
        (self.min_bounces, self.max_bounces)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bounce_limits() {
        let scene = Scene::new();
        let mut integrator = PathTraceIntegrator::default();
        integrator
            .from_json(&json!({ "min_bounces": 2, "max_bounces": 8 }), &scene)
            .unwrap();
        assert_eq!(integrator.bounce_range(), (2, 8));

        let err = integrator
            .from_json(&json!({ "min_bounces": 9 }), &scene)
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidValue { field, .. } if field == "min_bounces"));
    }
}
