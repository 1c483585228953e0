//! Renderable objects. Each primitive is bound to exactly one material; the
//! material handle is shared, so one BSDF instance may sit behind any
//! number of primitives.
//!
//! Only what a document entry describes is kept here; mesh and curve files
//! are referenced by path, not parsed.

use std::{path::PathBuf, rc::Rc};

use serde_json::{Map, Value};

use crate::{
    geometry::Placement,
    macros::forward_name,
    materials::{LambertBsdf, SharedBsdf, SharedTexture, TexelConversion},
};

use super::{
    json,
    object::{shared, SceneObject, Shared},
    Scene, SceneError,
};

pub trait Primitive: SceneObject {
    fn base(&self) -> &PrimitiveBase;
    fn base_mut(&mut self) -> &mut PrimitiveBase;

    fn bsdf(&self) -> SharedBsdf {
        Rc::clone(&self.base().bsdf)
    }

    fn set_bsdf(&mut self, bsdf: SharedBsdf) {
        self.base_mut().bsdf = bsdf;
    }

    fn emission(&self) -> Option<SharedTexture> {
        self.base().emission.clone()
    }

    /// Primitives surrounding the whole scene (environment domes)
    fn is_infinite(&self) -> bool {
        false
    }
}

pub type SharedPrimitive = Shared<dyn Primitive>;

#[derive(Debug)]
pub struct PrimitiveBase {
    pub name: String,
    pub bsdf: SharedBsdf,
    pub transform: Placement,
    pub emission: Option<SharedTexture>,
}

impl Default for PrimitiveBase {
    fn default() -> Self {
        PrimitiveBase {
            name: String::new(),
            bsdf: shared(LambertBsdf::default()),
            transform: Placement::default(),
            emission: None,
        }
    }
}

impl PrimitiveBase {
    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        self.bsdf = scene.fetch_bsdf(json::member(value, "bsdf")?)?;

        if let Some(transform) = value.get("transform") {
            self.transform.from_json(transform)?;
        }
        if let Some(emission) = scene.texture_from_member(value, "emission", TexelConversion::Rgb)? {
            self.emission = Some(emission);
        }
        Ok(())
    }

    fn to_json(&self, type_tag: &str, scene: &Scene) -> Map<String, Value> {
        let mut v = json::header(type_tag, &self.name);
        if !self.transform.is_identity() {
            v.insert("transform".into(), self.transform.to_json());
        }
        if let Some(emission) = &self.emission {
            v.insert("emission".into(), emission.borrow().to_json(scene));
        }
        v.insert("bsdf".into(), scene.bsdf_reference(&self.bsdf));
        v
    }
}

// primitives described entirely by their placement
macro_rules! placed_primitive {
    ($ty:ident, $tag:literal, $infinite:literal) => {
        #[derive(Debug, Default)]
        pub struct $ty {
            pub base: PrimitiveBase,
        }

        impl SceneObject for $ty {
            fn type_tag(&self) -> &'static str {
                $tag
            }

            forward_name!(base.name);

            fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
                self.base.from_json(value, scene)
            }

            fn to_json(&self, scene: &Scene) -> Value {
                Value::Object(self.base.to_json(self.type_tag(), scene))
            }
        }

        impl Primitive for $ty {
            fn base(&self) -> &PrimitiveBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut PrimitiveBase {
                &mut self.base
            }

            fn is_infinite(&self) -> bool {
                $infinite
            }
        }
    };
}

placed_primitive!(Sphere, "sphere", false);
placed_primitive!(Quad, "quad", false);
placed_primitive!(InfiniteSphere, "infinite_sphere", true);

#[derive(Debug)]
pub struct Disk {
    pub base: PrimitiveBase,
    // emission cone half angle, degrees
    pub cone_angle: f32,
}

impl Default for Disk {
    fn default() -> Self {
        Disk {
            base: PrimitiveBase::default(),
            cone_angle: 90.0,
        }
    }
}

impl SceneObject for Disk {
    fn type_tag(&self) -> &'static str {
        "disk"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        json::read(value, "cone_angle", &mut self.cone_angle)?;
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("cone_angle".into(), json::float(self.cone_angle));
        Value::Object(v)
    }
}

impl Primitive for Disk {
    fn base(&self) -> &PrimitiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PrimitiveBase {
        &mut self.base
    }
}

/// Environment dome restricted to a cone around the transform's up axis,
/// e.g. a sun disk
#[derive(Debug)]
pub struct InfiniteSphereCap {
    pub base: PrimitiveBase,
    // half angle, degrees
    pub cap_angle: f32,
}

impl Default for InfiniteSphereCap {
    fn default() -> Self {
        InfiniteSphereCap {
            base: PrimitiveBase::default(),
            cap_angle: 10.0,
        }
    }
}

impl SceneObject for InfiniteSphereCap {
    fn type_tag(&self) -> &'static str {
        "infinite_sphere_cap"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        json::read(value, "cap_angle", &mut self.cap_angle)?;
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("cap_angle".into(), json::float(self.cap_angle));
        Value::Object(v)
    }
}

impl Primitive for InfiniteSphereCap {
    fn base(&self) -> &PrimitiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PrimitiveBase {
        &mut self.base
    }

    fn is_infinite(&self) -> bool {
        true
    }
}

/// Triangle mesh stored in an external file. `file` is resolved against
/// the scene's source directory when read
#[derive(Debug, Default)]
pub struct TriangleMesh {
    pub base: PrimitiveBase,
    pub file: PathBuf,
    pub smooth: bool,
    pub backface_culling: bool,
}

impl SceneObject for TriangleMesh {
    fn type_tag(&self) -> &'static str {
        "mesh"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        if let Some(file) = json::optional::<String>(value, "file")? {
            self.file = scene.resolve_asset(&file);
        }
        json::read(value, "smooth", &mut self.smooth)?;
        json::read(value, "backface_culling", &mut self.backface_culling)?;
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("file".into(), Value::from(scene.relative_asset(&self.file)));
        v.insert("smooth".into(), Value::from(self.smooth));
        v.insert("backface_culling".into(), Value::from(self.backface_culling));
        Value::Object(v)
    }
}

impl Primitive for TriangleMesh {
    fn base(&self) -> &PrimitiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PrimitiveBase {
        &mut self.base
    }
}

/// Hair / fur strands stored in an external file
#[derive(Debug)]
pub struct Curves {
    pub base: PrimitiveBase,
    pub file: PathBuf,
    pub curve_thickness: f32,
}

impl Default for Curves {
    fn default() -> Self {
        Curves {
            base: PrimitiveBase::default(),
            file: PathBuf::new(),
            curve_thickness: 0.01,
        }
    }
}

impl SceneObject for Curves {
    fn type_tag(&self) -> &'static str {
        "curves"
    }

    forward_name!(base.name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        self.base.from_json(value, scene)?;
        if let Some(file) = json::optional::<String>(value, "file")? {
            self.file = scene.resolve_asset(&file);
        }
        json::read(value, "curve_thickness", &mut self.curve_thickness)?;
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = self.base.to_json(self.type_tag(), scene);
        v.insert("file".into(), Value::from(scene.relative_asset(&self.file)));
        v.insert("curve_thickness".into(), json::float(self.curve_thickness));
        Value::Object(v)
    }
}

impl Primitive for Curves {
    fn base(&self) -> &PrimitiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PrimitiveBase {
        &mut self.base
    }
}
