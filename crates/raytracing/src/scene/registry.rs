//! Maps a document's `type` tag to the concrete variant it names, one table
//! per capability family. Each table starts out holding every built-in
//! variant; callers may register more before loading.

use std::{collections::HashMap, fmt};

use serde_json::Value;

use crate::{
    materials::{
        BladeTexture, Bsdf, CheckerTexture, ConductorBsdf, ConstantTexture, DielectricBsdf,
        DiskTexture, ForwardBsdf, LambertBsdf, MirrorBsdf, MixedBsdf, NullBsdf, OrenNayarBsdf,
        PhongBsdf, PlasticBsdf, RoughCoatBsdf, RoughConductorBsdf, RoughDielectricBsdf,
        RoughPlasticBsdf, SharedBsdf, SharedTexture, SmoothCoatBsdf, Texture, ThinSheetBsdf,
        TransparencyBsdf,
    },
    media::{AtmosphericMedium, HomogeneousMedium, Medium, SharedMedium},
    renderer::{Integrator, PathTraceIntegrator, SharedIntegrator},
};

use super::{
    camera::{Camera, PinholeCamera, SharedCamera, ThinlensCamera},
    object::{shared, Family, SceneObject, Shared},
    primitive::{
        Curves, Disk, InfiniteSphere, InfiniteSphereCap, Primitive, Quad, SharedPrimitive, Sphere,
        TriangleMesh,
    },
    Scene, SceneError,
};

/// Produces a default instance of one concrete variant
pub type Constructor<T> = fn() -> Shared<T>;

pub struct Registry<T: ?Sized> {
    family: Family,
    constructors: HashMap<&'static str, Constructor<T>>,
}

impl<T: ?Sized + SceneObject> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("family", &self.family)
            .field("tags", &self.tags())
            .finish()
    }
}

impl<T: ?Sized + SceneObject> Registry<T> {
    pub fn new(family: Family) -> Self {
        Registry {
            family,
            constructors: HashMap::new(),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Returns the constructor previously registered under `tag`, if any
    pub fn register(&mut self, tag: &'static str, constructor: Constructor<T>) -> Option<Constructor<T>> {
        self.constructors.insert(tag, constructor)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.constructors.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Default instance of the variant registered under `tag`
    pub fn construct(&self, tag: &str) -> Result<Shared<T>, SceneError> {
        let constructor = self.constructors.get(tag).ok_or_else(|| SceneError::UnknownType {
            family: self.family,
            tag: tag.to_owned(),
        })?;

        Ok(constructor())
    }

    /// Constructs the variant and initializes it from `value` before handing
    /// it back; the new object is not added to any of the scene's lists
    pub fn instantiate(&self, tag: &str, value: &Value, scene: &Scene) -> Result<Shared<T>, SceneError> {
        let object = self.construct(tag)?;
        object.borrow_mut().from_json(value, scene)?;
        Ok(object)
    }
}

fn primitive<P: Primitive + Default + 'static>() -> SharedPrimitive {
    shared(P::default())
}

fn bsdf<B: Bsdf + Default + 'static>() -> SharedBsdf {
    shared(B::default())
}

fn medium<M: Medium + Default + 'static>() -> SharedMedium {
    shared(M::default())
}

fn camera<C: Camera + Default + 'static>() -> SharedCamera {
    shared(C::default())
}

fn integrator<I: Integrator + Default + 'static>() -> SharedIntegrator {
    shared(I::default())
}

fn texture<X: Texture + Default + 'static>() -> SharedTexture {
    shared(X::default())
}

/// One registry per family. Bitmap textures are absent from `textures`:
/// they are always produced by the texture cache
#[derive(Debug)]
pub struct Registries {
    pub primitives: Registry<dyn Primitive>,
    pub bsdfs: Registry<dyn Bsdf>,
    pub media: Registry<dyn Medium>,
    pub cameras: Registry<dyn Camera>,
    pub integrators: Registry<dyn Integrator>,
    pub textures: Registry<dyn Texture>,
}

impl Default for Registries {
    fn default() -> Self {
        let mut primitives = Registry::new(Family::Primitive);
        primitives.register("mesh", primitive::<TriangleMesh>);
        primitives.register("sphere", primitive::<Sphere>);
        primitives.register("quad", primitive::<Quad>);
        primitives.register("disk", primitive::<Disk>);
        primitives.register("infinite_sphere", primitive::<InfiniteSphere>);
        primitives.register("infinite_sphere_cap", primitive::<InfiniteSphereCap>);
        primitives.register("curves", primitive::<Curves>);

        let mut bsdfs = Registry::new(Family::Bsdf);
        bsdfs.register("lambert", bsdf::<LambertBsdf>);
        bsdfs.register("phong", bsdf::<PhongBsdf>);
        bsdfs.register("mixed", bsdf::<MixedBsdf>);
        bsdfs.register("dielectric", bsdf::<DielectricBsdf>);
        bsdfs.register("conductor", bsdf::<ConductorBsdf>);
        bsdfs.register("mirror", bsdf::<MirrorBsdf>);
        bsdfs.register("rough_conductor", bsdf::<RoughConductorBsdf>);
        bsdfs.register("rough_dielectric", bsdf::<RoughDielectricBsdf>);
        bsdfs.register("smooth_coat", bsdf::<SmoothCoatBsdf>);
        bsdfs.register("null", bsdf::<NullBsdf>);
        bsdfs.register("forward", bsdf::<ForwardBsdf>);
        bsdfs.register("thinsheet", bsdf::<ThinSheetBsdf>);
        bsdfs.register("oren_nayar", bsdf::<OrenNayarBsdf>);
        bsdfs.register("plastic", bsdf::<PlasticBsdf>);
        bsdfs.register("rough_plastic", bsdf::<RoughPlasticBsdf>);
        bsdfs.register("rough_coat", bsdf::<RoughCoatBsdf>);
        bsdfs.register("transparency", bsdf::<TransparencyBsdf>);

        let mut media = Registry::new(Family::Medium);
        media.register("homogeneous", medium::<HomogeneousMedium>);
        media.register("atmosphere", medium::<AtmosphericMedium>);

        let mut cameras = Registry::new(Family::Camera);
        cameras.register("pinhole", camera::<PinholeCamera>);
        cameras.register("thinlens", camera::<ThinlensCamera>);

        let mut integrators = Registry::new(Family::Integrator);
        integrators.register("path_trace", integrator::<PathTraceIntegrator>);

        let mut textures = Registry::new(Family::Texture);
        textures.register("constant", texture::<ConstantTexture>);
        textures.register("checker", texture::<CheckerTexture>);
        textures.register("disk", texture::<DiskTexture>);
        textures.register("blade", texture::<BladeTexture>);

        Registries {
            primitives,
            bsdfs,
            media,
            cameras,
            integrators,
            textures,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_tag_names_family() {
        let registries = Registries::default();
        let scene = Scene::new();
        let err = registries
            .bsdfs
            .instantiate("velvet", &json!({ "type": "velvet" }), &scene)
            .unwrap_err();
        match err {
            SceneError::UnknownType { family, tag } => {
                assert_eq!(family, Family::Bsdf);
                assert_eq!(tag, "velvet");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let registries = Registries::default();
        assert!(registries.bsdfs.contains("lambert"));
        assert!(!registries.bsdfs.contains("Lambert"));
        assert!(!registries.textures.contains("bitmap"));
    }

    #[test]
    fn test_instantiate_runs_from_json() {
        let registries = Registries::default();
        let scene = Scene::new();
        let phong = registries
            .bsdfs
            .instantiate("phong", &json!({ "type": "phong", "name": "shiny", "exponent": 12 }), &scene)
            .unwrap();
        assert_eq!(phong.borrow().name(), "shiny");
        assert_eq!(phong.borrow().type_tag(), "phong");
        assert_eq!(phong.borrow().to_json(&scene)["exponent"], json!(12.0));
    }

    #[test]
    fn test_register_custom_variant() {
        let mut registries = Registries::default();
        let previous = registries.bsdfs.register("diffuse", bsdf::<LambertBsdf>);
        assert!(previous.is_none());
        assert!(registries.bsdfs.tags().contains(&"diffuse"));
        let diffuse = registries.bsdfs.construct("diffuse").unwrap();
        assert_eq!(diffuse.borrow().type_tag(), "lambert");
    }
}
