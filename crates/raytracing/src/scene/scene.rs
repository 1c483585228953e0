use std::{
    cell::Cell,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    geometry::Vec3,
    materials::{
        ConstantTexture, SharedBsdf, SharedTexture, TexelConversion, TextureCache,
        BITMAP_TYPE_TAG,
    },
    media::SharedMedium,
    renderer::{PathTraceIntegrator, SharedIntegrator},
    settings::RendererSettings,
};

use super::{
    camera::{PinholeCamera, SharedCamera},
    json::{self, FromJson},
    naming::add_unique,
    object::{shared, SceneObject, Shared},
    primitive::SharedPrimitive,
    registry::{Registries, Registry},
    SceneError,
};

/// The object graph described by one scene document: media, materials and
/// primitives in insertion order, plus the camera, integrator and render
/// settings. Materials are shared by primitives and media by materials; all
/// of them are owned through `Shared` handles.
#[derive(Debug)]
pub struct Scene {
    // directory relative asset paths are resolved against
    src_dir: PathBuf,
    path: PathBuf,
    texture_cache: Rc<TextureCache>,
    registries: Registries,
    // while a material is being written, only materials before this index
    // may be referred to by name
    bsdf_limit: Cell<Option<usize>>,

    media: Vec<SharedMedium>,
    bsdfs: Vec<SharedBsdf>,
    primitives: Vec<SharedPrimitive>,
    camera: SharedCamera,
    integrator: SharedIntegrator,
    renderer_settings: RendererSettings,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Scene::with_source("", None)
    }

    /// Empty scene whose assets live in `src_dir`. Without a cache the scene
    /// gets one of its own
    pub fn with_source(src_dir: impl Into<PathBuf>, texture_cache: Option<Rc<TextureCache>>) -> Self {
        Scene {
            src_dir: src_dir.into(),
            path: PathBuf::new(),
            texture_cache: texture_cache.unwrap_or_default(),
            registries: Registries::default(),
            bsdf_limit: Cell::new(None),
            media: Vec::new(),
            bsdfs: Vec::new(),
            primitives: Vec::new(),
            camera: shared(PinholeCamera::default()),
            integrator: shared(PathTraceIntegrator::default()),
            renderer_settings: RendererSettings::default(),
        }
    }

    /// Reads the document at `path`. Relative asset paths in it are taken
    /// relative to the document's directory
    pub fn load(path: impl AsRef<Path>, texture_cache: Option<Rc<TextureCache>>) -> Result<Scene, SceneError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let src_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut scene = Scene::from_document(&text, src_dir, texture_cache)?;
        scene.path = path.to_path_buf();

        info!(
            "loaded scene '{}': {} media, {} bsdfs, {} primitives",
            path.display(),
            scene.media.len(),
            scene.bsdfs.len(),
            scene.primitives.len()
        );
        Ok(scene)
    }

    pub fn from_document(
        text: &str,
        src_dir: impl Into<PathBuf>,
        texture_cache: Option<Rc<TextureCache>>,
    ) -> Result<Scene, SceneError> {
        let document: Value = serde_json::from_str(text).map_err(SceneError::parse)?;
        let mut scene = Scene::with_source(src_dir, texture_cache);
        scene.from_json(&document)?;
        Ok(scene)
    }

    /// Writes the scene as a pretty-printed document. Asset paths are written
    /// relative to the source directory
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let io_error = |source: io::Error| SceneError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, &self.to_json()).map_err(|e| io_error(e.into()))?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)?;

        debug!("saved scene to '{}'", path.display());
        Ok(())
    }

    /// Appends the objects described by `root`. Media come first, then
    /// materials, then primitives, so that each may refer by name to objects
    /// of the earlier lists
    pub fn from_json(&mut self, root: &Value) -> Result<(), SceneError> {
        if !root.is_object() {
            return Err(SceneError::invalid("document", "an object"));
        }

        for node in object_list(root, "media")? {
            let medium = self.instantiate_medium(json::type_tag(node)?, node)?;
            self.media.push(medium);
        }
        for node in object_list(root, "bsdfs")? {
            let bsdf = self.instantiate_bsdf(json::type_tag(node)?, node)?;
            self.bsdfs.push(bsdf);
        }
        for node in object_list(root, "primitives")? {
            let primitive = self.instantiate_primitive(json::type_tag(node)?, node)?;
            self.primitives.push(primitive);
        }

        if let Some(node) = object_member(root, "camera")? {
            self.camera = self.instantiate_camera(json::type_tag(node)?, node)?;
        }
        if let Some(node) = object_member(root, "integrator")? {
            self.integrator = self.instantiate_integrator(json::type_tag(node)?, node)?;
        }
        if let Some(node) = object_member(root, "renderer")? {
            self.renderer_settings.from_json(node)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        root.insert("media".into(), self.list_to_json(&self.media));
        root.insert("bsdfs".into(), self.bsdfs_to_json());
        root.insert("primitives".into(), self.list_to_json(&self.primitives));
        root.insert("camera".into(), self.camera.borrow().to_json(self));
        root.insert("integrator".into(), self.integrator.borrow().to_json(self));
        root.insert("renderer".into(), self.renderer_settings.to_json());
        Value::Object(root)
    }

    /// A material is loaded before any material after it, so references
    /// between materials are written by name only when they point backwards
    fn bsdfs_to_json(&self) -> Value {
        let bsdfs = self
            .bsdfs
            .iter()
            .enumerate()
            .map(|(i, bsdf)| {
                self.bsdf_limit.set(Some(i));
                bsdf.borrow().to_json(self)
            })
            .collect();
        self.bsdf_limit.set(None);
        Value::Array(bsdfs)
    }

    fn list_to_json<T: ?Sized + SceneObject>(&self, list: &[Shared<T>]) -> Value {
        Value::Array(list.iter().map(|object| object.borrow().to_json(self)).collect())
    }

    /// Adds `primitive` and, if it was not part of the scene yet, its
    /// material. Returns whether `primitive` was added
    pub fn add_primitive(&mut self, primitive: &SharedPrimitive) -> bool {
        if !add_unique(primitive, &mut self.primitives) {
            return false;
        }
        let bsdf = primitive.borrow().bsdf();
        self.add_bsdf(&bsdf);
        true
    }

    /// Adds `bsdf` and, if it was not part of the scene yet, the media on
    /// either side of it
    pub fn add_bsdf(&mut self, bsdf: &SharedBsdf) -> bool {
        if !add_unique(bsdf, &mut self.bsdfs) {
            return false;
        }
        let media = {
            let bsdf = bsdf.borrow();
            [bsdf.int_medium(), bsdf.ext_medium()]
        };
        for medium in media.into_iter().flatten() {
            self.add_medium(&medium);
        }
        true
    }

    pub fn add_medium(&mut self, medium: &SharedMedium) -> bool {
        add_unique(medium, &mut self.media)
    }

    /// Moves the primitives of `other`, with their materials and media, into
    /// this scene. Anything `other` holds that no primitive uses is dropped
    pub fn merge(&mut self, other: Scene) {
        for primitive in &other.primitives {
            self.add_primitive(primitive);
        }
    }

    /// Removes the given primitives, matched by identity. Materials and media
    /// they used stay in the scene even if nothing references them anymore
    pub fn delete_primitives(&mut self, primitives: &[SharedPrimitive]) {
        let before = self.primitives.len();
        self.primitives
            .retain(|kept| !primitives.iter().any(|deleted| Rc::ptr_eq(kept, deleted)));
        debug!("deleted {} primitives", before - self.primitives.len());
    }

    pub fn find_primitive(&self, name: &str) -> Option<SharedPrimitive> {
        find_object(&self.primitives, name)
    }

    pub fn find_bsdf(&self, name: &str) -> Option<SharedBsdf> {
        find_object(&self.bsdfs, name)
    }

    pub fn find_medium(&self, name: &str) -> Option<SharedMedium> {
        find_object(&self.media, name)
    }

    pub fn instantiate_primitive(&self, tag: &str, value: &Value) -> Result<SharedPrimitive, SceneError> {
        self.registries.primitives.instantiate(tag, value, self)
    }

    pub fn instantiate_bsdf(&self, tag: &str, value: &Value) -> Result<SharedBsdf, SceneError> {
        self.registries.bsdfs.instantiate(tag, value, self)
    }

    pub fn instantiate_medium(&self, tag: &str, value: &Value) -> Result<SharedMedium, SceneError> {
        self.registries.media.instantiate(tag, value, self)
    }

    pub fn instantiate_camera(&self, tag: &str, value: &Value) -> Result<SharedCamera, SceneError> {
        self.registries.cameras.instantiate(tag, value, self)
    }

    pub fn instantiate_integrator(&self, tag: &str, value: &Value) -> Result<SharedIntegrator, SceneError> {
        self.registries.integrators.instantiate(tag, value, self)
    }

    /// Bitmaps are handed out by the texture cache, keyed by file and
    /// `conversion`; every other tag is constructed fresh
    pub fn instantiate_texture(
        &self,
        tag: &str,
        value: &Value,
        conversion: TexelConversion,
    ) -> Result<SharedTexture, SceneError> {
        if tag == BITMAP_TYPE_TAG {
            let path: String = json::required(value, "path")?;
            return Ok(self.texture_cache.fetch_texture(&self.resolve_asset(&path), conversion));
        }
        self.registries.textures.instantiate(tag, value, self)
    }

    /// Resolves a material field: a name refers to a material already in the
    /// scene, an object defines a new one inline
    pub fn fetch_bsdf(&self, value: &Value) -> Result<SharedBsdf, SceneError> {
        self.fetch_object(&self.bsdfs, &self.registries.bsdfs, value)
    }

    pub fn fetch_medium(&self, value: &Value) -> Result<SharedMedium, SceneError> {
        self.fetch_object(&self.media, &self.registries.media, value)
    }

    fn fetch_object<T: ?Sized + SceneObject>(
        &self,
        list: &[Shared<T>],
        registry: &Registry<T>,
        value: &Value,
    ) -> Result<Shared<T>, SceneError> {
        match value {
            Value::String(name) => find_object(list, name).ok_or_else(|| SceneError::MissingReference {
                family: registry.family(),
                name: name.clone(),
            }),
            Value::Object(_) => registry.instantiate(json::type_tag(value)?, value, self),
            _ => Err(SceneError::InvalidValue {
                field: registry.family().to_string(),
                expected: "a name or an object",
            }),
        }
    }

    /// Resolves a texture field. Besides objects, a number or a 3-array is a
    /// constant texture and a string is the path of a bitmap
    pub fn fetch_texture(&self, value: &Value, conversion: TexelConversion) -> Result<SharedTexture, SceneError> {
        match value {
            Value::String(path) => Ok(self.texture_cache.fetch_texture(&self.resolve_asset(path), conversion)),
            Value::Number(_) | Value::Array(_) => {
                let constant = Vec3::from_json(value)
                    .ok_or_else(|| SceneError::invalid("texture", Vec3::EXPECTED))?;
                Ok(shared(ConstantTexture::new(constant)))
            }
            Value::Object(_) => self.instantiate_texture(json::type_tag(value)?, value, conversion),
            _ => Err(SceneError::invalid(
                "texture",
                "a number, an array of 3 numbers, a path or an object",
            )),
        }
    }

    /// `fetch_texture` on `value[field]`, or `None` if the field is absent
    pub fn texture_from_member(
        &self,
        value: &Value,
        field: &str,
        conversion: TexelConversion,
    ) -> Result<Option<SharedTexture>, SceneError> {
        value
            .get(field)
            .map(|node| self.fetch_texture(node, conversion))
            .transpose()
    }

    /// How a material field is written: by name if the material is named and
    /// part of this scene, inline otherwise. Inside another material the name
    /// is only used for materials listed before that one
    pub fn bsdf_reference(&self, bsdf: &SharedBsdf) -> Value {
        self.reference(&self.bsdfs, bsdf, self.bsdf_limit.get())
    }

    pub fn medium_reference(&self, medium: &SharedMedium) -> Value {
        self.reference(&self.media, medium, None)
    }

    fn reference<T: ?Sized + SceneObject>(
        &self,
        list: &[Shared<T>],
        object: &Shared<T>,
        limit: Option<usize>,
    ) -> Value {
        let borrowed = object.borrow();
        let position = list.iter().position(|member| Rc::ptr_eq(member, object));
        let visible = match (position, limit) {
            (Some(i), Some(limit)) => i < limit,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if !borrowed.name().is_empty() && visible {
            Value::from(borrowed.name())
        } else {
            borrowed.to_json(self)
        }
    }

    pub fn resolve_asset(&self, path: &str) -> PathBuf {
        self.src_dir.join(path)
    }

    /// Inverse of `resolve_asset`; paths outside the source directory are
    /// kept as they are
    pub fn relative_asset(&self, path: &Path) -> String {
        path.strip_prefix(&self.src_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    pub fn primitives(&self) -> &[SharedPrimitive] {
        &self.primitives
    }

    pub fn bsdfs(&self) -> &[SharedBsdf] {
        &self.bsdfs
    }

    pub fn media(&self) -> &[SharedMedium] {
        &self.media
    }

    pub fn camera(&self) -> &SharedCamera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: SharedCamera) {
        self.camera = camera;
    }

    pub fn integrator(&self) -> &SharedIntegrator {
        &self.integrator
    }

    pub fn set_integrator(&mut self, integrator: SharedIntegrator) {
        self.integrator = integrator;
    }

    pub fn renderer_settings(&self) -> &RendererSettings {
        &self.renderer_settings
    }

    pub fn renderer_settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.renderer_settings
    }

    pub fn texture_cache(&self) -> &Rc<TextureCache> {
        &self.texture_cache
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// For registering additional variants before calling `from_json`
    pub fn registries_mut(&mut self) -> &mut Registries {
        &mut self.registries
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Moves the base of relative asset paths, e.g. before saving the scene
    /// into another directory. Already resolved paths are not touched
    pub fn set_src_dir(&mut self, src_dir: impl Into<PathBuf>) {
        self.src_dir = src_dir.into();
    }

    /// File the scene was loaded from; empty for scenes built in memory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn find_object<T: ?Sized + SceneObject>(list: &[Shared<T>], name: &str) -> Option<Shared<T>> {
    list.iter()
        .find(|object| object.borrow().name() == name)
        .map(Rc::clone)
}

/// Elements of the array `root[field]` that are objects. Anything else in
/// the array is skipped with a warning
fn object_list<'a>(root: &'a Value, field: &'a str) -> Result<impl Iterator<Item = &'a Value>, SceneError> {
    let elements = match root.get(field) {
        None => &[][..],
        Some(Value::Array(elements)) => elements.as_slice(),
        Some(_) => return Err(SceneError::invalid(field, "an array of objects")),
    };

    Ok(elements.iter().enumerate().filter_map(move |(i, node)| {
        if node.is_object() {
            Some(node)
        } else {
            warn!("skipping element {i} of '{field}': not an object");
            None
        }
    }))
}

fn object_member<'a>(root: &'a Value, field: &str) -> Result<Option<&'a Value>, SceneError> {
    match root.get(field) {
        None => Ok(None),
        Some(node) if node.is_object() => Ok(Some(node)),
        Some(_) => Err(SceneError::invalid(field, "an object")),
    }
}
