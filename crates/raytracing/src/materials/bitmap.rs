//! Image-backed textures. A bitmap is created empty by the texture cache and
//! only decoded once `TextureCache::load_resources` runs, so loading a scene
//! document never touches image files.

use std::{
    cell::OnceCell,
    path::{Path, PathBuf},
};

use image::ImageReader;
use serde_json::Value;

use crate::{
    geometry::Vec3,
    macros::forward_name,
    scene::{json, Scene, SceneError, SceneObject},
};

use super::Texture;

pub const TYPE_TAG: &str = "bitmap";

/// How the four channels of a decoded texel are reduced to the value a
/// texture field expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexelConversion {
    Rgb,
    Average,
    Red,
    Green,
    Blue,
    Alpha,
    /// alpha if the image has an alpha channel, otherwise the channel average
    Auto,
}

impl TexelConversion {
    pub fn as_str(self) -> &'static str {
        match self {
            TexelConversion::Rgb => "rgb",
            TexelConversion::Average => "average",
            TexelConversion::Red => "red",
            TexelConversion::Green => "green",
            TexelConversion::Blue => "blue",
            TexelConversion::Alpha => "alpha",
            TexelConversion::Auto => "auto",
        }
    }

    fn convert(self, [r, g, b, a]: [f32; 4], has_alpha: bool) -> Vec3 {
        let average = (r + g + b) / 3.0;
        match self {
            TexelConversion::Rgb => Vec3(r, g, b),
            TexelConversion::Average => Vec3::splat(average),
            TexelConversion::Red => Vec3::splat(r),
            TexelConversion::Green => Vec3::splat(g),
            TexelConversion::Blue => Vec3::splat(b),
            TexelConversion::Alpha => Vec3::splat(a),
            TexelConversion::Auto if has_alpha => Vec3::splat(a),
            TexelConversion::Auto => Vec3::splat(average),
        }
    }
}

#[derive(Debug)]
struct Texels {
    width: u32,
    height: u32,
    data: Vec<Vec3>,
}

#[derive(Debug)]
pub struct BitmapTexture {
    pub name: String,
    path: PathBuf,
    conversion: TexelConversion,
    texels: OnceCell<Texels>,
}

impl BitmapTexture {
    pub fn new(path: &Path, conversion: TexelConversion) -> Self {
        BitmapTexture {
            name: String::new(),
            path: path.to_path_buf(),
            conversion,
            texels: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn conversion(&self) -> TexelConversion {
        self.conversion
    }

    pub fn is_loaded(&self) -> bool {
        self.texels.get().is_some()
    }

    /// Width and height in texels, once loaded
    pub fn size(&self) -> Option<(u32, u32)> {
        self.texels.get().map(|t| (t.width, t.height))
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<Vec3> {
        let texels = self.texels.get()?;
        if x >= texels.width || y >= texels.height {
            return None;
        }
        texels.data.get((y * texels.width + x) as usize).copied()
    }

    /// Decodes the image file; does nothing if that already happened
    pub fn load(&self) -> Result<(), SceneError> {
        if self.is_loaded() {
            return Ok(());
        }

        let image = ImageReader::open(&self.path)
            .map_err(|source| SceneError::Io {
                path: self.path.clone(),
                source,
            })?
            .decode()
            .map_err(|source| SceneError::Image {
                path: self.path.clone(),
                source,
            })?;

        let has_alpha = image.color().has_alpha();
        let rgba = image.into_rgba32f();
        let data = rgba
            .pixels()
            .map(|texel| self.conversion.convert(texel.0, has_alpha))
            .collect();

        // ignoring the error is fine: it only means the cell was filled already
        let _ = self.texels.set(Texels {
            width: rgba.width(),
            height: rgba.height(),
            data,
        });
        Ok(())
    }
}

impl SceneObject for BitmapTexture {
    fn type_tag(&self) -> &'static str {
        TYPE_TAG
    }

    forward_name!(name);

    fn from_json(&mut self, value: &Value, scene: &Scene) -> Result<(), SceneError> {
        json::read(value, "name", &mut self.name)?;
        let path: String = json::required(value, "path")?;
        self.path = scene.resolve_asset(&path);
        Ok(())
    }

    fn to_json(&self, scene: &Scene) -> Value {
        let mut v = json::header(self.type_tag(), &self.name);
        v.insert("path".into(), Value::from(scene.relative_asset(&self.path)));
        Value::Object(v)
    }
}

impl Texture for BitmapTexture {
    // zero until loaded
    fn average(&self) -> Vec3 {
        let Some(texels) = self.texels.get() else {
            return Vec3::zero();
        };
        if texels.data.is_empty() {
            return Vec3::zero();
        }

        let mut sum = Vec3::zero();
        for &texel in &texels.data {
            sum += texel;
        }
        sum / texels.data.len() as f32
    }
}
