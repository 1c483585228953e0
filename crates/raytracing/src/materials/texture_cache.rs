use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::{debug, info};

use crate::scene::{shared, SceneError, Shared};

use super::{BitmapTexture, SharedTexture, TexelConversion};

/// Hands out one bitmap texture per (file, conversion) pair, so every field
/// that names the same image with the same conversion shares a handle. A
/// cache may be shared by several scenes
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: RefCell<HashMap<(PathBuf, TexelConversion), Shared<BitmapTexture>>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_texture(&self, path: &Path, conversion: TexelConversion) -> SharedTexture {
        let mut textures = self.textures.borrow_mut();
        let bitmap = textures
            .entry((path.to_path_buf(), conversion))
            .or_insert_with(|| {
                debug!(
                    "caching texture '{}' ({})",
                    path.display(),
                    conversion.as_str()
                );
                shared(BitmapTexture::new(path, conversion))
            });

        Rc::clone(bitmap) as SharedTexture
    }

    /// Decodes every cached bitmap that is not loaded yet
    pub fn load_resources(&self) -> Result<(), SceneError> {
        let textures = self.textures.borrow();
        for bitmap in textures.values() {
            bitmap.borrow().load()?;
        }
        info!("loaded {} bitmap textures", textures.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.textures.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn assert_approx_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn test_fetch_is_memoized_per_conversion() {
        let cache = TextureCache::new();
        let path = Path::new("textures/wood.png");
        let a = cache.fetch_texture(path, TexelConversion::Rgb);
        let b = cache.fetch_texture(path, TexelConversion::Rgb);
        let c = cache.fetch_texture(path, TexelConversion::Alpha);

        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_load_resources_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.png");
        RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 128])).save(&path).unwrap();

        let cache = TextureCache::new();
        let red = cache.fetch_texture(&path, TexelConversion::Red);
        let alpha = cache.fetch_texture(&path, TexelConversion::Alpha);
        let auto = cache.fetch_texture(&path, TexelConversion::Auto);
        assert_eq!(red.borrow().average().x(), 0.0);

        cache.load_resources().unwrap();
        assert_approx_eq(red.borrow().average().x(), 1.0);
        assert_approx_eq(alpha.borrow().average().x(), 128.0 / 255.0);
        assert_approx_eq(auto.borrow().average().z(), 128.0 / 255.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TextureCache::new();
        cache.fetch_texture(&dir.path().join("absent.png"), TexelConversion::Rgb);
        assert!(matches!(cache.load_resources(), Err(SceneError::Io { .. })));
    }
}
