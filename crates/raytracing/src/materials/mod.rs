mod bitmap;
mod bsdf;
mod texture;
mod texture_cache;

pub use bitmap::BitmapTexture;
pub use bitmap::TexelConversion;
pub use bitmap::TYPE_TAG as BITMAP_TYPE_TAG;
pub use bsdf::*;
pub use texture::BladeTexture;
pub use texture::CheckerTexture;
pub use texture::ConstantTexture;
pub use texture::DiskTexture;
pub use texture::SharedTexture;
pub use texture::Texture;
pub use texture_cache::TextureCache;
