pub mod geometry;
pub mod materials;
pub mod media;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod settings;

mod macros;
