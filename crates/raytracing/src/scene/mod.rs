//! Loading and saving of scene documents: the object model every scene
//! entity implements, one registry of variants per capability family, and
//! the `Scene` store that assembles them into a graph.

mod camera;
mod error;
pub mod json;
mod naming;
mod object;
mod primitive;
mod registry;
mod scene;


pub use camera::{Camera, CameraBase, PinholeCamera, SharedCamera, ThinlensCamera};
pub use error::SceneError;
pub use json::FromJson;
pub use object::{shared, Family, SceneObject, Shared};
pub use primitive::{
    Curves, Disk, InfiniteSphere, InfiniteSphereCap, Primitive, PrimitiveBase, Quad,
    SharedPrimitive, Sphere, TriangleMesh,
};
pub use registry::{Constructor, Registries, Registry};
pub use scene::Scene;
