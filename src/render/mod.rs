pub mod animator;
pub mod camera;
pub mod spring;
pub mod texture;
pub mod texture_cache;

pub use camera::{CameraRig, Projected, ViewBasis};
pub use texture::{ProceduralTexture, TextureKind};
pub use texture_cache::{Disposable, TextureCache};
