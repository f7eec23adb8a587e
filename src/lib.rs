pub mod config;
pub mod scene;
pub mod store;

// Numeric and color primitives shared by the scene and the textures
pub mod color;
pub mod fast_math;

pub mod render;
