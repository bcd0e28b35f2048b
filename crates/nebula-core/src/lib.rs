pub mod camera;
pub mod config;
pub mod constants;
pub mod energy;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod params;
pub mod scene;
pub mod transport;
pub mod visualizer;

pub use camera::*;
pub use config::*;
pub use constants::*;
pub use energy::*;
pub use error::*;
pub use frame::*;
pub use host::*;
pub use params::*;
pub use scene::*;
pub use transport::*;
pub use visualizer::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
