//! WebGPU rendering module
//!
//! Every frame the stack and fragments are rebuilt as flat-shaded box
//! meshes and drawn through an orthographic camera.

pub mod camera;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use camera::CameraRig;
pub use pipeline::Renderer;
pub use vertex::Vertex;
