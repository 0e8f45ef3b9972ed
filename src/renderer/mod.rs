//! WebGPU rendering module
//!
//! Builds flat-colored triangles from a [`crate::sim::Snapshot`] each frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
