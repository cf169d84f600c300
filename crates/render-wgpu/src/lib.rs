//! wgpu render backend for the chamber scene.
//!
//! Draws every instance of the scene table with the lit pipeline, then the
//! light marker with the unlit pipeline. All instances share one cube vertex
//! buffer; each is its own draw call.
//!
//! # Invariants
//! - The renderer never mutates camera or scene state.
//! - GPU resources are created once and live as long as the renderer.

mod context;
mod gpu;
mod shaders;
mod textures;

pub use context::{GpuContext, RenderError};
pub use gpu::ChamberRenderer;
pub use textures::GpuTextures;
