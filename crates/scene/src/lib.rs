//! The chamber scene as data: one shared cube mesh, a fixed table of cube
//! instances, the orbiting point light, and the frame clock that drives them.
//!
//! # Invariants
//! - Every instance transform is a pure function of elapsed time.
//! - Nothing here touches the GPU; the renderer consumes these values.

pub mod clock;
pub mod instance;
pub mod light;
pub mod mesh;

pub use clock::{FrameClock, FrameTime};
pub use instance::{FrameInstance, InstanceDescriptor, SCENE, Spin};
pub use light::{CLEAR_COLOR, LIGHT_COLOR, OBJECT_COLOR, light_marker, light_position};
pub use mesh::{CUBE_VERTEX_COUNT, Vertex, cube_vertices};

/// Texture slot indices referenced by instances. Slot `n` is the `n`th
/// entry of the texture list loaded at startup.
pub mod slot {
    pub const STONE: u32 = 0;
    pub const BANNER: u32 = 1;
    pub const SUN: u32 = 2;
    pub const STONE_BRICK: u32 = 3;
    pub const COUNT: usize = 4;
}
