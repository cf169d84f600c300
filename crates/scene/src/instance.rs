use crate::slot;
use glam::{Mat4, Vec3};

/// Continuous rotation about a fixed axis: angle = elapsed seconds × `rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Need not be normalized.
    pub axis: Vec3,
    /// Radians per second.
    pub rate: f32,
}

/// One placement of the shared cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceDescriptor {
    pub name: &'static str,
    pub translation: Vec3,
    pub spin: Option<Spin>,
    /// Components may be negative; the lit pipeline draws both faces.
    pub scale: Vec3,
    pub texture: u32,
}

/// An instance resolved for a specific moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInstance {
    pub model: Mat4,
    pub texture: u32,
}

impl InstanceDescriptor {
    const fn fixed(name: &'static str, translation: Vec3, scale: Vec3, texture: u32) -> Self {
        Self {
            name,
            translation,
            spin: None,
            scale,
            texture,
        }
    }

    const fn spinning(translation: Vec3, axis: Vec3, rate: f32) -> Self {
        Self {
            name: "ornament",
            translation,
            spin: Some(Spin { axis, rate }),
            scale: Vec3::splat(0.1),
            texture: slot::STONE,
        }
    }

    /// Model matrix at elapsed time `t`: translate · rotate · scale.
    pub fn model_matrix(&self, t: f32) -> Mat4 {
        let rotation = match self.spin {
            Some(spin) => Mat4::from_axis_angle(spin.axis.normalize(), t * spin.rate),
            None => Mat4::IDENTITY,
        };
        Mat4::from_translation(self.translation) * rotation * Mat4::from_scale(self.scale)
    }

    pub fn at(&self, t: f32) -> FrameInstance {
        FrameInstance {
            model: self.model_matrix(t),
            texture: self.texture,
        }
    }
}

const ORBIT_AXIS: Vec3 = Vec3::new(1.0, 0.0, 1.0);
const COUNTER_AXIS: Vec3 = Vec3::new(-1.0, 0.0, -1.0);
const LEG: Vec3 = Vec3::new(0.2, -3.0, 0.2);
const SIDE_WALL: Vec3 = Vec3::new(0.1, 8.0, 10.0);
const END_WALL: Vec3 = Vec3::new(8.0, 8.0, 0.1);
const SLAB: Vec3 = Vec3::new(8.0, 0.1, 10.0);

/// Every lit object in the chamber, in draw order.
#[rustfmt::skip]
pub const SCENE: [InstanceDescriptor; 18] = [
    InstanceDescriptor::fixed("table top", Vec3::ZERO, Vec3::new(4.0, 0.1, 4.0), slot::STONE),
    InstanceDescriptor::fixed("table leg", Vec3::new(1.8, -1.5, 1.8), LEG, slot::STONE),
    InstanceDescriptor::fixed("table leg", Vec3::new(-1.8, -1.5, 1.8), LEG, slot::STONE),
    InstanceDescriptor::fixed("table leg", Vec3::new(1.8, -1.5, -1.8), LEG, slot::STONE),
    InstanceDescriptor::fixed("table leg", Vec3::new(-1.8, -1.5, -1.8), LEG, slot::STONE),
    InstanceDescriptor::fixed("back wall", Vec3::new(0.0, 1.0, -4.0), END_WALL, slot::STONE_BRICK),
    InstanceDescriptor::fixed("left wall", Vec3::new(-4.0, 1.0, 1.0), SIDE_WALL, slot::STONE_BRICK),
    InstanceDescriptor::fixed("right wall", Vec3::new(4.0, 1.0, 1.0), SIDE_WALL, slot::STONE_BRICK),
    InstanceDescriptor::fixed("floor", Vec3::new(0.0, -3.0, 1.0), SLAB, slot::STONE_BRICK),
    InstanceDescriptor::fixed("ceiling", Vec3::new(0.0, 5.0, 1.0), SLAB, slot::STONE_BRICK),
    InstanceDescriptor::fixed("front wall", Vec3::new(0.0, 1.0, 6.0), END_WALL, slot::STONE_BRICK),
    InstanceDescriptor::fixed("banner", Vec3::new(0.0, 2.0, -3.5), Vec3::new(4.0, 4.0, 0.1), slot::BANNER),
    InstanceDescriptor::spinning(Vec3::new(0.0, 2.0, 0.0), ORBIT_AXIS, 2.0),
    InstanceDescriptor::spinning(Vec3::new(0.0, 2.0, 0.0), COUNTER_AXIS, 3.0),
    InstanceDescriptor::spinning(Vec3::new(2.0, 2.0, 1.0), ORBIT_AXIS, 2.0),
    InstanceDescriptor::spinning(Vec3::new(2.0, 2.0, 1.0), COUNTER_AXIS, 3.0),
    InstanceDescriptor::spinning(Vec3::new(-2.0, 2.0, 1.0), ORBIT_AXIS, 2.0),
    InstanceDescriptor::spinning(Vec3::new(-2.0, 2.0, 1.0), COUNTER_AXIS, 3.0),
];
