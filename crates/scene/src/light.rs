use crate::instance::FrameInstance;
use crate::slot;
use glam::{Mat4, Vec3};

/// Warm torch light.
pub const LIGHT_COLOR: Vec3 = Vec3::new(1.0, 0.68, 0.26);
/// Flat base color added under the lit texture.
pub const OBJECT_COLOR: Vec3 = Vec3::new(0.01, 0.01, 0.01);
pub const CLEAR_COLOR: [f64; 4] = [0.1, 0.1, 0.1, 1.0];

const MARKER_SCALE: f32 = 0.2;
const MARKER_SPIN_RATE: f32 = 6.0;

/// Point light position at elapsed time `t`: an ellipse at fixed height
/// above the table.
pub fn light_position(t: f32) -> Vec3 {
    Vec3::new(2.0 * t.sin(), 2.0, 3.0 + 2.5 * t.cos())
}

/// The small sun-textured cube drawn at the light's position.
pub fn light_marker(t: f32) -> FrameInstance {
    let model = Mat4::from_translation(light_position(t))
        * Mat4::from_rotation_y(t * MARKER_SPIN_RATE)
        * Mat4::from_scale(Vec3::splat(MARKER_SCALE));
    FrameInstance {
        model,
        texture: slot::SUN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn orbit_height_is_constant() {
        for i in 0..200 {
            let t = i as f32 * 0.173;
            assert_eq!(light_position(t).y, 2.0);
        }
    }

    #[test]
    fn orbit_is_periodic() {
        for t in [0.0, 0.5, 1.0, 2.5, 4.0] {
            let a = light_position(t);
            let b = light_position(t + TAU);
            assert!(a.abs_diff_eq(b, 1e-4), "{a} vs {b}");
        }
    }

    #[test]
    fn orbit_starts_in_front_of_table() {
        assert_eq!(light_position(0.0), Vec3::new(0.0, 2.0, 5.5));
    }

    #[test]
    fn marker_sits_on_light() {
        for t in [0.0, 1.0, 3.3] {
            let marker = light_marker(t);
            assert_eq!(marker.texture, slot::SUN);
            let centre = marker.model.transform_point3(Vec3::ZERO);
            assert!(centre.abs_diff_eq(light_position(t), 1e-5));
            let corner = marker.model.transform_point3(Vec3::splat(0.5)) - centre;
            assert!((corner.length() - Vec3::splat(0.1).length()).abs() < 1e-5);
        }
    }
}
