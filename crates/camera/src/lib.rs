//! Free-fly camera controller for the chamber scene.
//!
//! Turns mouse offsets, held movement keys and scroll steps into a camera
//! orientation, position and zoom, and produces view/projection matrices.
//!
//! # Invariants
//! - `front`, `right` and `up` always form an orthonormal right-handed basis
//!   derived from yaw/pitch.
//! - Pitch stays within [-89°, 89°]; zoom stays within [1°, 45°].
//! - Position is unconstrained (no collision).

mod camera;

pub use camera::{Camera, CameraMovement, FAR_PLANE, MAX_ZOOM, MIN_ZOOM, NEAR_PLANE, PITCH_LIMIT};
