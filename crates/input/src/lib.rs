//! Desktop input: raw winit events turned into camera control values.
//!
//! # Invariants
//! - The first cursor report after creation or [`MouseLook::reset`] is a
//!   baseline and produces no rotation.
//! - Input state lives in the caller's session; nothing here is global.

pub mod keys;
pub mod mouse;

pub use keys::MovementKeys;
pub use mouse::{MouseLook, scroll_lines};
