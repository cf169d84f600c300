use chamber_camera::CameraMovement;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Movement keys currently held down.
///
/// Key events only flip state here; movement is applied once per frame from
/// [`MovementKeys::held`] so speed scales with frame time, not key repeat.
#[derive(Debug, Clone, Default)]
pub struct MovementKeys {
    held: HashSet<KeyCode>,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a physical key to a camera direction (WASD).
    pub fn direction(key: KeyCode) -> Option<CameraMovement> {
        match key {
            KeyCode::KeyW => Some(CameraMovement::Forward),
            KeyCode::KeyS => Some(CameraMovement::Backward),
            KeyCode::KeyA => Some(CameraMovement::Left),
            KeyCode::KeyD => Some(CameraMovement::Right),
            _ => None,
        }
    }

    /// Record a press or release. Returns `true` if the key is a movement key.
    pub fn set(&mut self, key: KeyCode, pressed: bool) -> bool {
        if Self::direction(key).is_none() {
            return false;
        }
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
        true
    }

    /// Release everything, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Directions to apply this frame, in a stable order.
    pub fn held(&self) -> impl Iterator<Item = CameraMovement> + '_ {
        [KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD]
            .into_iter()
            .filter(|key| self.held.contains(key))
            .filter_map(Self::direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_directions() {
        assert_eq!(MovementKeys::direction(KeyCode::KeyW), Some(CameraMovement::Forward));
        assert_eq!(MovementKeys::direction(KeyCode::KeyS), Some(CameraMovement::Backward));
        assert_eq!(MovementKeys::direction(KeyCode::KeyA), Some(CameraMovement::Left));
        assert_eq!(MovementKeys::direction(KeyCode::KeyD), Some(CameraMovement::Right));
        assert_eq!(MovementKeys::direction(KeyCode::Escape), None);
    }

    #[test]
    fn press_and_release() {
        let mut keys = MovementKeys::new();
        assert!(keys.set(KeyCode::KeyD, true));
        assert!(keys.set(KeyCode::KeyW, true));
        assert!(!keys.set(KeyCode::Space, true));
        let held: Vec<_> = keys.held().collect();
        assert_eq!(held, vec![CameraMovement::Forward, CameraMovement::Right]);

        keys.set(KeyCode::KeyW, false);
        let held: Vec<_> = keys.held().collect();
        assert_eq!(held, vec![CameraMovement::Right]);
    }

    #[test]
    fn clear_releases_all() {
        let mut keys = MovementKeys::new();
        keys.set(KeyCode::KeyA, true);
        keys.set(KeyCode::KeyS, true);
        keys.clear();
        assert_eq!(keys.held().count(), 0);
    }
}
