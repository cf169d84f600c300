use winit::event::MouseScrollDelta;

/// Touchpads report pixels; this many make one wheel notch.
const PIXELS_PER_LINE: f64 = 20.0;

/// Converts absolute cursor positions into per-event look offsets.
///
/// Holds the last seen position and a one-shot latch: until a first position
/// arrives there is no baseline, so that position is adopted and yields a
/// zero offset instead of a jump from an arbitrary starting point.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    last: Option<(f64, f64)>,
}

impl MouseLook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the baseline so the next position is treated as the first.
    pub fn reset(&mut self) {
        if self.last.take().is_some() {
            tracing::debug!("mouse look baseline reset");
        }
    }

    pub fn has_baseline(&self) -> bool {
        self.last.is_some()
    }

    /// Record a cursor position in window pixels and return the
    /// `(x_offset, y_offset)` since the previous one. Window y grows
    /// downwards, so `y_offset` is flipped to mean "up".
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        let (last_x, last_y) = self.last.replace((x, y)).unwrap_or((x, y));
        ((x - last_x) as f32, (last_y - y) as f32)
    }
}

/// Normalise a wheel event to notches, positive meaning "scroll up".
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}
