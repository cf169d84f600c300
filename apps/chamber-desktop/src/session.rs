use chamber_camera::Camera;
use chamber_input::{MouseLook, MovementKeys, scroll_lines};
use chamber_scene::{FrameClock, FrameTime, light_position};
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// What the event loop should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// All mutable state the input handlers and the frame loop share.
pub struct Session {
    pub camera: Camera,
    pub show_hud: bool,
    mouse: MouseLook,
    keys: MovementKeys,
    clock: FrameClock,
    frame: FrameTime,
}

impl Session {
    pub fn new(show_hud: bool) -> Self {
        Self::with_clock(FrameClock::new(), show_hud)
    }

    pub fn with_clock(clock: FrameClock, show_hud: bool) -> Self {
        Self {
            camera: Camera::default(),
            show_hud,
            mouse: MouseLook::new(),
            keys: MovementKeys::new(),
            clock,
            frame: FrameTime {
                elapsed: 0.0,
                delta: 0.0,
            },
        }
    }

    /// Timing of the frame being drawn.
    pub fn frame(&self) -> FrameTime {
        self.frame
    }

    /// Advance the clock and apply held movement keys.
    pub fn begin_frame(&mut self) -> FrameTime {
        let frame = self.clock.tick();
        self.advance(frame);
        frame
    }

    fn advance(&mut self, frame: FrameTime) {
        for direction in self.keys.held() {
            self.camera.process_keyboard(direction, frame.delta);
        }
        self.frame = frame;
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> Control {
        if self.keys.set(key, pressed) || !pressed {
            return Control::Continue;
        }
        match key {
            KeyCode::Escape => return Control::Exit,
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
                tracing::debug!(visible = self.show_hud, "toggled hud");
            }
            _ => {}
        }
        Control::Continue
    }

    /// Absolute cursor position in window pixels.
    pub fn handle_cursor(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.mouse.offset(x, y);
        self.camera.process_mouse_movement(dx, dy);
    }

    /// Raw pointer motion, used when the cursor is locked and stops
    /// reporting positions. Motion y grows downwards.
    pub fn handle_motion(&mut self, dx: f64, dy: f64) {
        self.camera.process_mouse_movement(dx as f32, -dy as f32);
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        self.camera.process_mouse_scroll(scroll_lines(delta));
    }

    /// Re-arm the first-mouse latch whenever focus changes so the cursor
    /// jump on re-entry is ignored. Held keys are dropped on focus loss
    /// since their release events will not arrive.
    pub fn focus_changed(&mut self, focused: bool) {
        self.mouse.reset();
        if !focused {
            self.keys.clear();
        }
    }

    pub fn draw_hud(&self, ctx: &egui::Context, slots: &[(&'static str, bool)]) {
        if !self.show_hud {
            return;
        }

        let frame = self.frame();
        let cam = &self.camera;
        let light = light_position(frame.elapsed);

        egui::Window::new("Torture Chamber")
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                let fps = if frame.delta > 0.0 { 1.0 / frame.delta } else { 0.0 };
                ui.label(format!("Frame: {:.2} ms ({fps:.0} fps)", frame.delta * 1000.0));
                ui.label(format!("Time: {:.1} s", frame.elapsed));
                ui.separator();
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    cam.position.x, cam.position.y, cam.position.z
                ));
                ui.label(format!(
                    "Yaw {:.1}  Pitch {:.1}  FOV {:.1}",
                    cam.yaw(),
                    cam.pitch(),
                    cam.zoom()
                ));
                ui.label(format!("Light: ({:.2}, {:.2}, {:.2})", light.x, light.y, light.z));
                ui.separator();
                for (index, (file, loaded)) in slots.iter().enumerate() {
                    let status = if *loaded { "ok" } else { "missing" };
                    ui.label(format!("tex {index}: {file} [{status}]"));
                }
                ui.separator();
                ui.small("WASD: Move | Mouse: Look | Wheel: Zoom | F1: HUD | Esc: Quit");
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_camera::CameraMovement;
    use std::time::{Duration, Instant};

    fn session() -> Session {
        Session::new(true)
    }

    #[test]
    fn first_cursor_report_does_not_rotate() {
        let mut s = session();
        let before = s.camera.clone();
        s.handle_cursor(1917.0, -3.0);
        assert_eq!(s.camera.yaw(), before.yaw());
        assert_eq!(s.camera.pitch(), before.pitch());

        s.handle_cursor(1927.0, -13.0);
        assert!((s.camera.yaw() - (before.yaw() + 1.0)).abs() < 1e-5);
        assert!((s.camera.pitch() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn focus_change_rearms_latch() {
        let mut s = session();
        s.handle_cursor(100.0, 100.0);
        s.handle_cursor(110.0, 100.0);
        let yaw = s.camera.yaw();

        s.focus_changed(true);
        s.handle_cursor(5000.0, 5000.0);
        assert_eq!(s.camera.yaw(), yaw);
    }

    #[test]
    fn motion_up_looks_up() {
        let mut s = session();
        s.handle_motion(0.0, -20.0);
        assert!(s.camera.pitch() > 0.0);
    }

    #[test]
    fn held_keys_move_by_frame_delta() {
        let start = Instant::now();
        let mut s = Session::with_clock(FrameClock::starting_at(start), false);
        s.handle_key(KeyCode::KeyW, true);
        let front = s.camera.front();
        let origin = s.camera.position;

        s.advance(FrameTime {
            elapsed: 0.5,
            delta: 0.5,
        });
        let expected = origin + front * s.camera.movement_speed * 0.5;
        assert!(s.camera.position.abs_diff_eq(expected, 1e-5));

        let mut reference = Camera::default();
        reference.process_keyboard(CameraMovement::Forward, 0.5);
        assert!(s.camera.position.abs_diff_eq(reference.position, 1e-5));
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut s = session();
        s.handle_key(KeyCode::KeyD, true);
        s.focus_changed(false);
        let before = s.camera.position;
        s.advance(FrameTime {
            elapsed: 1.0,
            delta: 0.1,
        });
        assert_eq!(s.camera.position, before);
    }

    #[test]
    fn escape_exits_and_f1_toggles_hud() {
        let mut s = session();
        assert_eq!(s.handle_key(KeyCode::F1, true), Control::Continue);
        assert!(!s.show_hud);
        assert_eq!(s.handle_key(KeyCode::F1, false), Control::Continue);
        assert!(!s.show_hud);
        assert_eq!(s.handle_key(KeyCode::Escape, true), Control::Exit);
    }

    #[test]
    fn scroll_narrows_fov() {
        let mut s = session();
        s.handle_scroll(MouseScrollDelta::LineDelta(0.0, 5.0));
        assert_eq!(s.camera.zoom(), 40.0);
        s.handle_scroll(MouseScrollDelta::LineDelta(0.0, 500.0));
        assert_eq!(s.camera.zoom(), 1.0);
    }

    #[test]
    fn begin_frame_records_timing() {
        let start = Instant::now() - Duration::from_millis(30);
        let mut s = Session::with_clock(FrameClock::starting_at(start), false);
        let frame = s.begin_frame();
        assert!(frame.delta > 0.0 && frame.delta <= 0.1);
        assert_eq!(s.frame(), frame);
    }

    fn hud_frame(ctx: &egui::Context, s: &Session) -> egui::FullOutput {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            ..Default::default()
        };
        ctx.run(input, |ctx| s.draw_hud(ctx, &[("stone.jpg", true), ("sun.jpg", false)]))
    }

    #[test]
    fn hidden_hud_runs_every_frame_without_painting() {
        let ctx = egui::Context::default();
        let mut s = Session::new(false);
        for _ in 0..3 {
            let output = hud_frame(&ctx, &s);
            assert!(output.shapes.is_empty());
        }

        s.handle_key(KeyCode::F1, true);
        let mut shapes = 0;
        for _ in 0..3 {
            shapes = hud_frame(&ctx, &s).shapes.len();
        }
        assert!(shapes > 0);
    }
}
