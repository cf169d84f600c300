mod session;

use anyhow::{Context, Result};
use chamber_assets::TextureSet;
use chamber_render_wgpu::{ChamberRenderer, GpuContext, GpuTextures};
use clap::Parser;
use egui::Context as EguiContext;
use session::{Control, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

const WINDOW_TITLE: &str = "Torture Chamber";
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

#[derive(Parser)]
#[command(name = "chamber-desktop", about = "Fly through the torture chamber")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing the scene textures
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Start with the debug overlay hidden (F1 toggles it)
    #[arg(long)]
    no_hud: bool,
}

/// How mouse look is fed: absolute cursor positions when the cursor is
/// confined, raw motion when the platform can only lock it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookSource {
    Cursor,
    Motion,
}

/// Everything that exists only once a window does.
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: ChamberRenderer,
    slots: Vec<(&'static str, bool)>,
    look: LookSource,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    session: Session,
    asset_dir: PathBuf,
    graphics: Option<Graphics>,
    egui_ctx: EguiContext,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(asset_dir: PathBuf, show_hud: bool) -> Self {
        Self {
            session: Session::new(show_hud),
            asset_dir,
            graphics: None,
            egui_ctx: EguiContext::default(),
            fatal: None,
        }
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialize GPU")?;

        let mut textures = TextureSet::load(&self.asset_dir);
        tracing::info!(
            "{}/{} textures loaded from {}",
            textures.loaded_count(),
            textures.len(),
            self.asset_dir.display()
        );
        let gpu_textures = GpuTextures::upload(&gpu.device, &gpu.queue, &textures);
        textures.release_pixels();
        let slots = textures
            .slots()
            .iter()
            .map(|slot| (slot.file, slot.is_loaded()))
            .collect();

        let renderer = ChamberRenderer::new(
            &gpu.device,
            gpu.surface_format(),
            gpu.config.width,
            gpu.config.height,
            gpu_textures,
        );

        let look = grab_cursor(&window);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.surface_format(), None, 1, false);

        tracing::info!("GPU initialized with {} backend", gpu.backend().to_str());

        Ok(Graphics {
            window,
            gpu,
            renderer,
            slots,
            look,
            egui_winit,
            egui_renderer,
        })
    }

    /// The outcome of the event loop: the startup error that stopped it, if
    /// any. That error is reported by `main` alone.
    fn into_result(self) -> Result<()> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn redraw(&mut self) {
        let frame = self.session.begin_frame();
        let Some(gfx) = &mut self.graphics else {
            return;
        };

        let Some(output) = gfx.gpu.current_frame() else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gfx.renderer.render(
            &gfx.gpu.device,
            &gfx.gpu.queue,
            &view,
            &self.session.camera,
            gfx.gpu.aspect(),
            frame.elapsed,
        );

        draw_overlay(gfx, &self.egui_ctx, &self.session, &view);

        output.present();
        gfx.window.request_redraw();
    }
}

/// Hide the cursor and keep it inside the window. Confinement keeps cursor
/// positions flowing; platforms that only support locking get raw motion.
fn grab_cursor(window: &Window) -> LookSource {
    window.set_cursor_visible(false);
    match window.set_cursor_grab(CursorGrabMode::Confined) {
        Ok(()) => LookSource::Cursor,
        Err(confine_err) => match window.set_cursor_grab(CursorGrabMode::Locked) {
            Ok(()) => {
                tracing::debug!("cursor confinement unavailable ({confine_err}), locked instead");
                LookSource::Motion
            }
            Err(lock_err) => {
                tracing::warn!("failed to grab cursor: {lock_err}");
                LookSource::Cursor
            }
        },
    }
}

/// Feed egui its input and run the HUD every frame so queued window events
/// are drained even while the overlay is hidden. Only the paint pass is
/// skipped when `show_hud` is off; texture updates are always applied.
fn draw_overlay(
    gfx: &mut Graphics,
    egui_ctx: &EguiContext,
    session: &Session,
    view: &wgpu::TextureView,
) {
    let raw_input = gfx.egui_winit.take_egui_input(&gfx.window);
    let full_output = egui_ctx.run(raw_input, |ctx| {
        session.draw_hud(ctx, &gfx.slots);
    });
    gfx.egui_winit.handle_platform_output(&gfx.window, full_output.platform_output);

    let device = &gfx.gpu.device;
    let queue = &gfx.gpu.queue;
    for (id, image_delta) in &full_output.textures_delta.set {
        gfx.egui_renderer.update_texture(device, queue, *id, image_delta);
    }

    if session.show_hud {
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gfx.gpu.config.width, gfx.gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        let user_buffers = gfx.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gfx.egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(user_buffers.into_iter().chain(std::iter::once(encoder.finish())));
    }

    for id in &full_output.textures_delta.free {
        gfx.egui_renderer.free_texture(id);
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match self.init_graphics(event_loop) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
            }
            Err(e) => {
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gfx) = &mut self.graphics else {
            return;
        };
        // The overlay is read-only, so egui never swallows scene input.
        let _ = gfx.egui_winit.on_window_event(&gfx.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gfx.gpu.resize(new_size.width, new_size.height);
                gfx.renderer
                    .resize(&gfx.gpu.device, gfx.gpu.config.width, gfx.gpu.config.height);
            }
            WindowEvent::Focused(focused) => {
                self.session.focus_changed(focused);
                if focused {
                    gfx.look = grab_cursor(&gfx.window);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if self.session.handle_key(key, pressed) == Control::Exit {
                    tracing::info!("exit requested");
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if gfx.look == LookSource::Cursor {
                    self.session.handle_cursor(position.x, position.y);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.session.handle_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        let Some(gfx) = &self.graphics else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            if gfx.look == LookSource::Motion {
                self.session.handle_motion(delta.0, delta.1);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gfx) = &self.graphics {
            gfx.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("chamber-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli.assets, !cli.no_hud);
    event_loop.run_app(&mut app)?;

    app.into_result()?;
    tracing::info!("chamber-desktop exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_shutdown_is_ok() {
        let app = GpuApp::new(PathBuf::from("."), true);
        assert!(app.into_result().is_ok());
    }

    #[test]
    fn startup_failure_is_returned_with_context() {
        let mut app = GpuApp::new(PathBuf::from("."), false);
        app.fatal = Some(anyhow::anyhow!("no adapter").context("failed to initialize GPU"));
        let err = app.into_result().unwrap_err();
        assert_eq!(err.to_string(), "failed to initialize GPU");
        assert_eq!(format!("{err:#}"), "failed to initialize GPU: no adapter");
    }
}
