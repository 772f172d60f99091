use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use seaside_assets::{ModelLoader, ModelSource};
use seaside_input::{Action, PointerButton};
use seaside_render_wgpu::SceneRenderer;
use seaside_scene::{Clock, SceneState, Viewport};
use seaside_tweak::TweakPanel;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixel scroll deltas (touchpads) per wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Parser)]
#[command(name = "seaside-desktop", about = "Animated ocean with a floating beach ball")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// glTF or GLB model to float on the water
    #[arg(long, default_value = "assets/beach_ball_free_download.glb")]
    model: PathBuf,

    /// Use the generated beach ball instead of loading a file
    #[arg(long)]
    procedural_ball: bool,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Start with the tweak panel expanded
    #[arg(long)]
    show_tweaks: bool,
}

/// Everything that exists only once the window and device are up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        egui_ctx: &EguiContext,
        size: LogicalSize<u32>,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Seaside")
            .with_inner_size(size)
            .with_transparent(true);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("seaside_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let physical = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: physical.width.max(1),
            height: physical.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: pick_alpha_mode(&caps.alpha_modes),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let viewport = viewport_of(&window, physical);
        let (dw, dh) = viewport.drawable_size();
        let renderer = SceneRenderer::new(&device, &queue, surface_format, dw, dh);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            alpha_mode = ?config.alpha_mode,
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    /// Reconfigure the surface to the window's physical size.
    fn resize(&mut self, physical: PhysicalSize<u32>) -> Viewport {
        self.config.width = physical.width.max(1);
        self.config.height = physical.height.max(1);
        self.surface.configure(&self.device, &self.config);
        let viewport = viewport_of(&self.window, physical);
        let (dw, dh) = viewport.drawable_size();
        self.renderer.resize(&self.device, dw, dh);
        viewport
    }

    /// Draw the egui output on top of the already-blitted scene.
    fn paint_ui(&mut self, view: &wgpu::TextureView, full_output: egui::FullOutput, egui_ctx: &EguiContext) {
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn viewport_of(window: &Window, physical: PhysicalSize<u32>) -> Viewport {
    Viewport::from_physical(physical.width, physical.height, window.scale_factor())
}

/// Prefer an alpha mode that lets the transparent clear show through.
fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
    ]
    .into_iter()
    .find(|m| modes.contains(m))
    .or_else(|| modes.first().copied())
    .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn key_action(key: KeyCode) -> Action {
    match key {
        KeyCode::F1 => Action::ToggleTweakPanel,
        _ => Action::Noop,
    }
}

/// Wheel delta in lines; positive zooms in.
fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
    }
}

struct SeasideApp {
    scene: SceneState,
    clock: Clock,
    tweak: TweakPanel,
    loader: Option<ModelLoader>,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
    window_size: LogicalSize<u32>,
    drag: Option<PointerButton>,
    cursor: Option<LogicalPosition<f32>>,
}

impl SeasideApp {
    fn new(cli: &Cli) -> Self {
        let window_size = LogicalSize::new(cli.width.max(1), cli.height.max(1));
        let mut scene = SceneState::new(Viewport::new(
            window_size.width as f32,
            window_size.height as f32,
            1.0,
        ));

        let source = if cli.procedural_ball {
            ModelSource::ProceduralBall
        } else {
            ModelSource::File(cli.model.clone())
        };
        let loader = match ModelLoader::spawn(source) {
            Ok(loader) => Some(loader),
            Err(e) => {
                scene.model_failed(e.to_string());
                None
            }
        };

        Self {
            scene,
            clock: Clock::start(),
            tweak: TweakPanel::new().expanded(cli.show_tweaks),
            loader,
            egui_ctx: EguiContext::default(),
            gpu: None,
            window_size,
            drag: None,
            cursor: None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::ToggleTweakPanel => self.tweak.toggle_visible(),
            Action::Noop => {}
            camera => {
                if !self.scene.apply(&camera) {
                    tracing::trace!(?camera, "camera input ignored");
                }
            }
        }
    }

    fn cursor_moved(&mut self, position: LogicalPosition<f32>) {
        if let (Some(button), Some(last)) = (self.drag, self.cursor) {
            let height = self.scene.viewport().height;
            self.handle_action(Action::drag(
                button,
                position.x - last.x,
                position.y - last.y,
                height,
            ));
        }
        self.cursor = Some(position);
    }

    /// Hand a finished model to the renderer and the scene. The loader is
    /// dropped once it has delivered.
    fn poll_model(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let Some(result) = self.loader.as_mut().and_then(ModelLoader::poll) else {
            return;
        };
        self.loader = None;
        match result {
            Ok(model) => {
                gpu.renderer.set_model(&gpu.device, &gpu.queue, &model);
                self.scene.model_loaded();
            }
            Err(e) => self.scene.model_failed(e.to_string()),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_model();
        let report = self.scene.advance(self.clock.elapsed_secs());
        if report.intro_finished {
            tracing::info!(frame = report.frame, "intro finished, orbit controls enabled");
        }

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                tracing::warn!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &self.scene);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let mut outcome = None;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            outcome = Some(self.tweak.show(ctx, &mut self.scene.params));
        });
        if let Some(outcome) = outcome.filter(|o| !o.is_empty()) {
            tracing::debug!(
                edited = ?outcome.edited,
                rejected = outcome.rejected.len(),
                colors_changed = outcome.colors_changed,
                "wave parameters tweaked"
            );
        }
        gpu.paint_ui(&view, full_output, &self.egui_ctx);

        output.present();
    }
}

impl ApplicationHandler for SeasideApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx, self.window_size) {
            Ok(gpu) => {
                self.scene.resize(viewport_of(&gpu.window, gpu.window.inner_size()));
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
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
        if let WindowEvent::MouseInput {
            state: ElementState::Released,
            ..
        } = event
        {
            self.drag = None;
        }
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical) => {
                if let Some(gpu) = &mut self.gpu {
                    let viewport = gpu.resize(physical);
                    self.scene.resize(viewport);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.handle_action(key_action(key));
            }
            WindowEvent::MouseInput {
                button,
                state: ElementState::Pressed,
                ..
            } => {
                if let Some(button) = pointer_button(button) {
                    self.drag = Some(button);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self
                    .gpu
                    .as_ref()
                    .map_or(1.0, |gpu| gpu.window.scale_factor());
                self.cursor_moved(position.to_logical(scale));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_action(Action::Zoom(scroll_lines(delta)));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("seaside-desktop starting");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SeasideApp::new(&cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn drag_buttons_map_to_orbit_and_pan() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(MouseButton::Middle), None);
    }

    #[test]
    fn f1_toggles_the_panel() {
        assert_eq!(key_action(KeyCode::F1), Action::ToggleTweakPanel);
        assert_eq!(key_action(KeyCode::KeyW), Action::Noop);
    }

    #[test]
    fn pixel_scroll_is_scaled_to_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let lines = scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0)));
        assert!((lines - 2.0).abs() < 1e-6);
    }

    #[test]
    fn alpha_mode_prefers_premultiplied() {
        use wgpu::CompositeAlphaMode as M;
        assert_eq!(pick_alpha_mode(&[M::Opaque, M::PreMultiplied]), M::PreMultiplied);
        assert_eq!(pick_alpha_mode(&[M::Opaque, M::PostMultiplied]), M::PostMultiplied);
        assert_eq!(pick_alpha_mode(&[M::Opaque]), M::Opaque);
        assert_eq!(pick_alpha_mode(&[]), M::Auto);
    }

    #[test]
    fn camera_input_waits_for_the_intro() {
        let cli = Cli::parse_from(["seaside-desktop", "--procedural-ball"]);
        let mut app = SeasideApp::new(&cli);
        app.drag = Some(PointerButton::Primary);
        app.cursor_moved(LogicalPosition::new(10.0, 10.0));
        app.cursor_moved(LogicalPosition::new(60.0, 10.0));
        assert!(!app.scene.apply(&Action::Zoom(1.0)));
        app.handle_action(Action::ToggleTweakPanel);
        assert!(!app.tweak.is_visible());
    }
}
