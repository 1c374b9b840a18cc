use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use rayview_camera::{FlyCamera, MoveDirection};
use rayview_common::{FrameTiming, QualitySettings, Viewport, MAX_RAY_DEPTH, MIN_RAY_DEPTH};
use rayview_input::{InputRouter, KeyQuery, PointerButton};
use rayview_render_wgpu::{RayParams, RaytraceRenderer, ShaderError, DEFAULT_SHADER};

#[derive(Parser)]
#[command(name = "rayview-desktop", about = "Interactive viewer for the rayview GPU ray tracer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// WGSL shader source to load and hot-reload; the embedded ray tracer
    /// is used when omitted
    #[arg(long)]
    shader: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

/// Maps winit's held-key set onto camera movement directions.
struct HeldKeys<'a>(&'a HashSet<KeyCode>);

impl KeyQuery for HeldKeys<'_> {
    fn is_held(&self, direction: MoveDirection) -> bool {
        let key = match direction {
            MoveDirection::Forward => KeyCode::KeyW,
            MoveDirection::Backward => KeyCode::KeyS,
            MoveDirection::Left => KeyCode::KeyA,
            MoveDirection::Right => KeyCode::KeyD,
        };
        self.0.contains(&key)
    }
}

/// Everything the frame loop mutates: camera, input, quality knobs, timing.
/// Owned by the application handler; no process-wide state.
struct AppState {
    camera: FlyCamera,
    router: InputRouter,
    quality: QualitySettings,
    timing: FrameTiming,
    keys_held: HashSet<KeyCode>,
    show_overlay: bool,
    reload_requested: bool,
    shader_error: Option<String>,
    shader_path: Option<PathBuf>,
    fps: f32,
}

impl AppState {
    fn new(viewport: Viewport, shader_path: Option<PathBuf>) -> Self {
        Self {
            camera: FlyCamera::default(),
            router: InputRouter::new(viewport),
            quality: QualitySettings::default(),
            timing: FrameTiming::new(),
            keys_held: HashSet::new(),
            show_overlay: true,
            reload_requested: false,
            shader_error: None,
            shader_path,
            fps: 0.0,
        }
    }

    /// Advance one tick's worth of input-driven state.
    fn update(&mut self) -> f32 {
        self.timing.tick();
        // A long stall (debugger, window drag) must not teleport the camera.
        let dt = self.timing.delta().min(0.1);
        if dt > 0.0 {
            self.fps = if self.fps > 0.0 {
                self.fps * 0.9 + 0.1 / dt
            } else {
                1.0 / dt
            };
        }
        self.router
            .poll_movement(&HeldKeys(&self.keys_held), &mut self.camera, dt);
        dt
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }

        if !pressed {
            return;
        }

        match key {
            KeyCode::Escape => {
                event_loop.exit();
            }
            KeyCode::F1 => {
                self.show_overlay = !self.show_overlay;
            }
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        egui::Window::new("rayview")
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.1}", self.fps));
                ui.add(
                    egui::Slider::new(&mut self.quality.max_depth, MIN_RAY_DEPTH..=MAX_RAY_DEPTH)
                        .text("ray depth"),
                );
                ui.checkbox(&mut self.quality.animate_light, "animate light");
                if ui.button("reload shaders").clicked() {
                    self.reload_requested = true;
                }
                if let Some(err) = &self.shader_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
                ui.separator();
                ui.small("F1: overlay | LMB: look | WASD: move | scroll: zoom");
            });
    }
}

/// Read shader source from disk, or fall back to the embedded ray tracer.
fn shader_source(path: Option<&Path>) -> Result<Cow<'static, str>, ShaderError> {
    match path {
        Some(p) => Ok(std::fs::read_to_string(p)?.into()),
        None => Ok(DEFAULT_SHADER.into()),
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<RaytraceRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(viewport: Viewport, shader_path: Option<PathBuf>) -> Self {
        Self {
            state: AppState::new(viewport, shader_path),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    /// Synchronous shader reload: recompile, swap on success, keep the old
    /// pipeline and surface the diagnostic on failure.
    fn reload_shader(&mut self) {
        let Some(device) = &self.device else {
            return;
        };
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        let result = shader_source(self.state.shader_path.as_deref())
            .and_then(|source| renderer.reload_shader(device, &source));
        match result {
            Ok(()) => {
                self.state.shader_error = None;
            }
            Err(e) => {
                tracing::error!("shader reload failed: {e}");
                self.state.shader_error = Some(e.to_string());
            }
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let viewport = self.state.router.viewport();
        let attrs = Window::default_attributes()
            .with_title("rayview")
            .with_inner_size(PhysicalSize::new(viewport.width, viewport.height));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("rayview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.router.on_resize(size.width, size.height);

        // A broken --shader path is recoverable: fall back to the embedded
        // source so the loop still starts.
        let source = shader_source(self.state.shader_path.as_deref()).unwrap_or_else(|e| {
            tracing::error!("failed to load shader source: {e}; using embedded shader");
            self.state.shader_error = Some(e.to_string());
            DEFAULT_SHADER.into()
        });
        let renderer =
            RaytraceRenderer::new(&device, surface_format, size.width, size.height, &source)
                .or_else(|e| {
                    tracing::error!("shader failed to compile: {e}; using embedded shader");
                    self.state.shader_error = Some(e.to_string());
                    RaytraceRenderer::new(
                        &device,
                        surface_format,
                        size.width,
                        size.height,
                        DEFAULT_SHADER,
                    )
                })
                .expect("compile embedded shader");

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if !self.state.router.on_resize(new_size.width, new_size.height) {
                    return;
                }
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width;
                    config.height = new_size.height;
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::Focused(true) => {
                self.state.router.reset_first_sample();
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
                self.state
                    .handle_key(event_loop, key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput { button, state: btn_state, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Middle => PointerButton::Middle,
                    MouseButton::Right => PointerButton::Secondary,
                    _ => return,
                };
                self.state
                    .router
                    .on_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .router
                    .on_cursor_move(&mut self.state.camera, position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 20.0) as f32,
                };
                self.state.router.on_scroll(&mut self.state.camera, dy);
            }
            WindowEvent::RedrawRequested => {
                // A reload request from last frame's overlay is handled
                // before drawing, blocking the tick until it resolves.
                if self.state.reload_requested {
                    self.state.reload_requested = false;
                    self.reload_shader();
                }

                self.state.update();

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    let params = RayParams::new(
                        &self.state.camera,
                        self.state.router.viewport(),
                        &self.state.quality,
                        self.state.timing.elapsed(),
                    );
                    renderer.render(device, queue, &view, &params);
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
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
                                    view: &view,
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
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("rayview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(Viewport::new(cli.width, cli.height), cli.shader);
    event_loop.run_app(&mut app)?;

    Ok(())
}
