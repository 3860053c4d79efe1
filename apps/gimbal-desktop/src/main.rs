use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use gimbal_assets::{AssetManager, MeshStore};
use gimbal_common::DemoConfig;
use gimbal_input::{Action, ActionState, KeyBindings};
use gimbal_kernel::light::{FAR_RANGE, NEAR_RANGE, VIEW_SIZE_RANGE};
use gimbal_kernel::rotation::{EULER_LIMIT, QUAT_RATE_LIMIT};
use gimbal_kernel::{DemoState, RotationMode};
use gimbal_render_wgpu::{FreeCamera, GpuContext, SceneRenderer};
use gimbal_scene::DemoScene;
use glam::Vec3;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const BOOST: f32 = 3.0;

#[derive(Parser)]
#[command(name = "gimbal-desktop", about = "Gimbal lock versus quaternion rotation demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset root directory (overrides the config file)
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,
}

/// Application state.
struct AppState {
    config: DemoConfig,
    state: DemoState,
    demo: DemoScene,
    store: MeshStore,
    camera: FreeCamera,
    bindings: KeyBindings,
    actions: ActionState,
    /// Quaternion sliders in rad/s; zero whenever they are not being dragged.
    quat_rates: Vec3,
    show_settings: bool,
    mouse_captured: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(config: DemoConfig, bindings: KeyBindings) -> Self {
        let assets = AssetManager::from_config(&config.assets);
        let mut store = MeshStore::new();
        let demo = DemoScene::build(&config, &assets, &mut store);
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;

        Self {
            state: DemoState::new(&config),
            camera: FreeCamera::from_config(&config.camera, aspect),
            config,
            demo,
            store,
            bindings,
            actions: ActionState::new(),
            quat_rates: Vec3::ZERO,
            show_settings: true,
            mouse_captured: false,
            last_frame: Instant::now(),
        }
    }

    fn update(&mut self, dt: f32) {
        let actions = &self.actions;
        let local = Vec3::new(
            actions.axis(Action::CameraRight, Action::CameraLeft),
            actions.axis(Action::CameraUp, Action::CameraDown),
            actions.axis(Action::CameraForward, Action::CameraBackward),
        );
        if local != Vec3::ZERO {
            let boost = if self.actions.is_held(Action::CameraBoost) {
                BOOST
            } else {
                1.0
            };
            self.camera.translate(local, dt * boost);
        }

        self.state.step(dt, &self.actions, self.quat_rates);
        self.demo.sync(&self.state);
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> bool {
        let name = format!("{key:?}");
        if !pressed {
            self.actions.release_key(&name);
            return false;
        }
        let Some(action) = self.bindings.action_for(&name) else {
            return false;
        };
        if !self.actions.press_key(&name, action) || repeat || !action.is_trigger() {
            return false;
        }

        match action {
            Action::Quit => return true,
            Action::ToggleSettings => self.show_settings = !self.show_settings,
            other => {
                self.state.trigger(other);
            }
        }
        false
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .default_pos(egui::pos2(10.0, 10.0))
            .default_size(egui::vec2(450.0, 450.0))
            .open(&mut open)
            .show(ctx, |ui| {
                let stats = &self.state.stats;
                ui.label(format!(
                    "Application average {:.3} ms/frame ({:.1} FPS)",
                    stats.ms_per_frame(),
                    stats.fps()
                ));
                let p = self.camera.position;
                ui.label(format!("Camera position: {:.3} {:.3} {:.3}", p.x, p.y, p.z));
                ui.label(format!(
                    "Camera rotation: {:.3} {:.3}",
                    self.camera.theta, self.camera.phi
                ));

                ui.separator();

                let light = &mut self.state.light;
                ui.add(egui::Slider::new(&mut light.view_size, VIEW_SIZE_RANGE).text("Light Camera Size"));
                ui.add(egui::Slider::new(&mut light.near, NEAR_RANGE).text("Light Near Plane"));
                ui.add(egui::Slider::new(&mut light.far, FAR_RANGE).text("Light Far Plane"));
                let lp = light.position();
                ui.label(format!("Light Position: {:.3} {:.3} {:.3}", lp.x, lp.y, lp.z));

                let rotation = &mut self.state.rotation;
                let mut mode = rotation.mode();
                ui.radio_value(&mut mode, RotationMode::Euler, RotationMode::Euler.label());
                ui.radio_value(&mut mode, RotationMode::Quaternion, RotationMode::Quaternion.label());
                rotation.set_mode(mode);

                match mode {
                    RotationMode::Euler => {
                        ui.horizontal(|ui| {
                            if ui.button("Reset").clicked() {
                                rotation.reset();
                            }
                            if ui.button("Lock").clicked() {
                                rotation.lock();
                            }
                        });
                        let angles = rotation.euler_degrees_mut();
                        for (value, label) in [
                            (&mut angles.x, "Rotation (X)"),
                            (&mut angles.y, "Rotation (Y)"),
                            (&mut angles.z, "Rotation (Z)"),
                        ] {
                            ui.add(egui::Slider::new(value, -EULER_LIMIT..=EULER_LIMIT).text(label));
                        }
                    }
                    RotationMode::Quaternion => {
                        if ui.button("Reset").clicked() {
                            rotation.reset();
                        }
                        let rates = &mut self.quat_rates;
                        for (value, label) in [
                            (&mut rates.x, "Rotation (X)"),
                            (&mut rates.y, "Rotation (Y)"),
                            (&mut rates.z, "Rotation (Z)"),
                        ] {
                            rate_slider(ui, value, label);
                        }
                    }
                }

                if rotation.gimbal_locked() {
                    ui.colored_label(
                        egui::Color32::from_rgb(255, 80, 80),
                        "Gimbal lock: outer and inner rings share an axis",
                    );
                }

                ui.separator();
                ui.small("U/J I/K O/L: Rotate | R: Reset | G: Lock | M: Mode | F1: Shadow map");
                ui.small("RMB: Look | WASD: Move | Tab: Settings");
            });
        self.show_settings = open;
    }
}

/// Everything that exists only once the window is up.
struct Gpu {
    window: Arc<Window>,
    ctx: GpuContext,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(window: Arc<Window>, egui_ctx: &EguiContext, app: &AppState) -> Result<Self> {
        let ctx = GpuContext::new(window.clone())?;
        tracing::info!("GPU initialized with {} backend", ctx.backend.to_str());

        let mut renderer = SceneRenderer::new(
            &ctx.device,
            ctx.format(),
            ctx.config.width,
            ctx.config.height,
            app.config.shadow.map_size,
        );
        renderer.set_clear_color(app.config.render.clear_color);
        renderer.upload(&ctx.device, &app.store);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.format(), None, 1, false);

        Ok(Self {
            window,
            ctx,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>, app: &mut AppState) {
        self.ctx.resize(size.width, size.height);
        let (width, height) = (self.ctx.config.width, self.ctx.config.height);
        app.camera.set_viewport(width, height);
        self.renderer.resize(&self.ctx.device, width, height);
    }

    fn redraw(&mut self, egui_ctx: &EguiContext, app: &mut AppState) {
        let now = Instant::now();
        let dt = (now - app.last_frame).as_secs_f32().min(0.1);
        app.last_frame = now;

        // Sliders first, then key integration, as one frame of input.
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| app.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);
        app.update(dt);

        let output = match self.ctx.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.ctx.reconfigure();
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

        let device = &self.ctx.device;
        let queue = &self.ctx.queue;
        self.renderer.render(
            device,
            queue,
            &view,
            &app.camera,
            app.state.light.light_matrix(),
            app.state.light.direction,
            &app.demo.scene,
        );

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.config.width, self.ctx.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.egui_renderer.update_buffers(
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct GpuApp {
    app: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(app: AppState) -> Self {
        Self {
            app,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let window_config = &self.app.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gpu::new(window, &self.egui_ctx, &self.app) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.app.camera.set_viewport(size.width, size.height);
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
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let consumed = gpu.egui_winit.on_window_event(&gpu.window, &event).consumed;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size, &mut self.app);
            }
            WindowEvent::Focused(false) => {
                self.app.actions.clear();
                self.app.mouse_captured = false;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                // Releases always go through so held actions never stick.
                if consumed && pressed {
                    return;
                }
                if self.app.handle_key(key, pressed, repeat) {
                    tracing::info!("quit requested");
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                let pressed = btn_state == ElementState::Pressed;
                if consumed && pressed {
                    return;
                }
                self.app.mouse_captured = pressed;
                gpu.window.set_cursor_visible(!pressed);
            }
            WindowEvent::RedrawRequested => {
                gpu.redraw(&self.egui_ctx, &mut self.app);
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
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.app.mouse_captured {
                self.app.camera.look(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

/// Slider that springs back to zero once the pointer lets go of it.
fn rate_slider(ui: &mut egui::Ui, value: &mut f32, label: &str) {
    let response = ui.add(egui::Slider::new(value, -QUAT_RATE_LIMIT..=QUAT_RATE_LIMIT).text(label));
    if !response.is_pointer_button_down_on() {
        *value = 0.0;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("gimbal-desktop starting");

    let mut config = DemoConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.assets_dir {
        config.assets.root = dir;
    }
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    let bindings = KeyBindings::with_overrides(&config.bindings)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, bindings));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_slider_frame(ctx: &EguiContext, value: &mut f32) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| rate_slider(ui, value, "Rotation (X)"));
        });
    }

    #[test]
    fn rate_slider_springs_back_without_pointer() {
        let ctx = EguiContext::default();
        let mut value = 0.75;
        run_slider_frame(&ctx, &mut value);
        assert_eq!(value, 0.0);
    }
}
