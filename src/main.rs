//! Interactive hair viewer.
//!
//! ```text
//! hairsim-viewer [scene.json]
//! ```
//!
//! | Input | Action |
//! |-------|--------|
//! | Up / Down | more / fewer hairs per group |
//! | Right / Left | more / fewer spline vertices |
//! | R, G, B (+Shift) | raise (lower) a color channel |
//! | + / - | raise / lower density and regrow |
//! | Space | regrow with the current settings |
//! | P | pause |
//! | Drag / wheel | orbit / zoom |

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use hairsim::error::ViewerError;
use hairsim::gpu::{Camera, GpuHairRenderer};
use hairsim::hair_object::ColorChannel;
use hairsim::sampler::seeded_rng;
use hairsim::scene::HairScene;
use hairsim::time::FrameClock;
use hairsim::SceneConfig;
use rand::rngs::SmallRng;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, ModifiersState, NamedKey},
    window::{Window, WindowId},
};

const STATS_INTERVAL: u64 = 10;
const GROUP_STEP: u32 = 4;
const COLOR_STEP: f32 = 0.05;
const DENSITY_STEP: f32 = 10.0;

struct App {
    scene: HairScene,
    rng: SmallRng,
    clock: FrameClock,
    camera: Camera,
    window: Option<Arc<Window>>,
    renderer: Option<GpuHairRenderer>,
    next_frame: Instant,
    modifiers: ModifiersState,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: SceneConfig) -> Result<Self, ViewerError> {
        let mut rng = seeded_rng(config.seed);
        let scene = HairScene::from_config(config, &mut rng)?;
        let clock = FrameClock::new(scene.config().target_fps);
        Ok(Self {
            scene,
            rng,
            clock,
            camera: Camera::new(),
            window: None,
            renderer: None,
            next_frame: Instant::now(),
            modifiers: ModifiersState::default(),
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let attrs = *self.scene.attributes();
        let sign = if self.modifiers.shift_key() { -1.0 } else { 1.0 };

        match &event.logical_key {
            Key::Named(NamedKey::ArrowUp) => self.scene.set_group_hairs(attrs.group_hairs + GROUP_STEP),
            Key::Named(NamedKey::ArrowDown) => {
                self.scene.set_group_hairs(attrs.group_hairs.saturating_sub(GROUP_STEP))
            }
            Key::Named(NamedKey::ArrowRight) => self.scene.set_spline_vertices(attrs.spline_vertices + 1),
            Key::Named(NamedKey::ArrowLeft) => {
                self.scene.set_spline_vertices(attrs.spline_vertices.saturating_sub(1))
            }
            Key::Named(NamedKey::Space) => self.reset(),
            Key::Character(c) => match c.to_lowercase().as_str() {
                "r" => self.scene.set_color_channel(ColorChannel::Red, attrs.color.x + sign * COLOR_STEP),
                "g" => self.scene.set_color_channel(ColorChannel::Green, attrs.color.y + sign * COLOR_STEP),
                "b" => self.scene.set_color_channel(ColorChannel::Blue, attrs.color.z + sign * COLOR_STEP),
                "+" | "=" => {
                    self.scene.set_density(self.scene.density() + DENSITY_STEP);
                    self.reset();
                }
                "-" => {
                    self.scene.set_density(self.scene.density() - DENSITY_STEP);
                    self.reset();
                }
                "p" => self.clock.toggle_pause(),
                _ => {}
            },
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.scene.reset(&mut self.rng);
        self.clock.reset();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let time = self.clock.tick();
        self.scene.tick(time);

        if time.frame % STATS_INTERVAL == 0 {
            let stats = self.scene.stats();
            info!(
                guide_hairs = stats.guide_hairs,
                rendered_hairs = stats.rendered_hairs,
                simulated_vertices = stats.simulated_vertices,
                rendered_vertices = stats.rendered_vertices,
                fps = self.clock.fps(),
                "frame {}",
                time.frame
            );
        }

        let Some(renderer) = &mut self.renderer else {
            return;
        };
        renderer.begin_frame();
        let globals = self.camera.global_uniforms(renderer.aspect());
        self.scene.paint(renderer, &globals);

        match renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => renderer.resize(winit::dpi::PhysicalSize {
                width: renderer.config.width,
                height: renderer.config.height,
            }),
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title("hairsim")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuHairRenderer::new(window)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => return self.fail(event_loop, e.into()),
        }
        self.next_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32 * 0.005;
                        let dy = (position.y - last_y) as f32 * 0.005;
                        self.camera.orbit(dx, dy);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.camera.zoom(scroll);
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                self.next_frame += self.clock.frame_interval();
                // Fell behind; don't try to catch up
                let now = Instant::now();
                if self.next_frame < now {
                    self.next_frame = now;
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if Instant::now() >= self.next_frame {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

fn load_config() -> Result<SceneConfig, ViewerError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(SceneConfig::load(path)?),
        None => Ok(SceneConfig::default()),
    }
}

fn run(config: SceneConfig) -> Result<(), ViewerError> {
    info!(
        growth_map = %config
            .growth_map
            .as_deref()
            .map_or_else(|| "<built-in>".into(), |p| p.display().to_string()),
        density = config.density,
        "hairsim v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut app = App::new(config)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let config = load_config();
    let log_level = config
        .as_ref()
        .map(SceneConfig::log_level)
        .unwrap_or(tracing::Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {e}");
    }

    match config.and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
