use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use phongview_assets::{TextureImage, load_model, load_texture, primitives};
use phongview_input::{EventQueue, InputEvent, Key};
use phongview_render::lighting::{MultiLight, PulsingLight};
use phongview_render::{FrameLoop, Lighting, Renderer, Scene, SceneConfig, SceneRenderables};
use phongview_render_wgpu::WgpuRenderer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Pixels of touchpad scroll per wheel line.
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Parser)]
#[command(name = "phongview-desktop", about = "Phong lighting viewer with a fly camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// YAML scene file; compiled-in defaults when absent
    #[arg(long)]
    scene: Option<PathBuf>,

    /// glTF/GLB model drawn after the cubes
    #[arg(long, default_value = "assets/model.glb")]
    model: PathBuf,

    /// Skip loading the model
    #[arg(long)]
    no_model: bool,

    /// Diffuse map for the cubes
    #[arg(long)]
    diffuse_map: Option<PathBuf>,

    /// Specular map for the cubes
    #[arg(long)]
    specular_map: Option<PathBuf>,

    /// Override the scene's lighting model
    #[arg(long, value_enum)]
    lighting: Option<LightingMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LightingMode {
    Pulsing,
    MultiLight,
}

impl From<LightingMode> for Lighting {
    fn from(mode: LightingMode) -> Self {
        match mode {
            LightingMode::Pulsing => Lighting::Pulsing(PulsingLight::default()),
            LightingMode::MultiLight => Lighting::MultiLight(MultiLight::default()),
        }
    }
}

/// Translate a physical key into one the dispatcher tracks.
fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
    }
}

/// Load an optional texture map, falling back to white.
fn texture_or_white(path: Option<&Path>, role: &str) -> TextureImage {
    let white = || TextureImage::solid([255, 255, 255, 255]);
    let Some(path) = path else {
        tracing::warn!(role, "no texture map given, using white");
        return white();
    };
    match load_texture(path) {
        Ok(image) => image,
        Err(err) => {
            tracing::warn!(role, path = %path.display(), "failed to load texture map, using white: {err}");
            white()
        }
    }
}

struct ViewerApp {
    cli: Cli,
    config: Option<SceneConfig>,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    frames: Option<FrameLoop>,
    events: EventQueue,
    cursor_captured: bool,
    start: Instant,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(cli: Cli, config: SceneConfig) -> Self {
        Self {
            cli,
            config: Some(config),
            window: None,
            renderer: None,
            frames: None,
            events: EventQueue::new(),
            cursor_captured: false,
            start: Instant::now(),
            error: None,
        }
    }

    /// Create the window and every GPU resource; any failure is fatal.
    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("phongview")
            .with_inner_size(PhysicalSize::new(self.cli.width, self.cli.height));
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

        match window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        {
            Ok(()) => self.cursor_captured = true,
            Err(err) => tracing::warn!("cursor capture unavailable, looking with cursor position: {err}"),
        }
        window.set_cursor_visible(false);

        let mut renderer =
            WgpuRenderer::new(window.clone(), window.inner_size()).context("initializing GPU")?;

        let cube = primitives::cube();
        let diffuse = texture_or_white(self.cli.diffuse_map.as_deref(), "diffuse");
        let specular = texture_or_white(self.cli.specular_map.as_deref(), "specular");
        let cube_id = renderer.upload_textured_mesh(&cube, &diffuse, &specular);
        let lamp_id = renderer.upload_mesh(&cube);

        let model_id = if self.cli.no_model {
            None
        } else {
            let model = load_model(&self.cli.model)
                .with_context(|| format!("loading model {}", self.cli.model.display()))?;
            Some(renderer.upload_model(&model))
        };

        let config = self.config.take().unwrap_or_default();
        let scene = Scene::new(
            config,
            SceneRenderables {
                cube: cube_id,
                lamp: lamp_id,
                model: model_id,
            },
        );
        let size = renderer.size();
        self.frames = Some(FrameLoop::new(scene, size.width, size.height));
        self.renderer = Some(renderer);
        self.start = Instant::now();

        window.request_redraw();
        self.window = Some(window);
        tracing::info!("viewer ready");
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(frames), Some(renderer)) = (&mut self.frames, &mut self.renderer) else {
            return;
        };

        let now = self.start.elapsed().as_secs_f32();
        if let Some(frame) = frames.step(now, self.events.drain()) {
            if let Some((width, height)) = frame.resized {
                renderer.resize(width, height);
            }
            if let Err(err) = renderer.render(&frame.draws) {
                self.fail(event_loop, err.into());
                return;
            }
        }

        if !frames.is_running() {
            event_loop.exit();
        } else if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(err) = self.setup(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.events.push(InputEvent::CloseRequested),
            WindowEvent::Resized(size) => self.events.push(InputEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(true) => self.events.push(InputEvent::FocusGained),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    self.events.push(InputEvent::Key {
                        key,
                        pressed: state == ElementState::Pressed,
                    });
                }
            }
            WindowEvent::CursorMoved { position, .. } if !self.cursor_captured => {
                self.events.push(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.events.push(InputEvent::Scroll {
                    y: scroll_lines(delta),
                });
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.cursor_captured {
                self.events.push(InputEvent::MouseMotion {
                    dx: delta.0 as f32,
                    dy: delta.1 as f32,
                });
            }
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

    tracing::info!("phongview-desktop starting");

    let mut config = match &cli.scene {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(mode) = cli.lighting {
        config.lighting = mode.into();
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(cli, config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => {
            tracing::info!("phongview-desktop exiting");
            Ok(())
        }
    }
}
