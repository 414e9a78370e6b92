use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use phongview_input::{InputEvent, Key};
use phongview_render::{
    DebugTextRenderer, FrameLoop, Lighting, RenderableId, Renderer, Scene, SceneConfig,
    SceneRenderables,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "phongview-cli", about = "Headless tools for phongview scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Check a scene file (and optionally a model) without opening a window
    Validate {
        /// YAML scene file
        scene: PathBuf,
        /// glTF/GLB model to try importing
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Run the frame loop headlessly and print each frame's draw list
    Dump {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "3")]
        frames: u32,
        /// Seconds between frames
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// YAML scene file; compiled-in defaults when absent
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Keys held down for the whole run (w, a, s, d, up, down, left, right)
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Print every uniform value instead of counts
        #[arg(long)]
        uniforms: bool,
    },
}

fn parse_key(name: &str) -> anyhow::Result<Key> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "w" => Key::W,
        "a" => Key::A,
        "s" => Key::S,
        "d" => Key::D,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        other => bail!("unknown key `{other}`"),
    })
}

fn lighting_name(lighting: &Lighting) -> &'static str {
    match lighting {
        Lighting::Pulsing(_) => "pulsing",
        Lighting::MultiLight(_) => "multi-light",
    }
}

fn load_scene(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => {
            SceneConfig::load(path).with_context(|| format!("loading scene {}", path.display()))
        }
        None => Ok(SceneConfig::default()),
    }
}

/// Simulate `frames` iterations and render each with the text renderer.
fn dump(
    config: SceneConfig,
    frames: u32,
    dt: f32,
    hold: &[Key],
    uniforms: bool,
) -> String {
    let scene = Scene::new(
        config,
        SceneRenderables {
            cube: RenderableId(0),
            lamp: RenderableId(1),
            model: Some(RenderableId(2)),
        },
    );
    let mut frame_loop = FrameLoop::new(scene, 800, 600);
    let mut renderer = DebugTextRenderer { verbose: uniforms };

    let mut out = String::new();
    for i in 0..frames {
        let events: Vec<InputEvent> = if i == 0 {
            hold.iter()
                .map(|&key| InputEvent::Key { key, pressed: true })
                .collect()
        } else {
            Vec::new()
        };
        let now = (i + 1) as f32 * dt;
        let Some(frame) = frame_loop.step(now, events) else {
            break;
        };
        let p = frame_loop.camera().position;
        out.push_str(&format!(
            "frame {i}: t={:.3} dt={:.3} camera=({:.3}, {:.3}, {:.3})\n",
            frame.time, frame.delta, p.x, p.y, p.z
        ));
        out.push_str(&renderer.render(&frame.draws));
    }
    out
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("phongview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", phongview_common::crate_info());
            println!("input: {}", phongview_input::crate_info());
            println!("render: {}", phongview_render::crate_info());
            println!("assets: {}", phongview_assets::crate_info());
            println!("render-wgpu: {}", phongview_render_wgpu::crate_info());
        }
        Commands::Validate { scene, model } => {
            let config = load_scene(Some(&scene))?;
            println!("scene: {}", scene.display());
            println!("  lighting: {}", lighting_name(&config.lighting));
            println!("  point lights: {}", config.lighting.point_light_count());
            println!("  cubes: {}", config.cubes.positions.len());
            println!("  lamps: {}", config.lighting.lamp_positions().len());
            if let Some(path) = model {
                let model = phongview_assets::load_model(&path)
                    .with_context(|| format!("loading model {}", path.display()))?;
                println!("model: {}", path.display());
                println!("  meshes: {}", model.meshes.len());
                println!("  vertices: {}", model.vertex_count());
                println!("  images: {}", model.images.len());
            }
            println!("OK");
        }
        Commands::Dump {
            frames,
            dt,
            scene,
            hold,
            uniforms,
        } => {
            let config = load_scene(scene.as_ref())?;
            let keys = hold
                .iter()
                .map(|name| parse_key(name))
                .collect::<anyhow::Result<Vec<_>>>()?;
            print!("{}", dump(config, frames, dt, &keys, uniforms));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_accepts_names() {
        assert_eq!(parse_key("W").unwrap(), Key::W);
        assert_eq!(parse_key("left").unwrap(), Key::Left);
        assert!(parse_key("space").is_err());
    }

    #[test]
    fn dump_prints_every_frame() {
        let out = dump(SceneConfig::default(), 3, 0.5, &[], false);
        assert_eq!(out.matches("=== Frame").count(), 3);
        assert!(out.contains("frame 2: t=1.500 dt=0.500"));
    }

    #[test]
    fn held_key_moves_camera_in_dump() {
        let out = dump(SceneConfig::default(), 2, 0.4, &[Key::W], false);
        // 0.8 s at the default speed of 2.5 from z = 3.
        let last = out.lines().find(|l| l.starts_with("frame 1:")).unwrap();
        assert!(last.ends_with(", 1.000)"), "{last}");
    }
}
