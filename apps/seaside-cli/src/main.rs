use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use seaside_assets::{ModelData, ModelLoader, ModelSource, load_model};
use seaside_render::{DebugTextRenderer, HeightmapRenderer, RenderView, Renderer, water_color};
use seaside_scene::{IntroConfig, ModelSlot, SceneState, Viewport};
use seaside_waves::{WaveParam, WaveParams, wave_terms};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seaside-cli", about = "Headless tools for the seaside ocean scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, default wave parameters and the intro camera path
    Info,
    /// Print the wave elevation and water color at one point
    Sample {
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        x: f32,
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        z: f32,
        /// Scene time in seconds
        #[arg(short, long, default_value = "0")]
        t: f32,
        #[command(flatten)]
        waves: WaveArgs,
    },
    /// Print a top-down ASCII rendering of the ocean
    Heightmap {
        #[arg(long, default_value = "64")]
        columns: usize,
        #[arg(long, default_value = "24")]
        rows: usize,
        /// Scene time in seconds
        #[arg(short, long, default_value = "0")]
        time: f32,
        /// Place the floating ball on the surface
        #[arg(long)]
        ball: bool,
        #[command(flatten)]
        waves: WaveArgs,
    },
    /// Run the frame updater at a fixed rate and print each frame
    Trace {
        #[arg(short, long, default_value = "10")]
        frames: u64,
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Load the generated beach ball so the floating object animates
        #[arg(long)]
        procedural: bool,
        /// Print the full scene dump after the last frame
        #[arg(long)]
        dump: bool,
        #[command(flatten)]
        waves: WaveArgs,
    },
    /// Parse a model and print its meshes, materials and content hash
    InspectModel {
        /// glTF or GLB file; omit to inspect the generated beach ball
        path: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct WaveArgs {
    /// Override a wave parameter, e.g. `--set big-waves-speed=1.5`
    #[arg(long = "set", value_name = "PARAM=VALUE", value_parser = parse_override)]
    overrides: Vec<(WaveParam, f32)>,
}

impl WaveArgs {
    fn params(&self) -> Result<WaveParams> {
        let mut params = WaveParams::default();
        for &(param, value) in &self.overrides {
            params.set(param, value)?;
        }
        Ok(params)
    }
}

/// Parameter names on the command line are the kebab-cased panel labels.
fn param_by_name(name: &str) -> Option<WaveParam> {
    WaveParam::ALL
        .into_iter()
        .find(|p| p.label().replace(' ', "-") == name)
}

fn parse_override(s: &str) -> Result<(WaveParam, f32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PARAM=VALUE, got `{s}`"))?;
    let param = param_by_name(name.trim()).ok_or_else(|| {
        let known: Vec<String> = WaveParam::ALL
            .iter()
            .map(|p| p.label().replace(' ', "-"))
            .collect();
        format!("unknown parameter `{name}` (known: {})", known.join(", "))
    })?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("bad value for {param}: {e}"))?;
    Ok((param, value))
}

fn fmt_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

fn headless_scene(params: WaveParams) -> SceneState {
    let mut scene = SceneState::new(Viewport::default());
    scene.params = params;
    scene
}

fn load_procedural_ball() -> Result<ModelData> {
    let loader = ModelLoader::spawn(ModelSource::ProceduralBall)?;
    loader
        .wait(Duration::from_secs(10))
        .context("procedural ball did not load")
}

fn print_model(model: &ModelData) {
    println!("model {} (id {})", model.name, model.id);
    println!(
        "  meshes={} vertices={} triangles={}",
        model.meshes.len(),
        model.vertex_count(),
        model.triangle_count()
    );
    if let Some((lo, hi)) = model.bounds() {
        println!("  bounds min={} max={}", fmt_vec3(lo), fmt_vec3(hi));
    }
    for mesh in &model.meshes {
        let material = model
            .material(mesh.material)
            .map_or("default", |m| m.name.as_str());
        println!(
            "  mesh `{}`: {} vertices, {} triangles, material `{material}`",
            mesh.name,
            mesh.vertices.len(),
            mesh.indices.len() / 3
        );
    }
    for material in &model.materials {
        let [r, g, b, a] = material.base_color;
        println!(
            "  material `{}`: base_color=({r:.3}, {g:.3}, {b:.3}, {a:.3}) texture={:?}",
            material.name, material.texture
        );
    }
    for (i, texture) in model.textures.iter().enumerate() {
        println!("  texture {i}: {}x{}", texture.width, texture.height);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("seaside-cli v{}", env!("CARGO_PKG_VERSION"));
            let params = WaveParams::default();
            println!("wave parameters:");
            for param in WaveParam::ALL {
                let range = param.range();
                println!(
                    "  {:<24} {:>8.3}  [{}..={} step {}]",
                    param.label(),
                    params.get(param),
                    range.min,
                    range.max,
                    range.step
                );
            }
            println!("  depth color    {}", params.depth_color().to_hex());
            println!("  surface color  {}", params.surface_color().to_hex());
            let intro = IntroConfig::default();
            println!(
                "intro: {} -> {} over {:.1}s ({:?})",
                fmt_vec3(intro.from),
                fmt_vec3(intro.to),
                intro.duration,
                intro.ease
            );
        }
        Commands::Sample { x, z, t, waves } => {
            let params = waves.params()?;
            let terms = wave_terms(x, z, t, &params);
            let e = terms.total();
            let [r, g, b] = water_color(&params, e);
            println!("elevation({x}, {z}, t={t}) = {e:.6}");
            println!("  warp  = {:.6}", terms.warp);
            println!("  swell = {:.6}", terms.swell);
            println!("  water color (linear) = ({r:.4}, {g:.4}, {b:.4})");
        }
        Commands::Heightmap {
            columns,
            rows,
            time,
            ball,
            waves,
        } => {
            let mut scene = headless_scene(waves.params()?);
            if ball {
                scene.model_loaded();
            }
            scene.advance(time);
            let renderer = HeightmapRenderer {
                columns,
                rows,
                ..HeightmapRenderer::default()
            };
            print!("{}", renderer.render(&scene, &RenderView::from(&scene.camera)));
        }
        Commands::Trace {
            frames,
            fps,
            procedural,
            dump,
            waves,
        } => {
            anyhow::ensure!(fps > 0.0 && fps.is_finite(), "fps must be positive");
            let mut scene = headless_scene(waves.params()?);
            if procedural {
                let model = load_procedural_ball()?;
                tracing::info!(id = %model.id, "procedural ball ready");
                scene.model_loaded();
            }
            for i in 0..frames {
                let report = scene.advance(i as f32 / fps);
                let ball = match scene.model() {
                    ModelSlot::Ready(object) => fmt_vec3(object.pose().position),
                    ModelSlot::Loading => "loading".into(),
                    ModelSlot::Failed(reason) => format!("failed: {reason}"),
                };
                println!(
                    "frame={:<4} t={:.3} phase={:?} camera={} ball={}{}",
                    report.frame,
                    report.time,
                    scene.phase(),
                    fmt_vec3(scene.camera.position),
                    ball,
                    if report.intro_finished { "  [intro finished]" } else { "" }
                );
            }
            if dump {
                let view = RenderView::from(&scene.camera);
                print!("{}", DebugTextRenderer::new().render(&scene, &view));
            }
        }
        Commands::InspectModel { path } => {
            let source = match path {
                Some(path) => ModelSource::File(path),
                None => ModelSource::ProceduralBall,
            };
            let model = load_model(&source).with_context(|| format!("failed to load {source}"))?;
            print_model(&model);
        }
    }

    Ok(())
}
