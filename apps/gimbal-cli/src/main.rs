use clap::{Parser, Subcommand};
use gimbal_assets::{AssetManager, MeshStore};
use gimbal_common::DemoConfig;
use gimbal_input::KeyBindings;
use gimbal_kernel::{DemoState, EulerAngles, GimbalPose, RotationController, RotationMode};
use gimbal_scene::{DebugTextRenderer, DemoScene, Passes, RenderView, Renderer};
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gimbal-cli", about = "Inspect the gimbal demo's rotation math and scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration summary
    Info,
    /// Compose Euler angles (degrees) and print ring and ship matrices
    Euler {
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        x: f32,
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        y: f32,
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        z: f32,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Accumulate quaternion rates (rad/s) over a number of frames
    Quat {
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        x: f32,
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        y: f32,
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        z: f32,
        /// Number of frames to integrate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        #[arg(long)]
        json: bool,
    },
    /// Build the demo scene and describe it with the debug text renderer
    Scene {
        /// Asset root directory (overrides the config file)
        #[arg(long)]
        assets_dir: Option<PathBuf>,
        /// Euler angles to pose the scene with, degrees
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
        euler: Option<Vec<f32>>,
        #[arg(long)]
        json: bool,
    },
    /// Print the configuration as YAML
    Config,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Info => "info",
            Commands::Euler { .. } => "euler",
            Commands::Quat { .. } => "quat",
            Commands::Scene { .. } => "scene",
            Commands::Config => "config",
        }
    }
}

#[derive(Debug, Serialize)]
struct EulerReport {
    angles: Vec3,
    outer: Mat4,
    middle: Mat4,
    inner: Mat4,
    ship: Mat4,
    outer_axis: Vec3,
    inner_axis: Vec3,
    gimbal_locked: bool,
}

impl EulerReport {
    fn new(angles: EulerAngles) -> Self {
        let pose = GimbalPose::from_euler(angles);
        Self {
            angles: angles.0,
            outer: pose.outer,
            middle: pose.middle,
            inner: pose.inner,
            ship: pose.ship,
            outer_axis: GimbalPose::outer_axis(angles),
            inner_axis: GimbalPose::inner_axis(angles),
            gimbal_locked: GimbalPose::is_locked(angles),
        }
    }
}

#[derive(Debug, Serialize)]
struct QuatReport {
    rates: Vec3,
    frames: u32,
    dt: f32,
    quat: Quat,
    length: f32,
    /// Intrinsic X-Y-Z decomposition in degrees.
    euler_degrees: Vec3,
}

impl QuatReport {
    fn new(rates: Vec3, frames: u32, dt: f32) -> Self {
        let mut controller = RotationController::new();
        controller.set_mode(RotationMode::Quaternion);
        for _ in 0..frames {
            controller.update(dt, Vec3::ZERO, rates);
        }
        let quat = controller.quat();
        let (ex, ey, ez) = quat.to_euler(EulerRot::XYZ);
        Self {
            rates,
            frames,
            dt,
            quat,
            length: quat.length(),
            euler_degrees: Vec3::new(ex, ey, ez) * (180.0 / std::f32::consts::PI),
        }
    }
}

#[derive(Debug, Serialize)]
struct ObjectReport {
    name: String,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    visible: bool,
    passes: String,
}

fn build_scene(config: &DemoConfig, euler: EulerAngles) -> (DemoScene, MeshStore) {
    let assets = AssetManager::from_config(&config.assets);
    let mut store = MeshStore::new();
    let mut demo = DemoScene::build(config, &assets, &mut store);
    let mut state = DemoState::new(config);
    state.rotation.set_euler(euler);
    demo.sync(&state);
    (demo, store)
}

fn print_matrix(name: &str, m: &Mat4) {
    println!("{name}:");
    for row in 0..4 {
        let r = m.row(row);
        println!("  [{:>8.4} {:>8.4} {:>8.4} {:>8.4}]", r.x, r.y, r.z, r.w);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = DemoConfig::load_or_default(cli.config.as_deref())?;
    match &cli.config {
        Some(path) => tracing::info!("{}: config from {}", cli.command.name(), path.display()),
        None => tracing::info!("{}: default config", cli.command.name()),
    }

    match cli.command {
        Commands::Info => {
            let bindings = KeyBindings::with_overrides(&config.bindings)?;
            println!("gimbal-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "window: {}x{} \"{}\"",
                config.window.width, config.window.height, config.window.title
            );
            println!(
                "assets: {} (ship {}, ring {})",
                AssetManager::from_config(&config.assets).root().display(),
                config.assets.ship_mesh,
                config.assets.ring_mesh
            );
            println!("shadow map: {}", config.shadow.map_size);
            let l = &config.light;
            println!(
                "light: dir=({:.1}, {:.1}, {:.1}) size={} near={} far={}",
                l.direction.x, l.direction.y, l.direction.z, l.view_size, l.near, l.far
            );
            println!("key bindings: {}", bindings.len());
            println!(
                "modes: {} / {}",
                RotationMode::Euler.label(),
                RotationMode::Quaternion.label()
            );
        }
        Commands::Euler { x, y, z, json } => {
            let report = EulerReport::new(EulerAngles::new(x, y, z));
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Euler angles: ({x}, {y}, {z}) degrees");
                print_matrix("outer ring (X, red)", &report.outer);
                print_matrix("middle ring (Y, green)", &report.middle);
                print_matrix("inner ring (Z, blue)", &report.inner);
                print_matrix("ship", &report.ship);
                let (o, i) = (report.outer_axis, report.inner_axis);
                println!("outer axis: ({:.4}, {:.4}, {:.4})", o.x, o.y, o.z);
                println!("inner axis: ({:.4}, {:.4}, {:.4})", i.x, i.y, i.z);
                println!(
                    "gimbal lock: {}",
                    if report.gimbal_locked { "YES" } else { "no" }
                );
            }
        }
        Commands::Quat {
            x,
            y,
            z,
            frames,
            dt,
            json,
        } => {
            let report = QuatReport::new(Vec3::new(x, y, z), frames, dt);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let q = report.quat;
                let e = report.euler_degrees;
                println!(
                    "rates ({x}, {y}, {z}) rad/s over {frames} frames of {dt} s (rates clamped to +/-2)"
                );
                println!(
                    "quaternion: w={:.6} x={:.6} y={:.6} z={:.6} |q|={:.6}",
                    q.w, q.x, q.y, q.z, report.length
                );
                println!("euler XYZ: ({:.3}, {:.3}, {:.3}) degrees", e.x, e.y, e.z);
            }
        }
        Commands::Scene {
            assets_dir,
            euler,
            json,
        } => {
            let mut config = config;
            if let Some(dir) = assets_dir {
                config.assets.root = dir;
            }
            let angles = match euler.as_deref() {
                Some([x, y, z]) => EulerAngles::new(*x, *y, *z),
                _ => EulerAngles::ZERO,
            };
            let (demo, store) = build_scene(&config, angles);
            tracing::debug!(
                "scene built: {} objects, {} store entries",
                demo.scene.len(),
                store.len()
            );
            if json {
                let objects: Vec<ObjectReport> = demo
                    .scene
                    .objects()
                    .map(|(_, o)| ObjectReport {
                        name: o.name.clone(),
                        position: o.transform.position,
                        rotation: o.transform.rotation,
                        scale: o.transform.scale,
                        visible: o.visible,
                        passes: o.passes.to_string(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&objects)?);
            } else {
                let view = RenderView {
                    eye: config.camera.position,
                    ..RenderView::default()
                };
                print!("{}", DebugTextRenderer::new().render(&demo.scene, &view));
                println!(
                    "store: {} meshes, {} line lists ({} segments); shadow casters: {}",
                    store.meshes().count(),
                    store.line_meshes().count(),
                    store
                        .line_meshes()
                        .map(|(_, lines)| lines.segment_count())
                        .sum::<usize>(),
                    demo.scene.objects_in(Passes::SHADOW).count()
                );
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommands_parse_and_name_themselves() {
        let cli = Cli::try_parse_from(["gimbal-cli", "euler", "-x", "-90", "--json"]).unwrap();
        assert_eq!(cli.command.name(), "euler");
        let cli = Cli::try_parse_from(["gimbal-cli", "-v", "quat", "-f", "10"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command.name(), "quat");
        let cli = Cli::try_parse_from(["gimbal-cli", "scene", "--euler", "0", "90", "-90"]).unwrap();
        assert_eq!(cli.command.name(), "scene");
    }

    #[test]
    fn euler_report_flags_lock() {
        assert!(EulerReport::new(EulerAngles::LOCK).gimbal_locked);
        assert!(!EulerReport::new(EulerAngles::new(10.0, 20.0, 30.0)).gimbal_locked);
    }

    #[test]
    fn quat_report_integrates_rates() {
        // Half a turn about X at 1 rad/s.
        let report = QuatReport::new(Vec3::new(1.0, 0.0, 0.0), 100, std::f32::consts::PI / 100.0);
        assert!((report.length - 1.0).abs() < 1e-5);
        assert!(report.quat.abs_diff_eq(Quat::from_rotation_x(std::f32::consts::PI), 1e-3)
            || report.quat.abs_diff_eq(-Quat::from_rotation_x(std::f32::consts::PI), 1e-3));
    }

    #[test]
    fn quat_report_serializes() {
        let report = QuatReport::new(Vec3::ZERO, 1, 0.016);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"euler_degrees\""));
        assert!(json.contains("\"length\":1.0"));
    }

    #[test]
    fn scene_uses_fallback_meshes_without_assets() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DemoConfig::default();
        config.assets.root = dir.path().to_path_buf();
        let (demo, store) = build_scene(&config, EulerAngles::new(0.0, 45.0, 0.0));
        assert_eq!(demo.scene.len(), 9);
        assert_eq!(store.meshes().count(), 5);
    }
}
