/// orbview terminal demo - bodies orbiting a globe, with hover tooltips
///
/// Controls:
///   - Mouse: hover a body to see its name, latitude and longitude
///   - WASD / Arrow Keys: orbit the camera
///   - G: toggle the globe
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use orbview_core::{parse_manifest, SceneManifest};
use orbview_terminal::{AppOptions, TerminalApp};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Two debris bodies sliding towards each other
    Collision,
    /// Asteroids revolving around the globe
    Earth,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scene manifest to load instead of a preset
    manifest: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "earth")]
    preset: Preset,

    /// Number of asteroids in the earth preset
    #[arg(long, default_value_t = 20)]
    count: u32,

    /// Seed for random placement
    #[arg(long, env = "ORBVIEW_SEED", default_value_t = 1)]
    seed: u64,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Picking radius around each body, in scene units
    #[arg(long, default_value_t = 0.15)]
    pick_radius: f64,

    /// Write logs here; the terminal itself is taken by the renderer
    #[arg(long, env = "ORBVIEW_LOG_FILE")]
    log_file: Option<PathBuf>,
}

/// Stderr sits under the alternate screen, so logging is off unless it
/// goes to a file. `RUST_LOG` still overrides either default.
fn default_filter(log_file: Option<&PathBuf>) -> &'static str {
    match log_file {
        Some(_) => "warn",
        None => "off",
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(log_file)),
    );
    if let Some(path) = log_file {
        let file = fs::File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let manifest = match &args.manifest {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read scene manifest {}", path.display()))?;
            parse_manifest(&text)
                .with_context(|| format!("failed to parse scene manifest {}", path.display()))?
        }
        None => match args.preset {
            Preset::Collision => SceneManifest::collision_demo(),
            Preset::Earth => SceneManifest::earth_orbit(args.count),
        },
    };

    let registry = manifest
        .build(args.seed)
        .with_context(|| format!("failed to build scene '{}'", manifest.name))?;
    log::info!("loaded '{}' with {} bodies", manifest.name, registry.len());

    let options = AppOptions {
        title: manifest.name.clone(),
        target_fps: args.fps,
        pick_radius: args.pick_radius,
        ..AppOptions::default()
    };

    let mut app = TerminalApp::new(registry, options)?;
    app.run()?;

    println!("Thank you for using orbview!");
    Ok(())
}
