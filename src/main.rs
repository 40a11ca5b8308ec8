use anyhow::{Result, anyhow};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use framesnap::Scene;
use framesnap::config::Config;
use framesnap::host::{RunOptions, Runner};
use framesnap::settings::{EditOutcome, SETTINGS, SettingsEditor, current_value};

#[derive(Parser, Debug)]
#[command(name = "framesnap")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FRAMESNAP_GIT_HASH"), ")"),
    about = "In-game screenshot tool with greyscale capture"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the software host (SIGUSR1 takes a screenshot, SIGINT/SIGTERM quit)
    Run(RunArgs),

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Screen width in pixels. Capture regions wider than the screen are
    /// rejected, so SlideReel (1024x1024) needs at least 1024
    #[arg(long, default_value_t = 1280)]
    width: i32,

    /// Screen height in pixels. Capture regions taller than the screen are
    /// rejected, so SlideReel (1024x1024) needs at least 1024
    #[arg(long, default_value_t = 720)]
    height: i32,

    /// Update ticks per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Scene to simulate (title-screen, solar-system, eye-of-the-universe, credits)
    #[arg(long, default_value = "solar-system", value_parser = parse_scene)]
    scene: Scene,

    /// Camera field of view before any capture override
    #[arg(long, value_name = "DEGREES", default_value_t = 90.0)]
    initial_fov: f32,

    /// Take one screenshot immediately and exit when it is written
    #[arg(long, action = ArgAction::SetTrue)]
    capture_on_start: bool,

    /// Stop after this many seconds of host time
    #[arg(long, value_name = "SECS", value_parser = parse_duration)]
    duration: Option<Duration>,

    /// Override the storage root (screenshots go to <DIR>/Screenshots)
    #[arg(long, value_name = "DIR")]
    storage_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print settings and their current values
    List {
        /// Include settings hidden by the current mode
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,
    },

    /// Change a setting and save it to config.toml
    Set {
        /// Setting name, e.g. "Greyscale Mode"
        name: String,
        value: String,
    },
}

fn parse_scene(raw: &str) -> Result<Scene, String> {
    Scene::from_name(raw).ok_or_else(|| format!("unknown scene '{raw}'"))
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err("duration must be a positive number of seconds".to_string());
    }
    Ok(Duration::from_secs_f64(secs))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Settings { action } => settings(action),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(root) = args.storage_root {
        config.storage.root = root.to_string_lossy().into_owned();
    }
    log::info!(
        "Screenshots will be written under {}",
        config.storage_root().display()
    );

    let mut runner = Runner::new(RunOptions {
        width: args.width,
        height: args.height,
        fps: args.fps,
        scene: args.scene,
        field_of_view: args.initial_fov,
        capture_on_start: args.capture_on_start,
        duration: args.duration,
    });
    let summary = runner.run(SettingsEditor::new(config, None))?;

    for path in &summary.saved {
        println!("{}", path.display());
    }
    log::info!(
        "Host loop finished after {} frames ({} saved, {} failed)",
        summary.frames,
        summary.saved.len(),
        summary.failed.len()
    );

    if !summary.failed.is_empty() {
        return Err(anyhow!("Screenshot failed: {}", summary.failed.join("; ")));
    }
    Ok(())
}

fn settings(action: SettingsAction) -> Result<()> {
    let path = Config::get_config_path()?;
    let config = Config::load_from(&path)?;
    let mut editor = SettingsEditor::new(config, Some(path));

    match action {
        SettingsAction::List { all } => {
            let rows: Vec<_> = if all {
                SETTINGS
                    .iter()
                    .map(|d| (d, current_value(editor.config(), d.id)))
                    .collect()
            } else {
                editor.visible()
            };
            for (descriptor, value) in rows {
                println!("{:<22} {}", descriptor.name, value);
            }
        }
        SettingsAction::Set { name, value } => match editor.apply(&name, &value)? {
            EditOutcome::Unchanged => println!("\"{name}\" unchanged"),
            EditOutcome::Changed { descriptor, value } => {
                if let Some(path) = editor.store() {
                    log::info!("Saved settings to {}", path.display());
                }
                println!("{} = {}", descriptor.name, value)
            }
        },
    }
    Ok(())
}
