//! Roller - Headless host for the rolling sphere and orbit camera
//!
//! Usage: `roller [--save] [settings.toml]`
//!
//! Builds the demo course, replays the scripted input timeline and logs the
//! sphere and camera state. `--save` writes the effective settings back out.

mod scene;
mod script;
mod settings;
mod sim;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use settings::SimSettings;
use sim::Simulation;

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    settings_path: Option<PathBuf>,
    save: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        for arg in args {
            match arg.as_str() {
                "--save" => parsed.save = true,
                flag if flag.starts_with("--") => anyhow::bail!("Unknown flag {}", flag),
                path => {
                    if parsed.settings_path.is_some() {
                        anyhow::bail!("Only one settings path may be given");
                    }
                    parsed.settings_path = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Roller...");

    let args = Args::parse(std::env::args().skip(1)).context("Failed to parse arguments")?;
    let settings = SimSettings::load(args.settings_path.as_deref());

    if args.save {
        settings
            .save(args.settings_path.as_deref())
            .context("Failed to save settings")?;
    }

    let mut sim = Simulation::new(&settings).context("Failed to create simulation")?;
    let demo = &settings.demo;
    let report = sim.run(demo.duration, demo.frame_rate, demo.report_interval);

    info!(
        "Finished after {} frames: sphere at {:?} ({:?}), camera at {:?}",
        sim.time().frame_count,
        report.position,
        report.support,
        report.camera.position
    );
    info!(
        "Course pieces: {}",
        sim.course()
            .pieces
            .iter()
            .map(|p| p.name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!(
        "Final orbit angles {:?}, jump phase {}",
        sim.camera().orbit_angles(),
        sim.controller().state().jump_phase
    );

    Ok(())
}
