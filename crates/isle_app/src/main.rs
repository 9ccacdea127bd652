//! # isle_app
//!
//! Host for the isle runtime. Loads a world script (the built-in island by
//! default), optionally restores a saved game, runs the fixed-rate frame loop
//! and writes the game state back out.

mod config;
mod demo;
mod frame;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use isle_actor::{ActorClass, ActorError, Session, WorldScript};
use isle_state::StateError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use frame::FrameLoop;

#[derive(Parser)]
#[command(name = "isle_app", about = "Runs the isle runtime at a fixed frame rate")]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World script, JSON or MessagePack
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Number of frames to run (0 = unlimited)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Game state to load before the first frame
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where to save the game state on exit
    #[arg(long)]
    save: Option<PathBuf>,

    /// Run frames back to back instead of at the tick rate
    #[arg(long)]
    fast: bool,
}

impl Args {
    fn apply(self, config: &mut AppConfig) {
        if let Some(script) = self.script {
            config.script_path = Some(script);
        }
        if let Some(ticks) = self.ticks {
            config.max_ticks = ticks;
        }
        if let Some(load) = self.load {
            config.load_path = Some(load);
        }
        if let Some(save) = self.save {
            config.save_path = Some(save);
        }
        if self.fast {
            config.realtime = false;
        }
    }
}

/// Read a script file: `.json` is parsed as JSON, anything else is decoded
/// as MessagePack.
fn read_script(path: &Path) -> Result<WorldScript> {
    let script = if path.extension().is_some_and(|ext| ext == "json") {
        let text = std::fs::read_to_string(path)?;
        WorldScript::from_json(&text)?
    } else {
        let bytes = std::fs::read(path)?;
        WorldScript::decode(&bytes)?
    };
    Ok(script)
}

/// Restore a saved game. A truncated save has already been applied as far
/// as it goes, so it is reported and the run continues.
fn load_game(session: &mut Session, path: &Path) -> Result<()> {
    match session.load(path) {
        Ok(()) => Ok(()),
        Err(ActorError::State(err @ StateError::TruncatedStream { .. })) => {
            warn!(path = %path.display(), error = %err, "save file truncated, missing progress reset");
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("loading game {}", path.display())),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("isle_app=info".parse()?))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);

    let mut session = Session::default();
    info!(session = %session.id(), "isle runtime starting");

    let script = match &config.script_path {
        Some(path) => {
            let mut script = read_script(path)
                .with_context(|| format!("loading script {}", path.display()))?;
            for action in &mut script.actions {
                if action.class == ActorClass::Pizza && action.duration.is_none() {
                    action.duration = config.pizza_time_limit;
                }
            }
            script
        }
        None => demo::island_script(config.pizza_time_limit),
    };
    let actors = session.load_script(&script)?;
    info!(actors = actors.len(), "world ready");

    if let Some(path) = &config.load_path {
        load_game(&mut session, path)?;
    }

    let cues = demo::scenario(&session);
    let save_path = config.save_path.clone();
    let summary = FrameLoop::new(config, cues).run(&mut session);
    info!(
        frames = summary.frames,
        ticked = summary.ticked,
        consumed = summary.consumed,
        dropped = summary.dropped,
        "run finished"
    );

    if let Some(path) = save_path {
        session
            .save(&path)
            .with_context(|| format!("saving game {}", path.display()))?;
    }

    info!("isle runtime shut down");
    Ok(())
}
