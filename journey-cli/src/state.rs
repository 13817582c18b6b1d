use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use journey_core::{FileStore, StreakEngine};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// `$JOURNEY_HOME`, or `~/.journey`.
pub fn journey_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("JOURNEY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".journey"))
}

pub fn ensure_journey_home() -> Result<PathBuf> {
    let dir = journey_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn state_path() -> Result<PathBuf> {
    Ok(ensure_journey_home()?.join("state.json"))
}

/// Load the engine from `~/.journey/state.json` and deliver one clock tick,
/// so an abandoned streak is cleared before the caller acts on it.
pub fn open_engine(cfg: &Config, now: DateTime<Utc>) -> Result<StreakEngine<FileStore>> {
    open_engine_at(&state_path()?, cfg, now)
}

fn open_engine_at(path: &Path, cfg: &Config, now: DateTime<Utc>) -> Result<StreakEngine<FileStore>> {
    let tz = cfg.timezone()?;
    tracing::debug!(path = %path.display(), %tz, "opening state");

    let mut engine = StreakEngine::load(FileStore::open(path), tz, now);
    let outcome = engine.tick(now);
    if outcome.expired {
        println!("More than a day passed without logging; your streak was reset.");
    }
    Ok(engine)
}
