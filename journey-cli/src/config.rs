use anyhow::{Context, Result};
use chrono_tz::Tz;
use journey_core::parse_timezone;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_journey_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub watch: WatchSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSection {
    /// IANA zone that decides where one calendar day ends.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchSection {
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_tick_seconds() -> u64 {
    60
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick_seconds(),
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.engine.timezone).context("engine.timezone in config.toml")
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_journey_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Defaults when `p` does not exist.
fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    save_config_to(&config_path()?, cfg)
}

fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}
