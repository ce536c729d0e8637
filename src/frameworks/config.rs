use crate::domain::tuning::GameTuning;
use std::{env, fmt, io, path::Path, path::PathBuf, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const DEFAULT_TICK_RATE_HZ: u32 = 60;
// Pinned session every client lands in unless it names another.
pub const DEFAULT_SESSION_ID: &str = "default";

pub fn http_port() -> u16 {
    env::var("GAME_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn tick_rate_hz() -> u32 {
    env::var("TICK_RATE_HZ")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|hz| (1..=1000).contains(hz))
        .unwrap_or(DEFAULT_TICK_RATE_HZ)
}

pub fn tick_interval() -> Duration {
    tick_interval_for(tick_rate_hz())
}

fn tick_interval_for(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(hz.max(1)))
}

/// Level file override; the built-in levels are used when unset.
pub fn levels_path() -> Option<PathBuf> {
    env::var_os("LEVELS_PATH").map(PathBuf::from)
}

/// Gameplay tuning file; defaults are used when unset.
pub fn game_config_path() -> Option<PathBuf> {
    env::var_os("GAME_CONFIG_PATH").map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read game config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse game config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parses a TOML game config. Missing sections and fields keep their defaults.
pub fn parse_tuning(text: &str) -> Result<GameTuning, ConfigError> {
    toml::from_str(text).map_err(ConfigError::Parse)
}

pub fn load_tuning(path: &Path) -> Result<GameTuning, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_tuning(&text)
}
