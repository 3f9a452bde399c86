//! Application-level configuration loading, including the game timing and motion settings.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MOVING_HOOP_BACK_CONFIG_PATH";
/// Default capacity of the surface broadcast channel.
const DEFAULT_SURFACE_CAPACITY: usize = 64;

/// Timing and motion parameters applied to every game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSettings {
    /// Length of the countdown before aiming starts, in ticks.
    pub countdown_seconds: u32,
    /// Period of the countdown ticker.
    pub countdown_tick: Duration,
    /// Period of the aiming ticker.
    pub aiming_tick: Duration,
    /// Maximum aiming time of a single-player game.
    pub single_duration: Duration,
    /// Maximum aiming time of a tournament.
    pub tournament_duration: Duration,
    /// Delay between the final summary and the registry cleanup.
    pub cleanup_delay: Duration,
    /// Hoop speed in track units per tick.
    pub hoop_speed: f64,
    /// Aim speed in track units per tick.
    pub aim_speed: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            countdown_seconds: 3,
            countdown_tick: Duration::from_secs(1),
            aiming_tick: Duration::from_millis(100),
            single_duration: Duration::from_secs(20),
            tournament_duration: Duration::from_secs(30),
            cleanup_delay: Duration::from_secs(60),
            hoop_speed: 0.8,
            aim_speed: 1.3,
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    game: GameSettings,
    surface_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => match Self::try_from(raw) {
                    Ok(app_config) => {
                        info!(
                            path = %path.display(),
                            settings = ?app_config.game,
                            "loaded game settings from config"
                        );
                        app_config
                    }
                    Err(err) => {
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "invalid config values; falling back to defaults"
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration around explicit game settings.
    pub fn with_game(game: GameSettings) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }

    /// Settings applied to every new game.
    pub fn game(&self) -> &GameSettings {
        &self.game
    }

    /// Capacity of the surface event channel.
    pub fn surface_capacity(&self) -> usize {
        self.surface_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            surface_capacity: DEFAULT_SURFACE_CAPACITY,
        }
    }
}

/// Reason a configuration file was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration that drives a timer was zero.
    #[error("`{0}` must be strictly positive")]
    ZeroDuration(&'static str),
    /// A speed was negative, zero or not finite.
    #[error("`{0}` must be a positive finite number")]
    InvalidSpeed(&'static str),
    /// The countdown would never tick.
    #[error("`countdown_seconds` must be at least 1")]
    EmptyCountdown,
    /// The surface channel needs room for at least one event.
    #[error("`surface_capacity` must be at least 1")]
    EmptySurface,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    game: RawGameSettings,
    surface_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the `game` section; every field is optional.
struct RawGameSettings {
    countdown_seconds: Option<u32>,
    countdown_tick_ms: Option<u64>,
    aiming_tick_ms: Option<u64>,
    single_duration_ms: Option<u64>,
    tournament_duration_ms: Option<u64>,
    cleanup_delay_ms: Option<u64>,
    hoop_speed: Option<f64>,
    aim_speed: Option<f64>,
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        let defaults = GameSettings::default();
        let raw = value.game;

        let millis = |field: &'static str, raw: Option<u64>, fallback: Duration| match raw {
            Some(0) => Err(ConfigError::ZeroDuration(field)),
            Some(ms) => Ok(Duration::from_millis(ms)),
            None => Ok(fallback),
        };
        let speed = |field: &'static str, raw: Option<f64>, fallback: f64| match raw {
            Some(v) if !v.is_finite() || v <= 0.0 => Err(ConfigError::InvalidSpeed(field)),
            Some(v) => Ok(v),
            None => Ok(fallback),
        };

        let countdown_seconds = match raw.countdown_seconds {
            Some(0) => return Err(ConfigError::EmptyCountdown),
            Some(n) => n,
            None => defaults.countdown_seconds,
        };
        let surface_capacity = match value.surface_capacity {
            Some(0) => return Err(ConfigError::EmptySurface),
            Some(n) => n,
            None => DEFAULT_SURFACE_CAPACITY,
        };

        Ok(Self {
            game: GameSettings {
                countdown_seconds,
                countdown_tick: millis(
                    "countdown_tick_ms",
                    raw.countdown_tick_ms,
                    defaults.countdown_tick,
                )?,
                aiming_tick: millis("aiming_tick_ms", raw.aiming_tick_ms, defaults.aiming_tick)?,
                single_duration: millis(
                    "single_duration_ms",
                    raw.single_duration_ms,
                    defaults.single_duration,
                )?,
                tournament_duration: millis(
                    "tournament_duration_ms",
                    raw.tournament_duration_ms,
                    defaults.tournament_duration,
                )?,
                cleanup_delay: millis(
                    "cleanup_delay_ms",
                    raw.cleanup_delay_ms,
                    defaults.cleanup_delay,
                )?,
                hoop_speed: speed("hoop_speed", raw.hoop_speed, defaults.hoop_speed)?,
                aim_speed: speed("aim_speed", raw.aim_speed, defaults.aim_speed)?,
            },
            surface_capacity,
        })
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
