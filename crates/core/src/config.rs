//! Session configuration
//!
//! Injected once at session construction; nothing in the core reads settings
//! from anywhere else.
//!
//! # Environment Variables
//!
//! - `TENMATCH_SPEED`: `slow`, `normal`, `fast`, or a slide step in pixels per tick
//! - `TENMATCH_TIME_LIMIT`: countdown length in seconds (default: 120)
//! - `TENMATCH_SEED`: RNG seed (default: derived from the system clock)
//! - `TENMATCH_PAIRS`: number of matchable pairs on the opening board (default: 20)
//!
//! Unparsable values fall back to the defaults.

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::types::{
    CELL_COUNT, DEFAULT_INITIAL_PAIRS, DEFAULT_SLIDE_STEP_PX, DEFAULT_TIME_LIMIT_SECS,
    FAST_SLIDE_STEP_PX, INTRO_MS, MAX_SLIDE_STEP_PX, SLOW_SLIDE_STEP_PX, SPAWN_EMPTY_MS,
    SPAWN_FILL_MS,
};

/// Named slide speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedPreset {
    Slow,
    Normal,
    Fast,
}

impl SpeedPreset {
    pub fn step_px(&self) -> f32 {
        match self {
            SpeedPreset::Slow => SLOW_SLIDE_STEP_PX,
            SpeedPreset::Normal => DEFAULT_SLIDE_STEP_PX,
            SpeedPreset::Fast => FAST_SLIDE_STEP_PX,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Some(SpeedPreset::Slow),
            "normal" => Some(SpeedPreset::Normal),
            "fast" => Some(SpeedPreset::Fast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "slow",
            SpeedPreset::Normal => "normal",
            SpeedPreset::Fast => "fast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("slide step {0}px is outside 0 < step <= {max}px", max = MAX_SLIDE_STEP_PX)]
    SlideStep(f32),
    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
    #[error("spawn bar durations must be non-zero")]
    ZeroSpawnDuration,
    #[error("{0} initial pairs do not fit on the board")]
    TooManyPairs(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Pixels a sliding tile moves per tick
    pub slide_step_px: f32,
    pub time_limit_secs: u32,
    pub spawn_empty_ms: u32,
    pub spawn_fill_ms: u32,
    pub initial_pairs: u8,
    /// Inputs are ignored for this long after the session starts
    pub intro_ms: u32,
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            slide_step_px: DEFAULT_SLIDE_STEP_PX,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            spawn_empty_ms: SPAWN_EMPTY_MS,
            spawn_fill_ms: SPAWN_FILL_MS,
            initial_pairs: DEFAULT_INITIAL_PAIRS,
            intro_ms: INTRO_MS,
            seed: 0,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let slide_step_px = env::var("TENMATCH_SPEED")
            .ok()
            .and_then(|s| parse_speed(&s))
            .unwrap_or(defaults.slide_step_px);

        let time_limit_secs = env::var("TENMATCH_TIME_LIMIT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.time_limit_secs);

        let seed = env::var("TENMATCH_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let initial_pairs = env::var("TENMATCH_PAIRS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.initial_pairs);

        Self {
            slide_step_px,
            time_limit_secs,
            initial_pairs,
            seed,
            ..defaults
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_speed(mut self, preset: SpeedPreset) -> Self {
        self.slide_step_px = preset.step_px();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.slide_step_px > 0.0 && self.slide_step_px <= MAX_SLIDE_STEP_PX) {
            return Err(ConfigError::SlideStep(self.slide_step_px));
        }
        if self.time_limit_secs == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.spawn_empty_ms == 0 || self.spawn_fill_ms == 0 {
            return Err(ConfigError::ZeroSpawnDuration);
        }
        if self.initial_pairs as usize * 2 > CELL_COUNT {
            return Err(ConfigError::TooManyPairs(self.initial_pairs));
        }
        Ok(())
    }
}

fn parse_speed(s: &str) -> Option<f32> {
    SpeedPreset::from_str(s)
        .map(|p| p.step_px())
        .or_else(|| s.trim().parse().ok())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
