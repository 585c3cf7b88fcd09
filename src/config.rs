use std::{fs, io::ErrorKind, path::Path, time::Duration};

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::{engine::StagnationThreshold, error::ConfigError, prelude::*};

/// User-tunable settings, optionally read from a JSON file.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pixels per cell edge.
    pub resolution: u32,
    pub window_width: f32,
    pub window_height: f32,
    /// Seed for the first randomized board; each re-randomize advances it by one.
    pub seed: u64,
    pub step_interval_ms: u64,
    pub stagnation: StagnationThreshold,
    /// Stop an automatic run once the population stagnates.
    pub halt_on_stagnation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION_PX,
            window_width: DEFAULT_WINDOW_SIZE.x,
            window_height: DEFAULT_WINDOW_SIZE.y,
            seed: DEFAULT_SEED,
            step_interval_ms: UPDATE_INTERVAL_MS,
            stagnation: StagnationThreshold::default(),
            halt_on_stagnation: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing file is `Ok(None)` rather than an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::load(path) {
            Ok(settings) => Ok(Some(settings)),
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !(MIN_RESOLUTION_PX..=MAX_RESOLUTION_PX).contains(&self.resolution) {
            return Err(ConfigError::ResolutionOutOfRange {
                resolution: self.resolution,
                min: MIN_RESOLUTION_PX,
                max: MAX_RESOLUTION_PX,
            });
        }
        if self.step_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.stagnation == StagnationThreshold::Fixed(0) {
            return Err(ConfigError::ZeroStagnationThreshold);
        }
        Ok(())
    }

    #[inline]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

/// How many whole cells of `resolution` pixels fit on each axis of the surface.
///
/// Never returns a zero dimension.
pub fn grid_dimensions(
    surface_width: f32,
    surface_height: f32,
    resolution: u32,
) -> Result<(u32, u32), ConfigError> {
    if resolution == 0 {
        return Err(ConfigError::ZeroResolution);
    }
    let cells = |extent: f32| (extent.max(0.0) / resolution as f32).floor() as u32;
    match (cells(surface_width), cells(surface_height)) {
        (0, _) | (_, 0) => Err(ConfigError::SurfaceTooSmall {
            width: surface_width,
            height: surface_height,
            resolution,
        }),
        dims => Ok(dims),
    }
}
