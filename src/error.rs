//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Coordinates outside `[0, width) × [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("resolution must be at least one pixel per cell")]
    ZeroResolution,

    #[error("resolution {resolution}px is outside {min}..={max}px")]
    ResolutionOutOfRange { resolution: u32, min: u32, max: u32 },

    #[error("step interval must be positive")]
    ZeroInterval,

    #[error("stagnation threshold must be at least one generation")]
    ZeroStagnationThreshold,

    /// The drawing surface cannot fit a single cell on some axis.
    #[error("a {width}x{height} surface cannot fit a single {resolution}px cell")]
    SurfaceTooSmall {
        width: f32,
        height: f32,
        resolution: u32,
    },
}
