// File: crates/riso-core/src/error.rs
// Summary: Error type shared by chart construction, surfaces and export.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Fatal for the chart being constructed; siblings are unaffected.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("failed to allocate raster surface {width}x{height}")]
    SurfaceAllocation { width: i32, height: i32 },

    #[error("pixel transfer to or from the raster surface failed")]
    PixelTransfer,

    #[error("encode PNG failed")]
    Encode,

    #[error("invalid chart config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("surface has been released")]
    Released,

    #[error("animation already running")]
    AnimationInProgress,
}
