//! Error types for the render pipeline
//!
//! Nothing inside a frame fails: degenerate inputs degrade to missing
//! shadows or a skipped camera. Errors surface when settings are built from
//! untrusted values and when a camera cannot produce culling parameters.

use thiserror::Error;

/// Render pipeline errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Atlas edge length is not one of the supported power-of-two sizes
    #[error("Unsupported shadow atlas size: {0} (expected 256, 512, 1024, 2048, 4096 or 8192)")]
    InvalidAtlasSize(u32),

    /// Cascade count outside 1..=4
    #[error("Invalid cascade count: {0} (expected 1 to 4)")]
    InvalidCascadeCount(u32),

    /// A settings value is out of range
    #[error("Invalid shadow settings: {0}")]
    InvalidSettings(String),

    /// Camera cannot produce culling parameters
    #[error("Camera '{camera}' is degenerate: {reason}")]
    DegenerateCamera { camera: String, reason: String },
}

/// Result type for render pipeline operations
pub type Result<T> = std::result::Result<T, RenderError>;
