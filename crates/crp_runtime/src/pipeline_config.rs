//! Pipeline Configuration
//!
//! Loads the pipeline asset the runner renders with.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `CRP_ATLAS_SIZE=2048`, `CRP_CASCADES=2`,
//!    `CRP_FILTER=pcf5x5`, `CRP_MAX_DISTANCE=60`, `CRP_FRAMES=10`,
//!    `CRP_EDITOR=1`
//! 2. Config file: first positional argument, else `pipeline.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! frames = 3
//! editor = false
//!
//! [pipeline]
//! use_srp_batcher = true
//! shadow_mask_mode = "DistanceShadowmask"
//!
//! [pipeline.shadows]
//! max_distance = 100.0
//! distance_fade = 0.1
//!
//! [pipeline.shadows.directional]
//! atlas_size = 2048
//! filter = "Pcf3x3"
//! cascade_count = 4
//! cascade_ratios = [0.1, 0.25, 0.5]
//! cascade_fade = 0.1
//! cascade_blend = "Soft"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crp_render::{AtlasSize, FilterMode, PipelineAsset, RenderError};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "pipeline.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse pipeline config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Override {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Invalid(#[from] RenderError),
}

/// Complete runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Frames to render before exiting
    pub frames: u32,
    /// Render through the editor diagnostics
    pub editor: bool,
    pub pipeline: PipelineAsset,
    /// File the config came from
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frames: 3,
            editor: false,
            pipeline: PipelineAsset::default(),
            config_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::args().skip(1).find(|arg| !arg.starts_with("--"));

        let mut config = match explicit {
            Some(path) => Self::load_from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from_file(DEFAULT_CONFIG_FILE)?,
            None => {
                log::info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.pipeline = config.pipeline.checked()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_string());
        log::info!("Loaded pipeline config from {}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `CRP_*` overrides; `lookup` returns a variable's value if set
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let directional = &mut self.pipeline.shadows.directional;

        if let Some(value) = lookup("CRP_ATLAS_SIZE") {
            let texels: u32 = parse_var("CRP_ATLAS_SIZE", &value)?;
            directional.atlas_size = AtlasSize::try_from(texels)?;
            log::info!("Atlas size from env: {}", texels);
        }

        if let Some(value) = lookup("CRP_CASCADES") {
            directional.cascade_count = parse_var("CRP_CASCADES", &value)?;
        }

        if let Some(value) = lookup("CRP_FILTER") {
            directional.filter = value
                .parse::<FilterMode>()
                .map_err(|reason| ConfigError::Override {
                    var: "CRP_FILTER",
                    value: value.clone(),
                    reason,
                })?;
            log::info!("Shadow filter from env: {}", directional.filter);
        }

        if let Some(value) = lookup("CRP_MAX_DISTANCE") {
            self.pipeline.shadows.max_distance = parse_var("CRP_MAX_DISTANCE", &value)?;
        }

        if let Some(value) = lookup("CRP_FRAMES") {
            self.frames = parse_var("CRP_FRAMES", &value)?;
        }

        if let Some(value) = lookup("CRP_EDITOR") {
            self.editor = value == "1" || value.eq_ignore_ascii_case("true");
        }

        Ok(())
    }

    /// Log a one-screen summary
    pub fn print_summary(&self) {
        let shadows = &self.pipeline.shadows;
        let directional = &shadows.directional;
        log::info!("Pipeline configuration:");
        log::info!("  Source: {}", self.config_path.as_deref().unwrap_or("defaults"));
        log::info!("  Frames: {}", self.frames);
        log::info!("  Editor diagnostics: {}", self.editor);
        log::info!(
            "  Batching: dynamic={} instancing={} srp={}",
            self.pipeline.use_dynamic_batching,
            self.pipeline.use_gpu_instancing,
            self.pipeline.use_srp_batcher
        );
        log::info!("  Shadow mask mode: {:?}", self.pipeline.shadow_mask_mode);
        log::info!(
            "  Shadows: max distance {}, fade {}",
            shadows.max_distance,
            shadows.distance_fade
        );
        log::info!(
            "  Atlas: {}px, {} cascade(s) {:?}, filter {}, blend {:?}",
            directional.atlas_size.texels(),
            directional.cascade_count,
            directional.cascade_ratios,
            directional.filter,
            directional.cascade_blend
        );
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Override {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
