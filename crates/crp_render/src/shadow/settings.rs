//! Shadow Settings
//!
//! Designer-authored shadow configuration, shared read-only across a frame.
//! Serde support lets the pipeline asset be stored on disk.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crp_math::Vec3;

/// Maximum cascades per directional light
pub const MAX_CASCADES: usize = 4;

/// Shadow atlas edge length in texels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AtlasSize {
    S256 = 256,
    S512 = 512,
    S1024 = 1024,
    S2048 = 2048,
    S4096 = 4096,
    S8192 = 8192,
}

impl AtlasSize {
    #[inline]
    pub fn texels(self) -> u32 {
        self as u32
    }
}

impl Default for AtlasSize {
    fn default() -> Self {
        Self::S1024
    }
}

impl TryFrom<u32> for AtlasSize {
    type Error = RenderError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            256 => Ok(Self::S256),
            512 => Ok(Self::S512),
            1024 => Ok(Self::S1024),
            2048 => Ok(Self::S2048),
            4096 => Ok(Self::S4096),
            8192 => Ok(Self::S8192),
            other => Err(RenderError::InvalidAtlasSize(other)),
        }
    }
}

impl From<AtlasSize> for u32 {
    fn from(size: AtlasSize) -> u32 {
        size.texels()
    }
}

/// PCF filter kernel used when sampling the atlas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    Pcf2x2,
    Pcf3x3,
    Pcf5x5,
    Pcf7x7,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [Self::Pcf2x2, Self::Pcf3x3, Self::Pcf5x5, Self::Pcf7x7];

    /// Zero-based position in the enum
    #[inline]
    pub fn ordinal(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pcf2x2 => write!(f, "pcf2x2"),
            Self::Pcf3x3 => write!(f, "pcf3x3"),
            Self::Pcf5x5 => write!(f, "pcf5x5"),
            Self::Pcf7x7 => write!(f, "pcf7x7"),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pcf2x2" | "2x2" | "2" => Ok(Self::Pcf2x2),
            "pcf3x3" | "3x3" | "3" => Ok(Self::Pcf3x3),
            "pcf5x5" | "5x5" | "5" => Ok(Self::Pcf5x5),
            "pcf7x7" | "7x7" | "7" => Ok(Self::Pcf7x7),
            _ => Err(format!("Unknown shadow filter: {}", s)),
        }
    }
}

/// How neighbouring cascades are combined near their boundary
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CascadeBlendMode {
    #[default]
    Hard,
    Soft,
    Dither,
}

impl CascadeBlendMode {
    #[inline]
    pub fn ordinal(self) -> i32 {
        self as i32
    }
}

/// Quality-level choice of how baked shadow masks combine with realtime shadows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadowMaskMode {
    /// Baked shadows replace realtime shadows for static geometry everywhere
    Shadowmask,
    /// Realtime shadows up to the shadow distance, baked beyond it
    #[default]
    DistanceShadowmask,
}

/// Directional-light shadow settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalShadowSettings {
    /// Atlas edge length
    pub atlas_size: AtlasSize,

    /// Sampling filter
    pub filter: FilterMode,

    /// Cascade count (1-4)
    pub cascade_count: u32,

    /// Cascade split ratios as fractions of the max shadow distance
    pub cascade_ratios: [f32; 3],

    /// Cascade fade range as a fraction of each cascade's extent
    pub cascade_fade: f32,

    /// Cascade boundary blending
    pub cascade_blend: CascadeBlendMode,
}

impl Default for DirectionalShadowSettings {
    fn default() -> Self {
        Self {
            atlas_size: AtlasSize::S1024,
            filter: FilterMode::Pcf2x2,
            cascade_count: 4,
            cascade_ratios: [0.1, 0.25, 0.5],
            cascade_fade: 0.1,
            cascade_blend: CascadeBlendMode::Hard,
        }
    }
}

impl DirectionalShadowSettings {
    /// Cascade ratios as a vector, the form culling expects
    #[inline]
    pub fn cascade_ratios_vec(&self) -> Vec3 {
        Vec3::new(self.cascade_ratios[0], self.cascade_ratios[1], self.cascade_ratios[2])
    }

    /// Cascade count clamped to the supported range
    #[inline]
    pub fn clamped_cascade_count(&self) -> usize {
        self.cascade_count.clamp(1, MAX_CASCADES as u32) as usize
    }
}

/// Global shadow settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Maximum distance from the camera at which shadows are rendered
    pub max_distance: f32,

    /// Fraction of `max_distance` over which shadows fade out
    pub distance_fade: f32,

    /// Directional light shadows
    pub directional: DirectionalShadowSettings,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            distance_fade: 0.1,
            directional: DirectionalShadowSettings::default(),
        }
    }
}

impl ShadowSettings {
    /// Clamp every value into its valid range
    pub fn validate(&mut self) {
        self.max_distance = self.max_distance.max(0.001);
        self.distance_fade = self.distance_fade.clamp(0.001, 1.0);

        let d = &mut self.directional;
        d.cascade_count = d.cascade_count.clamp(1, MAX_CASCADES as u32);
        for ratio in d.cascade_ratios.iter_mut() {
            *ratio = ratio.clamp(0.0, 1.0);
        }
        // keep the ratios increasing
        d.cascade_ratios[1] = d.cascade_ratios[1].max(d.cascade_ratios[0]);
        d.cascade_ratios[2] = d.cascade_ratios[2].max(d.cascade_ratios[1]);
        d.cascade_fade = d.cascade_fade.clamp(0.001, 1.0);
    }

    /// Reject out-of-range values instead of clamping them
    pub fn checked(self) -> Result<Self> {
        let d = &self.directional;
        if !(1..=MAX_CASCADES as u32).contains(&d.cascade_count) {
            return Err(RenderError::InvalidCascadeCount(d.cascade_count));
        }
        if !(self.max_distance > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "max_distance must be positive, got {}",
                self.max_distance
            )));
        }
        if !(self.distance_fade > 0.0 && self.distance_fade <= 1.0) {
            return Err(RenderError::InvalidSettings(format!(
                "distance_fade must be in (0, 1], got {}",
                self.distance_fade
            )));
        }
        if !(d.cascade_fade > 0.0 && d.cascade_fade <= 1.0) {
            return Err(RenderError::InvalidSettings(format!(
                "cascade_fade must be in (0, 1], got {}",
                d.cascade_fade
            )));
        }
        let [r1, r2, r3] = d.cascade_ratios;
        if !(0.0..=1.0).contains(&r1) || !(r1..=1.0).contains(&r2) || !(r2..=1.0).contains(&r3) {
            return Err(RenderError::InvalidSettings(format!(
                "cascade ratios must be increasing within [0, 1], got {:?}",
                d.cascade_ratios
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ShadowSettings::default();
        assert_eq!(settings.max_distance, 100.0);
        assert_eq!(settings.directional.atlas_size.texels(), 1024);
        assert_eq!(settings.directional.cascade_count, 4);
        assert_eq!(settings.directional.filter, FilterMode::Pcf2x2);
        assert!(settings.checked().is_ok());
    }

    #[test]
    fn test_atlas_size_try_from() {
        assert_eq!(AtlasSize::try_from(2048), Ok(AtlasSize::S2048));
        assert_eq!(AtlasSize::try_from(1000), Err(RenderError::InvalidAtlasSize(1000)));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("PCF5x5".parse::<FilterMode>(), Ok(FilterMode::Pcf5x5));
        assert_eq!("3".parse::<FilterMode>(), Ok(FilterMode::Pcf3x3));
        assert!("bilinear".parse::<FilterMode>().is_err());
        for filter in FilterMode::ALL {
            assert_eq!(filter.to_string().parse::<FilterMode>(), Ok(filter));
        }
    }

    #[test]
    fn test_validate_clamps() {
        let mut settings = ShadowSettings {
            max_distance: -5.0,
            distance_fade: 3.0,
            directional: DirectionalShadowSettings {
                cascade_count: 9,
                cascade_ratios: [0.5, 0.2, 1.5],
                cascade_fade: 0.0,
                ..Default::default()
            },
        };

        settings.validate();

        assert_eq!(settings.max_distance, 0.001);
        assert_eq!(settings.distance_fade, 1.0);
        assert_eq!(settings.directional.cascade_count, 4);
        assert_eq!(settings.directional.cascade_ratios, [0.5, 0.5, 1.0]);
        assert_eq!(settings.directional.cascade_fade, 0.001);
        assert!(settings.checked().is_ok());
    }

    #[test]
    fn test_checked_rejects_cascade_count() {
        let mut settings = ShadowSettings::default();
        settings.directional.cascade_count = 0;
        assert_eq!(settings.checked(), Err(RenderError::InvalidCascadeCount(0)));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut settings = ShadowSettings::default();
        settings.directional.atlas_size = AtlasSize::S4096;
        settings.directional.filter = FilterMode::Pcf7x7;
        settings.directional.cascade_blend = CascadeBlendMode::Dither;

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("4096"));
        let restored: ShadowSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settings);
    }

    #[test]
    fn test_deserialize_rejects_bad_atlas_size() {
        let json = r#"{ "directional": { "atlas_size": 300 } }"#;
        assert!(serde_json::from_str::<ShadowSettings>(json).is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let json = r#"{ "max_distance": 50.0 }"#;
        let settings: ShadowSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.max_distance, 50.0);
        assert_eq!(settings.directional, DirectionalShadowSettings::default());
    }
}
