//! Shadow Reservation
//!
//! Outcome of asking for a directional light's atlas space, and the packed
//! per-light vector the shading stage reads.

use crp_math::Vec4;

/// Mask channel value meaning "no baked shadow mask"
pub const NO_MASK_CHANNEL: i32 = -1;

/// Result of `Shadows::reserve_directional_shadow`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShadowReservation {
    /// The light receives no shadows at all
    NoShadow,
    /// Only baked shadow-mask data applies; nothing is rasterized
    ShadowMaskOnly { strength: f32, mask_channel: i32 },
    /// The light's cascades are rendered into the atlas
    Rasterized {
        strength: f32,
        /// First atlas tile of the light's cascades
        tile_offset: u32,
        normal_bias: f32,
        mask_channel: i32,
    },
}

impl ShadowReservation {
    /// Packed `(strength, tile_offset, normal_bias, mask_channel)`
    ///
    /// Shadow-mask-only results carry a negated strength so the shading stage
    /// can tell them from rasterized shadows without a separate flag.
    pub fn to_shader_vector(self) -> Vec4 {
        match self {
            Self::NoShadow => Vec4::new(0.0, 0.0, 0.0, NO_MASK_CHANNEL as f32),
            Self::ShadowMaskOnly { strength, mask_channel } => {
                Vec4::new(-strength, 0.0, 0.0, mask_channel as f32)
            }
            Self::Rasterized {
                strength,
                tile_offset,
                normal_bias,
                mask_channel,
            } => Vec4::new(strength, tile_offset as f32, normal_bias, mask_channel as f32),
        }
    }

    /// Decode a packed vector
    pub fn from_shader_vector(v: Vec4) -> Self {
        let mask_channel = v.w as i32;
        if v.x > 0.0 {
            Self::Rasterized {
                strength: v.x,
                tile_offset: v.y as u32,
                normal_bias: v.z,
                mask_channel,
            }
        } else if v.x < 0.0 {
            Self::ShadowMaskOnly {
                strength: -v.x,
                mask_channel,
            }
        } else {
            Self::NoShadow
        }
    }

    #[inline]
    pub fn is_rasterized(&self) -> bool {
        matches!(self, Self::Rasterized { .. })
    }

    /// Baked shadow-mask channel, if any
    pub fn mask_channel(&self) -> Option<i32> {
        match *self {
            Self::NoShadow => None,
            Self::ShadowMaskOnly { mask_channel, .. } | Self::Rasterized { mask_channel, .. } => {
                (mask_channel >= 0).then_some(mask_channel)
            }
        }
    }
}

/// A light that was given atlas space this frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShadowedDirectionalLight {
    /// Index into the frame's visible lights
    pub visible_light_index: usize,
    pub slope_scale_bias: f32,
    pub near_plane_offset: f32,
}
