//! Cascade Math
//!
//! Post-processing of the cascade matrices and culling spheres the render
//! context supplies: the world-to-atlas matrix, filter-aware culling data and
//! the fade parameters the shading stage uses to pick and blend cascades.

use crp_math::{consts, Mat4, Sphere, Vec2, Vec3, Vec4};

use super::settings::FilterMode;

/// Negates clip-space Z when the depth buffer is reversed
pub fn reversed_z_correction(reversed_z: bool) -> Mat4 {
    if reversed_z {
        Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0))
    } else {
        Mat4::IDENTITY
    }
}

/// Maps clip space [-1, 1] on every axis to [0, 1]
pub fn ndc_to_unit() -> Mat4 {
    Mat4::from_scale_translation(Vec3::splat(0.5), Vec3::splat(0.5))
}

/// Scales unit UV into one tile of a `split x split` atlas at `offset` (tile units)
pub fn tile_scale_offset(offset: Vec2, split: u32) -> Mat4 {
    let scale = 1.0 / split as f32;
    Mat4::from_scale_translation(
        Vec3::new(scale, scale, 1.0),
        Vec3::new(offset.x * scale, offset.y * scale, 0.0),
    )
}

/// World-to-atlas matrix for the tile at `offset`
///
/// `m` is the cascade's `projection * view`. The result maps a world point to
/// `(u, v, depth)` with UV inside the tile and depth in [0, 1].
pub fn convert_to_atlas_matrix(m: Mat4, offset: Vec2, split: u32, reversed_z: bool) -> Mat4 {
    tile_scale_offset(offset, split) * ndc_to_unit() * reversed_z_correction(reversed_z) * m
}

/// Blend culling factor for the cascade split data
#[inline]
pub fn blend_culling_factor(cascade_fade: f32) -> f32 {
    (0.8 - cascade_fade).max(0.0)
}

/// Shader-side cascade selection data
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CascadeCullingData {
    /// `(center, adjusted_radius²)`
    pub culling_sphere: Vec4,
    /// `(1 / adjusted_radius², filter_size * √2, 0, 0)`
    pub data: Vec4,
}

impl CascadeCullingData {
    /// Shrink the culling sphere by the filter footprint so filter taps stay
    /// inside the cascade
    pub fn new(sphere: Sphere, tile_size: u32, filter: FilterMode) -> Self {
        let texel_size = 2.0 * sphere.radius / tile_size as f32;
        let filter_size = texel_size * (filter.ordinal() as f32 + 1.0);
        let radius = sphere.radius - filter_size;
        let radius_sq = radius * radius;

        Self {
            culling_sphere: sphere.center.extend(radius_sq),
            data: Vec4::new(1.0 / radius_sq, filter_size * consts::SQRT_2, 0.0, 0.0),
        }
    }

    /// Radius left after the filter adjustment
    #[inline]
    pub fn adjusted_radius(&self) -> f32 {
        self.culling_sphere.w.sqrt()
    }
}

/// `(1 / max_distance, 1 / distance_fade, 1 / (1 - f²), 0)` with `f = 1 - cascade_fade`
pub fn distance_fade_vector(max_distance: f32, distance_fade: f32, cascade_fade: f32) -> Vec4 {
    let f = 1.0 - cascade_fade;
    Vec4::new(1.0 / max_distance, 1.0 / distance_fade, 1.0 / (1.0 - f * f), 0.0)
}

/// `(size, 1 / size, 0, 0)`
#[inline]
pub fn atlas_size_vector(atlas_size: u32) -> Vec4 {
    let size = atlas_size as f32;
    Vec4::new(size, 1.0 / size, 0.0, 0.0)
}
