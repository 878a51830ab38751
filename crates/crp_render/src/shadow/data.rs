//! GPU Shadow Data
//!
//! The published directional shadow globals packed into one uniform block,
//! for backends that upload a buffer instead of binding loose globals.

use bytemuck::Zeroable;

use super::atlas::MAX_TILES;
use super::settings::MAX_CASCADES;

/// Directional shadow uniform block (std140-compatible)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalShadowUniforms {
    /// World-to-atlas matrix per tile
    pub matrices: [[[f32; 4]; 4]; MAX_TILES],

    /// `(center, adjusted_radius²)` per cascade
    pub cascade_culling_spheres: [[f32; 4]; MAX_CASCADES],

    /// `(1 / adjusted_radius², filter_size * √2, 0, 0)` per cascade
    pub cascade_data: [[f32; 4]; MAX_CASCADES],

    /// `(1 / max_distance, 1 / distance_fade, 1 / (1 - f²), 0)`
    pub distance_fade: [f32; 4],

    /// `(size, 1 / size, 0, 0)`
    pub atlas_size: [f32; 4],

    pub cascade_count: i32,

    pub _pad: [i32; 3],
}

impl Default for DirectionalShadowUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl DirectionalShadowUniforms {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
