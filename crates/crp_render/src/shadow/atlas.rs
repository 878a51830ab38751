//! Shadow Atlas Layout
//!
//! Tiling of the single square directional shadow atlas. Tiles are laid out
//! row by row: tile `i` sits at column `i % split`, row `i / split`.

use crp_math::Vec2;

use crate::command::Viewport;
use super::settings::MAX_CASCADES;

/// Maximum directional lights that get an atlas slot per frame
pub const MAX_SHADOWED_DIRECTIONAL_LIGHTS: usize = 4;

/// Maximum tiles in the directional atlas
pub const MAX_TILES: usize = MAX_SHADOWED_DIRECTIONAL_LIGHTS * MAX_CASCADES;

/// Tiles per atlas edge for `tile_count` tiles: 1, 2 or 4
#[inline]
pub fn split_for(tile_count: usize) -> u32 {
    if tile_count <= 1 {
        1
    } else if tile_count <= 4 {
        2
    } else {
        4
    }
}

/// Layout of one frame's directional atlas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Atlas edge length in texels
    pub atlas_size: u32,
    /// Tiles per edge
    pub split: u32,
    /// Tile edge length in texels
    pub tile_size: u32,
}

impl AtlasLayout {
    pub fn new(atlas_size: u32, tile_count: usize) -> Self {
        let split = split_for(tile_count);
        Self {
            atlas_size,
            split,
            tile_size: atlas_size / split,
        }
    }

    /// Number of tiles the layout holds
    #[inline]
    pub fn capacity(&self) -> usize {
        (self.split * self.split) as usize
    }

    /// Tile position in tile units
    #[inline]
    pub fn tile_offset(&self, tile_index: usize) -> Vec2 {
        let split = self.split as usize;
        Vec2::new((tile_index % split) as f32, (tile_index / split) as f32)
    }

    /// Pixel rect of a tile
    pub fn tile_viewport(&self, tile_index: usize) -> Viewport {
        let offset = self.tile_offset(tile_index);
        let size = self.tile_size as f32;
        Viewport::new(offset.x * size, offset.y * size, size, size)
    }
}
