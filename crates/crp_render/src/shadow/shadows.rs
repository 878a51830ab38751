//! Directional Shadows
//!
//! Per-frame atlas reservation and cascade rendering. Call order within a
//! frame is `setup`, any number of `reserve_directional_shadow`, `render`,
//! the lit draws that sample the atlas, then `cleanup`.

use crp_math::{Mat4, Sphere, Vec4};

use crate::command::{CommandBuffer, TemporaryTextureDesc};
use crate::context::{DirectionalCascadeRequest, RenderContext, ShadowDrawingSettings};
use crate::properties::*;
use crate::scene::{CullingResults, LightShadows, VisibleLight};

use super::atlas::{AtlasLayout, MAX_SHADOWED_DIRECTIONAL_LIGHTS, MAX_TILES};
use super::cascade::{self, CascadeCullingData};
use super::data::DirectionalShadowUniforms;
use super::reservation::{ShadowReservation, ShadowedDirectionalLight, NO_MASK_CHANNEL};
use super::settings::{ShadowMaskMode, ShadowSettings, MAX_CASCADES};

const BUFFER_NAME: &str = "Shadows";

/// Directional shadow atlas owner
pub struct Shadows {
    buffer: CommandBuffer,
    settings: ShadowSettings,
    shadow_mask_mode: ShadowMaskMode,

    lights: [ShadowedDirectionalLight; MAX_SHADOWED_DIRECTIONAL_LIGHTS],
    light_count: usize,
    use_shadow_mask: bool,

    matrices: [Mat4; MAX_TILES],
    cascades: [CascadeCullingData; MAX_CASCADES],
    layout: Option<AtlasLayout>,
}

impl Default for Shadows {
    fn default() -> Self {
        Self::new()
    }
}

impl Shadows {
    pub fn new() -> Self {
        Self {
            buffer: CommandBuffer::new(BUFFER_NAME),
            settings: ShadowSettings::default(),
            shadow_mask_mode: ShadowMaskMode::default(),
            lights: [ShadowedDirectionalLight::default(); MAX_SHADOWED_DIRECTIONAL_LIGHTS],
            light_count: 0,
            use_shadow_mask: false,
            matrices: [Mat4::IDENTITY; MAX_TILES],
            cascades: [CascadeCullingData::default(); MAX_CASCADES],
            layout: None,
        }
    }

    /// Start a frame
    pub fn setup(&mut self, settings: &ShadowSettings, shadow_mask_mode: ShadowMaskMode) {
        self.settings = *settings;
        self.shadow_mask_mode = shadow_mask_mode;
        self.light_count = 0;
        self.use_shadow_mask = false;
        self.layout = None;
        self.matrices = [Mat4::IDENTITY; MAX_TILES];
        self.cascades = [CascadeCullingData::default(); MAX_CASCADES];
    }

    /// Ask for atlas space for a visible directional light
    pub fn reserve_directional_shadow(
        &mut self,
        ctx: &dyn RenderContext,
        culling: &CullingResults,
        light: &VisibleLight,
        visible_light_index: usize,
    ) -> ShadowReservation {
        if self.light_count >= MAX_SHADOWED_DIRECTIONAL_LIGHTS {
            return ShadowReservation::NoShadow;
        }

        let authored = &light.light;
        if authored.shadows == LightShadows::None || !(authored.shadow_strength > 0.0) {
            return ShadowReservation::NoShadow;
        }

        let mut mask_channel = NO_MASK_CHANNEL;
        if authored.baking_output.uses_shadow_mask() {
            self.use_shadow_mask = true;
            mask_channel = authored.baking_output.occlusion_mask_channel;
        }

        if ctx.shadow_caster_bounds(culling, visible_light_index).is_none() {
            return ShadowReservation::ShadowMaskOnly {
                strength: authored.shadow_strength,
                mask_channel,
            };
        }

        let index = self.light_count;
        self.lights[index] = ShadowedDirectionalLight {
            visible_light_index,
            slope_scale_bias: authored.shadow_bias,
            near_plane_offset: authored.shadow_near_plane,
        };
        self.light_count += 1;

        ShadowReservation::Rasterized {
            strength: authored.shadow_strength,
            tile_offset: (index * self.settings.directional.clamped_cascade_count()) as u32,
            normal_bias: authored.shadow_normal_bias,
            mask_channel,
        }
    }

    /// Render every reserved light into the atlas and publish the shadow globals
    pub fn render(&mut self, ctx: &mut dyn RenderContext, culling: &CullingResults) {
        if self.light_count > 0 {
            self.render_directional_shadows(ctx, culling);
        } else {
            // keep a bindable texture for shaders that sample the atlas
            self.buffer
                .get_temporary_texture(DIR_SHADOW_ATLAS, TemporaryTextureDesc::shadow_map(1));
        }

        let mask_index = match (self.use_shadow_mask, self.shadow_mask_mode) {
            (false, _) => -1,
            (true, ShadowMaskMode::Shadowmask) => 0,
            (true, ShadowMaskMode::DistanceShadowmask) => 1,
        };

        self.buffer.begin_sample(BUFFER_NAME);
        self.buffer.set_keywords(&SHADOW_MASK_KEYWORDS, mask_index);
        self.buffer.end_sample(BUFFER_NAME);
        self.execute_buffer(ctx);

        log::debug!(
            "Shadows: {} light(s) rasterized, shadow mask {}",
            self.light_count,
            if self.use_shadow_mask { "on" } else { "off" }
        );
    }

    fn render_directional_shadows(&mut self, ctx: &mut dyn RenderContext, culling: &CullingResults) {
        let directional = self.settings.directional;
        let atlas_size = directional.atlas_size.texels();

        self.buffer
            .get_temporary_texture(DIR_SHADOW_ATLAS, TemporaryTextureDesc::shadow_map(atlas_size));
        self.buffer.set_render_target(DIR_SHADOW_ATLAS);
        self.buffer.clear_render_target(true, false, Vec4::ZERO);
        self.buffer.begin_sample(BUFFER_NAME);
        self.execute_buffer(ctx);

        let cascade_count = directional.clamped_cascade_count();
        let layout = AtlasLayout::new(atlas_size, self.light_count * cascade_count);
        self.layout = Some(layout);

        let reversed_z = ctx.capabilities().reversed_z;
        for light_index in 0..self.light_count {
            self.render_directional_shadow_in_atlas(ctx, culling, light_index, &layout, reversed_z);
        }

        let spheres = self.cascades.map(|c| c.culling_sphere);
        let data = self.cascades.map(|c| c.data);

        self.buffer.set_global_int(CASCADE_COUNT, cascade_count as i32);
        self.buffer.set_global_vector_array(CASCADE_CULLING_SPHERES, &spheres);
        self.buffer.set_global_vector_array(CASCADE_DATA, &data);
        self.buffer.set_global_matrix_array(DIR_SHADOW_MATRICES, &self.matrices);
        self.buffer.set_global_vector(
            SHADOW_DISTANCE_FADE,
            cascade::distance_fade_vector(
                self.settings.max_distance,
                self.settings.distance_fade,
                directional.cascade_fade,
            ),
        );
        self.buffer
            .set_keywords(&DIRECTIONAL_FILTER_KEYWORDS, directional.filter.ordinal() - 1);
        self.buffer
            .set_keywords(&CASCADE_BLEND_KEYWORDS, directional.cascade_blend.ordinal() - 1);
        self.buffer
            .set_global_vector(SHADOW_ATLAS_SIZE, cascade::atlas_size_vector(atlas_size));
        self.buffer.end_sample(BUFFER_NAME);
        self.execute_buffer(ctx);
    }

    fn render_directional_shadow_in_atlas(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &CullingResults,
        light_index: usize,
        layout: &AtlasLayout,
        reversed_z: bool,
    ) {
        let light = self.lights[light_index];
        let directional = self.settings.directional;
        let cascade_count = directional.clamped_cascade_count();
        let tile_offset = light_index * cascade_count;
        let blend_factor = cascade::blend_culling_factor(directional.cascade_fade);

        for cascade_index in 0..cascade_count {
            let request = DirectionalCascadeRequest {
                visible_light_index: light.visible_light_index,
                cascade_index,
                cascade_count,
                cascade_ratios: directional.cascade_ratios_vec(),
                tile_size: layout.tile_size,
                near_plane_offset: light.near_plane_offset,
            };
            let cascade = ctx.compute_directional_shadow_matrices_and_culling_primitives(culling, &request);

            let mut split_data = cascade.split_data;
            split_data.shadow_cascade_blend_culling_factor = blend_factor;

            if light_index == 0 {
                self.set_cascade_data(cascade_index, split_data.culling_sphere, layout.tile_size);
            }

            let tile_index = tile_offset + cascade_index;
            let viewport = layout.tile_viewport(tile_index);
            self.buffer.set_viewport(viewport);
            self.matrices[tile_index] = cascade::convert_to_atlas_matrix(
                cascade.projection * cascade.view,
                layout.tile_offset(tile_index),
                layout.split,
                reversed_z,
            );

            log::trace!(
                "Shadow tile {} (light {}, cascade {}) at {:?}",
                tile_index,
                light.visible_light_index,
                cascade_index,
                viewport
            );

            self.buffer.set_view_projection_matrices(cascade.view, cascade.projection);
            self.buffer.set_global_depth_bias(0.0, light.slope_scale_bias);
            self.execute_buffer(ctx);
            ctx.draw_shadows(
                culling,
                &ShadowDrawingSettings {
                    visible_light_index: light.visible_light_index,
                    split_data,
                },
            );
            self.buffer.set_global_depth_bias(0.0, 0.0);
        }
    }

    fn set_cascade_data(&mut self, index: usize, sphere: Sphere, tile_size: u32) {
        self.cascades[index] =
            CascadeCullingData::new(sphere, tile_size, self.settings.directional.filter);
    }

    /// Release the atlas
    pub fn cleanup(&mut self, ctx: &mut dyn RenderContext) {
        self.buffer.release_temporary_texture(DIR_SHADOW_ATLAS);
        self.execute_buffer(ctx);
    }

    fn execute_buffer(&mut self, ctx: &mut dyn RenderContext) {
        ctx.execute_command_buffer(&self.buffer);
        self.buffer.clear();
    }

    /// Lights reserved this frame, in reservation order
    pub fn shadowed_lights(&self) -> &[ShadowedDirectionalLight] {
        &self.lights[..self.light_count]
    }

    pub fn reserved_count(&self) -> usize {
        self.light_count
    }

    /// Whether any reserved or mask-only light uses baked shadow masks
    pub fn uses_shadow_mask(&self) -> bool {
        self.use_shadow_mask
    }

    /// Atlas layout of the last `render`, `None` when nothing was rasterized
    pub fn layout(&self) -> Option<AtlasLayout> {
        self.layout
    }

    pub fn directional_matrices(&self) -> &[Mat4; MAX_TILES] {
        &self.matrices
    }

    pub fn cascade_data(&self) -> &[CascadeCullingData; MAX_CASCADES] {
        &self.cascades
    }

    /// Published shadow state as one uniform block
    pub fn uniforms(&self) -> DirectionalShadowUniforms {
        let mut uniforms = DirectionalShadowUniforms::default();
        let Some(layout) = self.layout else {
            return uniforms;
        };

        let directional = &self.settings.directional;
        for (dst, m) in uniforms.matrices.iter_mut().zip(self.matrices.iter()) {
            *dst = m.to_cols_array_2d();
        }
        for (i, cascade) in self.cascades.iter().enumerate() {
            uniforms.cascade_culling_spheres[i] = cascade.culling_sphere.to_array();
            uniforms.cascade_data[i] = cascade.data.to_array();
        }
        uniforms.distance_fade = cascade::distance_fade_vector(
            self.settings.max_distance,
            self.settings.distance_fade,
            directional.cascade_fade,
        )
        .to_array();
        uniforms.atlas_size = cascade::atlas_size_vector(layout.atlas_size).to_array();
        uniforms.cascade_count = directional.clamped_cascade_count() as i32;
        uniforms
    }
}
