//! Directional Lighting
//!
//! Collects up to four visible directional lights, reserves their shadows and
//! publishes the light arrays the lit shaders read. Array order follows the
//! visible-light enumeration, not the atlas reservation order; each light's
//! shadow vector carries its own atlas tile offset.

use bytemuck::Zeroable;

use crp_math::Vec4;

use crate::command::CommandBuffer;
use crate::context::RenderContext;
use crate::properties::{DIR_LIGHT_COLORS, DIR_LIGHT_COUNT, DIR_LIGHT_DIRECTIONS, DIR_LIGHT_SHADOW_DATA};
use crate::scene::{CullingResults, LightType, VisibleLight};
use crate::shadow::{ShadowMaskMode, ShadowReservation, ShadowSettings, Shadows};

/// Maximum directional lights passed to shaders
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

const BUFFER_NAME: &str = "Lighting";

/// Directional light uniform block (std140-compatible)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniforms {
    pub colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// `(strength, tile_offset, normal_bias, mask_channel)` per light
    pub shadow_data: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub count: i32,
    pub _pad: [i32; 3],
}

impl Default for DirectionalLightUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Per-camera lighting setup
pub struct Lighting {
    buffer: CommandBuffer,
    shadows: Shadows,

    count: usize,
    colors: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    directions: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    reservations: [ShadowReservation; MAX_DIRECTIONAL_LIGHTS],
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new()
    }
}

impl Lighting {
    pub fn new() -> Self {
        Self {
            buffer: CommandBuffer::new(BUFFER_NAME),
            shadows: Shadows::new(),
            count: 0,
            colors: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            directions: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            reservations: [ShadowReservation::NoShadow; MAX_DIRECTIONAL_LIGHTS],
        }
    }

    /// Publish the frame's lights and render their shadows
    pub fn setup(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &CullingResults,
        settings: &ShadowSettings,
        shadow_mask_mode: ShadowMaskMode,
    ) {
        self.buffer.begin_sample(BUFFER_NAME);
        self.shadows.setup(settings, shadow_mask_mode);
        self.setup_lights(&*ctx, culling);
        self.shadows.render(ctx, culling);
        self.buffer.end_sample(BUFFER_NAME);

        ctx.execute_command_buffer(&self.buffer);
        self.buffer.clear();
    }

    fn setup_lights(&mut self, ctx: &dyn RenderContext, culling: &CullingResults) {
        self.count = 0;
        self.colors = [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS];
        self.directions = [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS];
        self.reservations = [ShadowReservation::NoShadow; MAX_DIRECTIONAL_LIGHTS];

        for (visible_index, light) in culling.visible_lights.iter().enumerate() {
            if light.light.light_type != LightType::Directional {
                continue;
            }
            self.setup_directional_light(ctx, culling, self.count, visible_index, light);
            self.count += 1;
            if self.count >= MAX_DIRECTIONAL_LIGHTS {
                break;
            }
        }

        let shadow_data = self.reservations.map(ShadowReservation::to_shader_vector);

        self.buffer.set_global_int(DIR_LIGHT_COUNT, self.count as i32);
        self.buffer.set_global_vector_array(DIR_LIGHT_COLORS, &self.colors);
        self.buffer.set_global_vector_array(DIR_LIGHT_DIRECTIONS, &self.directions);
        self.buffer.set_global_vector_array(DIR_LIGHT_SHADOW_DATA, &shadow_data);
    }

    fn setup_directional_light(
        &mut self,
        ctx: &dyn RenderContext,
        culling: &CullingResults,
        index: usize,
        visible_index: usize,
        light: &VisibleLight,
    ) {
        self.colors[index] = light.final_color;
        self.directions[index] = -light.local_to_world.col(2);
        self.reservations[index] =
            self.shadows.reserve_directional_shadow(ctx, culling, light, visible_index);
    }

    /// Release frame resources once every lit draw has been issued
    pub fn cleanup(&mut self, ctx: &mut dyn RenderContext) {
        self.shadows.cleanup(ctx);
    }

    pub fn directional_light_count(&self) -> usize {
        self.count
    }

    /// Reservations of the published lights, in published order
    pub fn reservations(&self) -> &[ShadowReservation] {
        &self.reservations[..self.count]
    }

    pub fn shadows(&self) -> &Shadows {
        &self.shadows
    }

    /// Published light state as one uniform block
    pub fn uniforms(&self) -> DirectionalLightUniforms {
        let mut uniforms = DirectionalLightUniforms::default();
        for i in 0..MAX_DIRECTIONAL_LIGHTS {
            uniforms.colors[i] = self.colors[i].to_array();
            uniforms.directions[i] = self.directions[i].to_array();
            uniforms.shadow_data[i] = self.reservations[i].to_shader_vector().to_array();
        }
        uniforms.count = self.count as i32;
        uniforms
    }
}
