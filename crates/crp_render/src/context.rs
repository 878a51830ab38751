//! Render Context
//!
//! The seam to the scene renderer: culling, the authoritative cascade math,
//! command execution and draw submission. The pipeline core only decides
//! what to draw and post-processes what the context hands back.

use serde::{Deserialize, Serialize};

use crp_math::{Aabb, Mat4, Sphere, Vec3};

use crate::command::CommandBuffer;
use crate::scene::{Camera, CullingParameters, CullingResults};

/// Backend capabilities that change the published data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderCapabilities {
    /// Depth buffer stores 1 at the near plane and 0 at the far plane
    pub reversed_z: bool,
}

/// Process-wide graphics settings the pipeline applies before rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphicsSettings {
    pub use_srp_batcher: bool,
    pub lights_use_linear_intensity: bool,
}

/// Culling data for one shadow cascade
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShadowSplitData {
    /// Sphere enclosing the cascade's slice of the view frustum
    pub culling_sphere: Sphere,
    /// Fraction of the sphere inside which casters already covered by the
    /// previous cascade may be culled
    pub shadow_cascade_blend_culling_factor: f32,
}

/// Inputs for one directional cascade
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalCascadeRequest {
    pub visible_light_index: usize,
    pub cascade_index: usize,
    pub cascade_count: usize,
    pub cascade_ratios: Vec3,
    /// Tile resolution in texels
    pub tile_size: u32,
    pub near_plane_offset: f32,
}

/// Matrices and culling data for one directional cascade
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalCascade {
    pub view: Mat4,
    pub projection: Mat4,
    pub split_data: ShadowSplitData,
}

/// Depth-only caster draw for one cascade
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowDrawingSettings {
    pub visible_light_index: usize,
    pub split_data: ShadowSplitData,
}

/// Draw ordering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortingCriteria {
    /// Front to back, grouped by material
    CommonOpaque,
    /// Back to front
    CommonTransparent,
}

/// Per-object data the context provides to lit shaders
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerObjectData(u32);

impl PerObjectData {
    pub const NONE: Self = Self(0);
    pub const LIGHT_PROBE: Self = Self(1 << 0);
    pub const LIGHTMAPS: Self = Self(1 << 1);
    pub const LIGHT_PROBE_PROXY_VOLUME: Self = Self(1 << 2);
    pub const SHADOW_MASK: Self = Self(1 << 3);
    pub const OCCLUSION_PROBE: Self = Self(1 << 4);
    pub const OCCLUSION_PROBE_PROXY_VOLUME: Self = Self(1 << 5);

    /// Everything baked lighting needs
    pub const BAKED_LIGHTING: Self = Self(
        Self::LIGHTMAPS.0
            | Self::SHADOW_MASK.0
            | Self::LIGHT_PROBE.0
            | Self::OCCLUSION_PROBE.0
            | Self::LIGHT_PROBE_PROXY_VOLUME.0
            | Self::OCCLUSION_PROBE_PROXY_VOLUME.0,
    );

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl core::ops::BitOr for PerObjectData {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Inclusive render queue range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderQueueRange {
    pub min: u32,
    pub max: u32,
}

impl RenderQueueRange {
    pub const ALL: Self = Self { min: 0, max: 5000 };
    pub const OPAQUE: Self = Self { min: 0, max: 2500 };
    pub const TRANSPARENT: Self = Self { min: 2501, max: 5000 };

    #[inline]
    pub fn contains(&self, queue: u32) -> bool {
        queue >= self.min && queue <= self.max
    }
}

/// Which visible renderers a draw includes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilteringSettings {
    pub render_queue_range: RenderQueueRange,
}

impl FilteringSettings {
    pub fn new(render_queue_range: RenderQueueRange) -> Self {
        Self { render_queue_range }
    }
}

/// How visible renderers are drawn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawingSettings {
    /// Shader pass tags, in priority order
    pub shader_passes: Vec<&'static str>,
    pub sorting: SortingCriteria,
    pub enable_dynamic_batching: bool,
    pub enable_instancing: bool,
    pub per_object_data: PerObjectData,
    /// Material replacing every renderer's own
    pub override_material: Option<&'static str>,
}

impl DrawingSettings {
    pub fn new(first_pass: &'static str, sorting: SortingCriteria) -> Self {
        Self {
            shader_passes: vec![first_pass],
            sorting,
            enable_dynamic_batching: false,
            enable_instancing: false,
            per_object_data: PerObjectData::NONE,
            override_material: None,
        }
    }

    /// Set the pass at `index`, extending the list as needed
    pub fn set_shader_pass(&mut self, index: usize, pass: &'static str) {
        if index < self.shader_passes.len() {
            self.shader_passes[index] = pass;
        } else {
            self.shader_passes.push(pass);
        }
    }
}

/// Gizmo groups relative to image effects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GizmoSubset {
    PreImageEffects,
    PostImageEffects,
}

/// The scene renderer the pipeline drives
///
/// Implementations must apply executed command buffers in order, before any
/// draw issued after them.
pub trait RenderContext {
    fn capabilities(&self) -> RenderCapabilities;

    fn apply_graphics_settings(&mut self, _settings: GraphicsSettings) {}

    fn cull(&mut self, parameters: &CullingParameters) -> CullingResults;

    /// Bounds of the shadow casters a visible light affects, if any
    fn shadow_caster_bounds(&self, culling: &CullingResults, visible_light_index: usize) -> Option<Aabb>;

    fn compute_directional_shadow_matrices_and_culling_primitives(
        &self,
        culling: &CullingResults,
        request: &DirectionalCascadeRequest,
    ) -> DirectionalCascade;

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer);

    fn draw_shadows(&mut self, culling: &CullingResults, settings: &ShadowDrawingSettings);

    fn setup_camera_properties(&mut self, camera: &Camera);

    fn draw_renderers(
        &mut self,
        culling: &CullingResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    );

    fn draw_skybox(&mut self, camera: &Camera);

    /// Emit UI geometry into the scene view
    fn draw_ui_geometry(&mut self, _camera: &Camera) {}

    fn draw_gizmos(&mut self, _camera: &Camera, _subset: GizmoSubset) {}

    fn should_render_gizmos(&self) -> bool {
        false
    }

    /// Flush everything recorded for the current camera
    fn submit(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baked_lighting_flags() {
        let flags = PerObjectData::BAKED_LIGHTING;
        assert!(flags.contains(PerObjectData::LIGHTMAPS));
        assert!(flags.contains(PerObjectData::SHADOW_MASK | PerObjectData::OCCLUSION_PROBE));
        assert_eq!(flags.bits().count_ones(), 6);
    }

    #[test]
    fn test_queue_ranges_disjoint() {
        assert!(RenderQueueRange::OPAQUE.contains(2000));
        assert!(!RenderQueueRange::TRANSPARENT.contains(2000));
        assert!(RenderQueueRange::TRANSPARENT.contains(3000));
        assert!(RenderQueueRange::ALL.contains(3000));
    }

    #[test]
    fn test_set_shader_pass() {
        let mut drawing = DrawingSettings::new("SRPDefaultUnlit", SortingCriteria::CommonOpaque);
        drawing.set_shader_pass(1, "CustomLit");
        drawing.set_shader_pass(0, "Always");
        assert_eq!(drawing.shader_passes, vec!["Always", "CustomLit"]);
    }
}
