//! Frame Diagnostics
//!
//! Editor-only hooks around a camera's frame. The renderer always calls them;
//! `NullDiagnostics` does nothing, `EditorDiagnostics` makes unsupported
//! materials visible and draws gizmos.

use crate::context::{
    DrawingSettings, FilteringSettings, GizmoSubset, RenderContext, RenderQueueRange, SortingCriteria,
};
use crate::properties::LEGACY_SHADER_TAGS;
use crate::scene::{Camera, CameraType, CullingResults};

/// Material drawn in place of shaders the pipeline cannot render
pub const ERROR_MATERIAL: &str = "Hidden/InternalErrorShader";

/// Default buffer and sample name for camera work
pub const DEFAULT_SAMPLE_NAME: &str = "Render Camera";

/// Diagnostics capability injected into the camera renderer
pub trait FrameDiagnostics {
    /// Name for the camera's command buffer and profiling sample
    fn sample_name(&self, _camera: &Camera) -> String {
        DEFAULT_SAMPLE_NAME.to_string()
    }

    /// Called before culling so scene-view geometry is included
    fn prepare_for_scene_window(&mut self, _ctx: &mut dyn RenderContext, _camera: &Camera) {}

    fn draw_unsupported_shaders(
        &mut self,
        _ctx: &mut dyn RenderContext,
        _culling: &CullingResults,
        _camera: &Camera,
    ) {
    }

    fn draw_gizmos(&mut self, _ctx: &mut dyn RenderContext, _camera: &Camera) {}
}

/// Diagnostics that do nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDiagnostics;

impl FrameDiagnostics for NullDiagnostics {}

/// Editor diagnostics
#[derive(Clone, Debug)]
pub struct EditorDiagnostics {
    /// Profile each camera under its own name
    pub per_camera_samples: bool,
}

impl Default for EditorDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorDiagnostics {
    pub fn new() -> Self {
        Self {
            per_camera_samples: true,
        }
    }

    /// Drawing settings covering every legacy pass with the error material
    pub fn unsupported_drawing_settings() -> DrawingSettings {
        let mut drawing = DrawingSettings::new(LEGACY_SHADER_TAGS[0], SortingCriteria::CommonOpaque);
        for (i, &tag) in LEGACY_SHADER_TAGS.iter().enumerate().skip(1) {
            drawing.set_shader_pass(i, tag);
        }
        drawing.override_material = Some(ERROR_MATERIAL);
        drawing
    }
}

impl FrameDiagnostics for EditorDiagnostics {
    fn sample_name(&self, camera: &Camera) -> String {
        if self.per_camera_samples {
            camera.name.clone()
        } else {
            DEFAULT_SAMPLE_NAME.to_string()
        }
    }

    fn prepare_for_scene_window(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        if camera.camera_type == CameraType::SceneView {
            ctx.draw_ui_geometry(camera);
        }
    }

    fn draw_unsupported_shaders(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &CullingResults,
        _camera: &Camera,
    ) {
        let drawing = Self::unsupported_drawing_settings();
        let filtering = FilteringSettings::new(RenderQueueRange::ALL);
        ctx.draw_renderers(culling, &drawing, &filtering);
    }

    fn draw_gizmos(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        if ctx.should_render_gizmos() {
            ctx.draw_gizmos(camera, GizmoSubset::PreImageEffects);
            ctx.draw_gizmos(camera, GizmoSubset::PostImageEffects);
        }
    }
}
