//! Camera Renderer
//!
//! Renders one camera per call: cull, light and shadow setup, clear, opaque,
//! skybox, transparent, diagnostics, cleanup, submit.

use crp_math::Vec4;

use crate::command::CommandBuffer;
use crate::context::{
    DrawingSettings, FilteringSettings, PerObjectData, RenderContext, RenderQueueRange, SortingCriteria,
};
use crate::diagnostics::{FrameDiagnostics, NullDiagnostics};
use crate::error::Result;
use crate::lighting::Lighting;
use crate::pipeline::PipelineAsset;
use crate::properties::{LIT_SHADER_TAG, UNLIT_SHADER_TAG};
use crate::scene::{Camera, CullingResults};

/// Per-camera render loop
pub struct CameraRenderer {
    buffer: CommandBuffer,
    lighting: Lighting,
    diagnostics: Box<dyn FrameDiagnostics>,
}

impl Default for CameraRenderer {
    fn default() -> Self {
        Self::new(Box::new(NullDiagnostics))
    }
}

impl CameraRenderer {
    pub fn new(diagnostics: Box<dyn FrameDiagnostics>) -> Self {
        Self {
            buffer: CommandBuffer::new(crate::diagnostics::DEFAULT_SAMPLE_NAME),
            lighting: Lighting::new(),
            diagnostics,
        }
    }

    /// Render `camera`
    ///
    /// A camera that cannot produce culling parameters is skipped: nothing is
    /// drawn or submitted for it and the error is returned.
    pub fn render(&mut self, ctx: &mut dyn RenderContext, camera: &Camera, asset: &PipelineAsset) -> Result<()> {
        let sample_name = self.diagnostics.sample_name(camera);
        self.buffer.set_name(sample_name.as_str());
        self.diagnostics.prepare_for_scene_window(ctx, camera);

        let culling = match self.cull(ctx, camera, asset.shadows.max_distance) {
            Ok(culling) => culling,
            Err(err) => {
                log::debug!("Skipping camera: {}", err);
                return Err(err);
            }
        };

        self.buffer.begin_sample(&sample_name);
        self.execute_buffer(ctx);
        self.lighting
            .setup(ctx, &culling, &asset.shadows, asset.shadow_mask_mode);
        self.buffer.end_sample(&sample_name);

        self.setup(ctx, camera, &sample_name);
        self.draw_visible_geometry(ctx, camera, &culling, asset);
        self.diagnostics.draw_unsupported_shaders(ctx, &culling, camera);
        self.diagnostics.draw_gizmos(ctx, camera);
        self.lighting.cleanup(ctx);
        self.submit(ctx, &sample_name);
        Ok(())
    }

    fn cull(&mut self, ctx: &mut dyn RenderContext, camera: &Camera, max_shadow_distance: f32) -> Result<CullingResults> {
        let parameters = camera.culling_parameters(max_shadow_distance)?;
        Ok(ctx.cull(&parameters))
    }

    fn setup(&mut self, ctx: &mut dyn RenderContext, camera: &Camera, sample_name: &str) {
        ctx.setup_camera_properties(camera);

        let flags = camera.clear_flags;
        let clear_color = if flags.clears_color() {
            camera.linear_background_color()
        } else {
            Vec4::ZERO
        };
        self.buffer
            .clear_render_target(flags.clears_depth(), flags.clears_color(), clear_color);
        self.buffer.begin_sample(sample_name);
        self.execute_buffer(ctx);
    }

    fn draw_visible_geometry(
        &mut self,
        ctx: &mut dyn RenderContext,
        camera: &Camera,
        culling: &CullingResults,
        asset: &PipelineAsset,
    ) {
        let mut drawing = Self::drawing_settings(SortingCriteria::CommonOpaque, asset);
        ctx.draw_renderers(culling, &drawing, &FilteringSettings::new(RenderQueueRange::OPAQUE));

        ctx.draw_skybox(camera);

        drawing.sorting = SortingCriteria::CommonTransparent;
        ctx.draw_renderers(culling, &drawing, &FilteringSettings::new(RenderQueueRange::TRANSPARENT));
    }

    /// Lit drawing settings for the pipeline's supported passes
    pub fn drawing_settings(sorting: SortingCriteria, asset: &PipelineAsset) -> DrawingSettings {
        let mut drawing = DrawingSettings::new(UNLIT_SHADER_TAG, sorting);
        drawing.set_shader_pass(1, LIT_SHADER_TAG);
        drawing.enable_dynamic_batching = asset.use_dynamic_batching;
        drawing.enable_instancing = asset.use_gpu_instancing;
        drawing.per_object_data = PerObjectData::BAKED_LIGHTING;
        drawing
    }

    fn submit(&mut self, ctx: &mut dyn RenderContext, sample_name: &str) {
        self.buffer.end_sample(sample_name);
        self.execute_buffer(ctx);
        ctx.submit();
    }

    fn execute_buffer(&mut self, ctx: &mut dyn RenderContext) {
        ctx.execute_command_buffer(&self.buffer);
        self.buffer.clear();
    }

    /// Lighting state of the last rendered camera
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawing_settings() {
        let asset = PipelineAsset {
            use_dynamic_batching: false,
            use_gpu_instancing: true,
            ..Default::default()
        };
        let drawing = CameraRenderer::drawing_settings(SortingCriteria::CommonOpaque, &asset);
        assert_eq!(drawing.shader_passes, vec![UNLIT_SHADER_TAG, LIT_SHADER_TAG]);
        assert!(!drawing.enable_dynamic_batching);
        assert!(drawing.enable_instancing);
        assert_eq!(drawing.per_object_data, PerObjectData::BAKED_LIGHTING);
        assert_eq!(drawing.override_material, None);
    }
}
