//! Render Pipeline
//!
//! The pipeline asset and the top-level loop rendering every camera of a
//! frame with one shared camera renderer.

use serde::{Deserialize, Serialize};

use crate::camera_renderer::CameraRenderer;
use crate::context::{GraphicsSettings, RenderContext};
use crate::diagnostics::FrameDiagnostics;
use crate::error::Result;
use crate::scene::Camera;
use crate::shadow::{ShadowMaskMode, ShadowSettings};

/// Pipeline configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineAsset {
    pub use_dynamic_batching: bool,
    pub use_gpu_instancing: bool,
    pub use_srp_batcher: bool,
    /// Quality-level shadow-mask mode
    pub shadow_mask_mode: ShadowMaskMode,
    pub shadows: ShadowSettings,
}

impl Default for PipelineAsset {
    fn default() -> Self {
        Self {
            use_dynamic_batching: true,
            use_gpu_instancing: true,
            use_srp_batcher: true,
            shadow_mask_mode: ShadowMaskMode::default(),
            shadows: ShadowSettings::default(),
        }
    }
}

impl PipelineAsset {
    /// Clamp every value into its valid range
    pub fn validate(&mut self) {
        self.shadows.validate();
    }

    /// Reject out-of-range values
    pub fn checked(self) -> Result<Self> {
        self.shadows.checked()?;
        Ok(self)
    }

    pub fn graphics_settings(&self) -> GraphicsSettings {
        GraphicsSettings {
            use_srp_batcher: self.use_srp_batcher,
            lights_use_linear_intensity: true,
        }
    }
}

/// Outcome of one `RenderPipeline::render` call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub cameras_rendered: usize,
    pub cameras_skipped: usize,
}

/// Custom forward render pipeline
pub struct RenderPipeline {
    asset: PipelineAsset,
    renderer: CameraRenderer,
}

impl RenderPipeline {
    pub fn new(asset: PipelineAsset, diagnostics: Box<dyn FrameDiagnostics>) -> Self {
        Self {
            asset,
            renderer: CameraRenderer::new(diagnostics),
        }
    }

    pub fn asset(&self) -> &PipelineAsset {
        &self.asset
    }

    /// Replace the asset; takes effect on the next `render`
    pub fn set_asset(&mut self, asset: PipelineAsset) {
        self.asset = asset;
    }

    /// Render `cameras` in order
    pub fn render(&mut self, ctx: &mut dyn RenderContext, cameras: &[Camera]) -> FrameStats {
        ctx.apply_graphics_settings(self.asset.graphics_settings());

        let mut stats = FrameStats::default();
        for camera in cameras {
            match self.renderer.render(ctx, camera, &self.asset) {
                Ok(()) => stats.cameras_rendered += 1,
                Err(_) => stats.cameras_skipped += 1,
            }
        }
        stats
    }

    pub fn renderer(&self) -> &CameraRenderer {
        &self.renderer
    }
}
