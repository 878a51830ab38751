//! # crp_render - Custom Forward Render Pipeline
//!
//! Per-camera forward rendering driven through an abstract render context:
//! - Directional lighting (up to four lights)
//! - Cascaded directional shadows packed into one atlas
//! - Shadow-mask integration for baked shadows
//! - Editor diagnostics behind a capability trait
//! - A headless context for running whole frames without a GPU
//!
//! ## Architecture
//!
//! 1. **RenderPipeline**: owns the asset and renders every camera in order
//! 2. **CameraRenderer**: cull, light, clear, draw, clean up, submit
//! 3. **Lighting / Shadows**: publish light arrays, reserve and render the atlas
//! 4. **RenderContext**: the scene renderer seam (culling, cascade math, draws)
//!
//! ## Example
//!
//! ```ignore
//! use crp_render::prelude::*;
//!
//! let mut ctx = HeadlessContext::new(scene);
//! let mut pipeline = RenderPipeline::new(PipelineAsset::default(), Box::new(NullDiagnostics));
//!
//! let stats = pipeline.render(&mut ctx, &[Camera::default()]);
//! assert_eq!(stats.cameras_rendered, 1);
//!
//! let fade = ctx.globals().vector(SHADOW_DISTANCE_FADE);
//! ```

pub mod error;
pub mod properties;
pub mod command;
pub mod globals;
pub mod scene;
pub mod context;
pub mod shadow;
pub mod lighting;
pub mod diagnostics;
pub mod camera_renderer;
pub mod pipeline;
pub mod headless;

pub use error::{RenderError, Result};
pub use command::{
    CommandBuffer, RenderCommand, TemporaryTextureDesc, TextureFilter, TextureFormat, Viewport,
};
pub use globals::{ShaderGlobals, ShaderValue};
pub use scene::{
    Camera, CameraType, ClearFlags, CullingParameters, CullingResults, Light, LightBakingOutput,
    LightShadows, LightType, LightmapBakeType, MixedLightingMode, VisibleLight,
};
pub use context::{
    DirectionalCascade, DirectionalCascadeRequest, DrawingSettings, FilteringSettings, GizmoSubset,
    GraphicsSettings, PerObjectData, RenderCapabilities, RenderContext, RenderQueueRange,
    ShadowDrawingSettings, ShadowSplitData, SortingCriteria,
};

// Shadows
pub use shadow::{
    AtlasLayout, AtlasSize, CascadeBlendMode, CascadeCullingData, DirectionalShadowSettings,
    DirectionalShadowUniforms, FilterMode, ShadowMaskMode, ShadowReservation, ShadowSettings,
    ShadowedDirectionalLight, Shadows, MAX_CASCADES, MAX_SHADOWED_DIRECTIONAL_LIGHTS, MAX_TILES,
};

// Lighting and per-camera rendering
pub use lighting::{DirectionalLightUniforms, Lighting, MAX_DIRECTIONAL_LIGHTS};
pub use diagnostics::{EditorDiagnostics, FrameDiagnostics, NullDiagnostics};
pub use camera_renderer::CameraRenderer;
pub use pipeline::{FrameStats, PipelineAsset, RenderPipeline};
pub use headless::{FrameEvent, HeadlessContext, Scene, SceneLight, SceneRenderer};

pub mod prelude {
    pub use crate::{
        Camera, ClearFlags, EditorDiagnostics, FrameDiagnostics, HeadlessContext, Light,
        LightShadows, NullDiagnostics, PipelineAsset, RenderContext, RenderPipeline, Scene,
        SceneLight, SceneRenderer, ShadowSettings,
    };
    pub use crate::properties::*;
}
