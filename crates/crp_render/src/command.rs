//! Command Buffer
//!
//! Backend-agnostic recording of global render-state changes. Components
//! record into their own named buffer and hand it to the render context for
//! execution; the context applies the commands in order and the component
//! clears the buffer afterwards.
//!
//! Draw calls are not recorded here. They go straight to the context so that
//! the state they depend on is always flushed first.

use crp_math::{Mat4, Vec4};

use crate::properties::ShaderPropertyId;

/// Texture formats the pipeline allocates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Depth texture usable with comparison sampling
    Shadowmap,
}

impl TextureFormat {
    pub fn is_depth(&self) -> bool {
        matches!(self, Self::Shadowmap)
    }
}

/// Texture sampling filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Bilinear,
}

/// Temporary render texture description
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemporaryTextureDesc {
    pub width: u32,
    pub height: u32,
    /// Depth buffer bits
    pub depth_bits: u32,
    pub filter: TextureFilter,
    pub format: TextureFormat,
}

impl TemporaryTextureDesc {
    /// Square 32-bit shadow-map texture with bilinear comparison filtering
    pub fn shadow_map(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            depth_bits: 32,
            filter: TextureFilter::Bilinear,
            format: TextureFormat::Shadowmap,
        }
    }
}

/// Pixel-space viewport rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// A recorded render-state command
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    /// Open a named profiling scope
    BeginSample(String),
    /// Close a named profiling scope
    EndSample(String),
    SetGlobalInt {
        id: ShaderPropertyId,
        value: i32,
    },
    SetGlobalVector {
        id: ShaderPropertyId,
        value: Vec4,
    },
    SetGlobalVectorArray {
        id: ShaderPropertyId,
        values: Vec<Vec4>,
    },
    SetGlobalMatrixArray {
        id: ShaderPropertyId,
        values: Vec<Mat4>,
    },
    /// Allocate a frame-temporary texture bound to a global property
    GetTemporaryTexture {
        id: ShaderPropertyId,
        desc: TemporaryTextureDesc,
    },
    ReleaseTemporaryTexture {
        id: ShaderPropertyId,
    },
    /// Bind a temporary texture as the render target (contents are not loaded)
    SetRenderTarget {
        id: ShaderPropertyId,
    },
    ClearRenderTarget {
        depth: bool,
        color: bool,
        color_value: Vec4,
    },
    SetViewport(Viewport),
    SetViewProjectionMatrices {
        view: Mat4,
        projection: Mat4,
    },
    SetGlobalDepthBias {
        bias: f32,
        slope_bias: f32,
    },
    EnableKeyword(&'static str),
    DisableKeyword(&'static str),
}

/// Named list of render-state commands
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<RenderCommand>,
}

impl CommandBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn begin_sample(&mut self, name: &str) {
        self.commands.push(RenderCommand::BeginSample(name.to_owned()));
    }

    pub fn end_sample(&mut self, name: &str) {
        self.commands.push(RenderCommand::EndSample(name.to_owned()));
    }

    pub fn set_global_int(&mut self, id: ShaderPropertyId, value: i32) {
        self.commands.push(RenderCommand::SetGlobalInt { id, value });
    }

    pub fn set_global_vector(&mut self, id: ShaderPropertyId, value: Vec4) {
        self.commands.push(RenderCommand::SetGlobalVector { id, value });
    }

    pub fn set_global_vector_array(&mut self, id: ShaderPropertyId, values: &[Vec4]) {
        self.commands.push(RenderCommand::SetGlobalVectorArray {
            id,
            values: values.to_vec(),
        });
    }

    pub fn set_global_matrix_array(&mut self, id: ShaderPropertyId, values: &[Mat4]) {
        self.commands.push(RenderCommand::SetGlobalMatrixArray {
            id,
            values: values.to_vec(),
        });
    }

    pub fn get_temporary_texture(&mut self, id: ShaderPropertyId, desc: TemporaryTextureDesc) {
        self.commands.push(RenderCommand::GetTemporaryTexture { id, desc });
    }

    pub fn release_temporary_texture(&mut self, id: ShaderPropertyId) {
        self.commands.push(RenderCommand::ReleaseTemporaryTexture { id });
    }

    pub fn set_render_target(&mut self, id: ShaderPropertyId) {
        self.commands.push(RenderCommand::SetRenderTarget { id });
    }

    pub fn clear_render_target(&mut self, depth: bool, color: bool, color_value: Vec4) {
        self.commands.push(RenderCommand::ClearRenderTarget {
            depth,
            color,
            color_value,
        });
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(RenderCommand::SetViewport(viewport));
    }

    pub fn set_view_projection_matrices(&mut self, view: Mat4, projection: Mat4) {
        self.commands
            .push(RenderCommand::SetViewProjectionMatrices { view, projection });
    }

    pub fn set_global_depth_bias(&mut self, bias: f32, slope_bias: f32) {
        self.commands
            .push(RenderCommand::SetGlobalDepthBias { bias, slope_bias });
    }

    pub fn enable_keyword(&mut self, keyword: &'static str) {
        self.commands.push(RenderCommand::EnableKeyword(keyword));
    }

    pub fn disable_keyword(&mut self, keyword: &'static str) {
        self.commands.push(RenderCommand::DisableKeyword(keyword));
    }

    /// Enable `keywords[enabled_index]` and disable the rest of the group.
    /// A negative index disables the whole group.
    pub fn set_keywords(&mut self, keywords: &[&'static str], enabled_index: i32) {
        for (i, &keyword) in keywords.iter().enumerate() {
            if i as i32 == enabled_index {
                self.enable_keyword(keyword);
            } else {
                self.disable_keyword(keyword);
            }
        }
    }
}
