//! Shader Globals
//!
//! The state an executing context builds up from command buffers: global
//! properties, enabled keywords and frame-temporary textures. This is what
//! the shading stage samples.

use std::collections::{BTreeMap, BTreeSet};

use crp_math::{Mat4, Vec4};

use crate::command::{RenderCommand, TemporaryTextureDesc, Viewport};
use crate::properties::ShaderPropertyId;

/// A published global value
#[derive(Clone, Debug, PartialEq)]
pub enum ShaderValue {
    Int(i32),
    Vector(Vec4),
    VectorArray(Vec<Vec4>),
    MatrixArray(Vec<Mat4>),
}

/// Global shader state
#[derive(Clone, Debug, Default)]
pub struct ShaderGlobals {
    values: BTreeMap<ShaderPropertyId, ShaderValue>,
    keywords: BTreeSet<&'static str>,
    textures: BTreeMap<ShaderPropertyId, TemporaryTextureDesc>,
    render_target: Option<ShaderPropertyId>,
    viewport: Option<Viewport>,
    view_projection: Option<(Mat4, Mat4)>,
    depth_bias: (f32, f32),
    last_clear: Option<(bool, bool, Vec4)>,
    sample_stack: Vec<String>,
}

impl ShaderGlobals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command
    pub fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::BeginSample(name) => self.sample_stack.push(name.clone()),
            RenderCommand::EndSample(name) => match self.sample_stack.pop() {
                Some(open) if open == *name => {}
                Some(open) => {
                    log::warn!("Sample '{}' closed while '{}' was open", name, open);
                }
                None => log::warn!("Sample '{}' closed without being opened", name),
            },
            RenderCommand::SetGlobalInt { id, value } => {
                self.values.insert(*id, ShaderValue::Int(*value));
            }
            RenderCommand::SetGlobalVector { id, value } => {
                self.values.insert(*id, ShaderValue::Vector(*value));
            }
            RenderCommand::SetGlobalVectorArray { id, values } => {
                self.values.insert(*id, ShaderValue::VectorArray(values.clone()));
            }
            RenderCommand::SetGlobalMatrixArray { id, values } => {
                self.values.insert(*id, ShaderValue::MatrixArray(values.clone()));
            }
            RenderCommand::GetTemporaryTexture { id, desc } => {
                if self.textures.insert(*id, *desc).is_some() {
                    log::warn!("Temporary texture {} allocated twice without release", id);
                }
            }
            RenderCommand::ReleaseTemporaryTexture { id } => {
                if self.textures.remove(id).is_none() {
                    log::warn!("Released temporary texture {} that was not allocated", id);
                }
                if self.render_target == Some(*id) {
                    self.render_target = None;
                }
            }
            RenderCommand::SetRenderTarget { id } => {
                if !self.textures.contains_key(id) {
                    log::warn!("Render target {} bound before allocation", id);
                }
                self.render_target = Some(*id);
            }
            RenderCommand::ClearRenderTarget {
                depth,
                color,
                color_value,
            } => self.last_clear = Some((*depth, *color, *color_value)),
            RenderCommand::SetViewport(viewport) => self.viewport = Some(*viewport),
            RenderCommand::SetViewProjectionMatrices { view, projection } => {
                self.view_projection = Some((*view, *projection));
            }
            RenderCommand::SetGlobalDepthBias { bias, slope_bias } => {
                self.depth_bias = (*bias, *slope_bias);
            }
            RenderCommand::EnableKeyword(keyword) => {
                self.keywords.insert(*keyword);
            }
            RenderCommand::DisableKeyword(keyword) => {
                self.keywords.remove(keyword);
            }
        }
    }

    pub fn apply_all(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            self.apply(command);
        }
    }

    pub fn value(&self, id: ShaderPropertyId) -> Option<&ShaderValue> {
        self.values.get(&id)
    }

    pub fn int(&self, id: ShaderPropertyId) -> Option<i32> {
        match self.values.get(&id) {
            Some(ShaderValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn vector(&self, id: ShaderPropertyId) -> Option<Vec4> {
        match self.values.get(&id) {
            Some(ShaderValue::Vector(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn vector_array(&self, id: ShaderPropertyId) -> Option<&[Vec4]> {
        match self.values.get(&id) {
            Some(ShaderValue::VectorArray(v)) => Some(v),
            _ => None,
        }
    }

    pub fn matrix_array(&self, id: ShaderPropertyId) -> Option<&[Mat4]> {
        match self.values.get(&id) {
            Some(ShaderValue::MatrixArray(v)) => Some(v),
            _ => None,
        }
    }

    pub fn is_keyword_enabled(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    pub fn enabled_keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.iter().copied()
    }

    pub fn texture(&self, id: ShaderPropertyId) -> Option<&TemporaryTextureDesc> {
        self.textures.get(&id)
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn render_target(&self) -> Option<ShaderPropertyId> {
        self.render_target
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn view_projection(&self) -> Option<(Mat4, Mat4)> {
        self.view_projection
    }

    /// Current `(bias, slope_bias)`
    pub fn depth_bias(&self) -> (f32, f32) {
        self.depth_bias
    }

    /// Most recent clear as `(depth, color, color_value)`
    pub fn last_clear(&self) -> Option<(bool, bool, Vec4)> {
        self.last_clear
    }

    /// Number of profiling samples still open
    pub fn open_samples(&self) -> usize {
        self.sample_stack.len()
    }
}
