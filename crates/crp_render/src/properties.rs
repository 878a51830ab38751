//! Shader-facing names
//!
//! Global property and keyword identifiers shared with the shading stage.
//! Keyword groups are ordered: index `i` of a group is enabled for option
//! `i + 1` of the matching setting, and the first option enables none.

/// Shader property identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderPropertyId(pub &'static str);

impl ShaderPropertyId {
    #[inline]
    pub fn name(self) -> &'static str {
        self.0
    }
}

impl core::fmt::Display for ShaderPropertyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

// Lighting
pub const DIR_LIGHT_COUNT: ShaderPropertyId = ShaderPropertyId("_DirectionalLightCount");
pub const DIR_LIGHT_COLORS: ShaderPropertyId = ShaderPropertyId("_DirectionalLightColors");
pub const DIR_LIGHT_DIRECTIONS: ShaderPropertyId = ShaderPropertyId("_DirectionalLightDirections");
pub const DIR_LIGHT_SHADOW_DATA: ShaderPropertyId = ShaderPropertyId("_DirectionalLightShadowData");

// Shadows
pub const DIR_SHADOW_ATLAS: ShaderPropertyId = ShaderPropertyId("_DirectionalShadowAtlas");
pub const DIR_SHADOW_MATRICES: ShaderPropertyId = ShaderPropertyId("_DirectionalShadowMatrices");
pub const CASCADE_COUNT: ShaderPropertyId = ShaderPropertyId("_CascadeCount");
pub const CASCADE_CULLING_SPHERES: ShaderPropertyId = ShaderPropertyId("_CascadeCullingSpheres");
pub const CASCADE_DATA: ShaderPropertyId = ShaderPropertyId("_CascadeData");
pub const SHADOW_ATLAS_SIZE: ShaderPropertyId = ShaderPropertyId("_ShadowAtlasSize");
pub const SHADOW_DISTANCE_FADE: ShaderPropertyId = ShaderPropertyId("_ShadowDistanceFade");

/// Enabled for PCF3x3, PCF5x5, PCF7x7
pub const DIRECTIONAL_FILTER_KEYWORDS: [&str; 3] = [
    "_DIRECTIONAL_PCF3",
    "_DIRECTIONAL_PCF5",
    "_DIRECTIONAL_PCF7",
];

/// Enabled for Soft, Dither
pub const CASCADE_BLEND_KEYWORDS: [&str; 2] = [
    "_CASCADE_BLEND_SOFT",
    "_CASCADE_BLEND_DITHER",
];

/// Enabled for Shadowmask, DistanceShadowmask
pub const SHADOW_MASK_KEYWORDS: [&str; 2] = [
    "_SHADOW_MASK_ALWAYS",
    "_SHADOW_MASK_DISTANCE",
];

/// Shader pass tags
pub const UNLIT_SHADER_TAG: &str = "SRPDefaultUnlit";
pub const LIT_SHADER_TAG: &str = "CustomLit";

/// Passes of built-in shaders this pipeline does not support
pub const LEGACY_SHADER_TAGS: [&str; 6] = [
    "Always",
    "ForwardBase",
    "PrepassBase",
    "Vertex",
    "VertexLMRGBM",
    "VertexLM",
];
