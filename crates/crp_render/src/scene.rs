//! Scene inputs
//!
//! Cameras and lights as the culling collaborator hands them to the
//! pipeline, plus the culling parameters and results exchanged with it.

use serde::{Deserialize, Serialize};

use crp_math::{Mat4, Vec3, Vec4};

use crate::error::{RenderError, Result};

/// Light type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightType {
    #[default]
    Directional,
    Point,
    Spot,
}

/// Realtime shadow mode of a light
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightShadows {
    #[default]
    None,
    Hard,
    Soft,
}

/// How a light contributes to baked lighting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightmapBakeType {
    #[default]
    Realtime,
    Mixed,
    Baked,
}

/// Lighting mode used when a mixed light was baked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MixedLightingMode {
    #[default]
    IndirectOnly,
    Shadowmask,
    Subtractive,
}

/// Result of the last lighting bake for a light
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightBakingOutput {
    pub bake_type: LightmapBakeType,
    pub mixed_lighting_mode: MixedLightingMode,
    /// Shadow-mask channel (0-3), -1 when none was assigned
    pub occlusion_mask_channel: i32,
}

impl Default for LightBakingOutput {
    fn default() -> Self {
        Self {
            bake_type: LightmapBakeType::Realtime,
            mixed_lighting_mode: MixedLightingMode::IndirectOnly,
            occlusion_mask_channel: -1,
        }
    }
}

impl LightBakingOutput {
    /// Mixed light baked with shadow-mask lighting
    #[inline]
    pub fn uses_shadow_mask(&self) -> bool {
        self.bake_type == LightmapBakeType::Mixed
            && self.mixed_lighting_mode == MixedLightingMode::Shadowmask
    }
}

/// Authored light parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub light_type: LightType,
    pub shadows: LightShadows,
    pub shadow_strength: f32,
    /// Slope-scale depth bias applied while rendering casters
    pub shadow_bias: f32,
    pub shadow_normal_bias: f32,
    pub shadow_near_plane: f32,
    pub baking_output: LightBakingOutput,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::Directional,
            shadows: LightShadows::None,
            shadow_strength: 1.0,
            shadow_bias: 0.05,
            shadow_normal_bias: 0.4,
            shadow_near_plane: 0.2,
            baking_output: LightBakingOutput::default(),
        }
    }
}

/// A light that survived culling
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleLight {
    pub light: Light,
    /// Linear color premultiplied by intensity
    pub final_color: Vec4,
    pub local_to_world: Mat4,
}

impl VisibleLight {
    /// Direction the light travels, normalized
    pub fn forward(&self) -> Vec3 {
        self.local_to_world.col(2).truncate().normalize()
    }
}

/// Which view a camera renders
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraType {
    #[default]
    Game,
    SceneView,
    Preview,
    Reflection,
}

/// Camera clear flags, ordered from most to least clearing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClearFlags {
    #[default]
    Skybox = 1,
    Color = 2,
    Depth = 3,
    Nothing = 4,
}

impl ClearFlags {
    #[inline]
    pub fn clears_depth(self) -> bool {
        self <= Self::Depth
    }

    #[inline]
    pub fn clears_color(self) -> bool {
        self == Self::Color
    }
}

/// Perspective camera
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub name: String,
    pub camera_type: CameraType,
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub clear_flags: ClearFlags,
    /// Background color in sRGB
    pub background_color: Vec4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            name: "Main Camera".to_string(),
            camera_type: CameraType::Game,
            position: Vec3::new(0.0, 1.0, 10.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.3,
            far: 1000.0,
            clear_flags: ClearFlags::Skybox,
            background_color: Vec4::new(0.19, 0.3, 0.47, 1.0),
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.forward, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(crp_math::radians(self.fov_y), self.aspect, self.near, self.far)
    }

    /// Background color converted to linear space
    pub fn linear_background_color(&self) -> Vec4 {
        let c = self.background_color;
        Vec4::new(
            crp_math::srgb_to_linear(c.x),
            crp_math::srgb_to_linear(c.y),
            crp_math::srgb_to_linear(c.z),
            c.w,
        )
    }

    /// Culling parameters with the shadow distance limited by the far plane
    pub fn culling_parameters(&self, max_shadow_distance: f32) -> Result<CullingParameters> {
        let degenerate = |reason: &str| RenderError::DegenerateCamera {
            camera: self.name.clone(),
            reason: reason.to_string(),
        };

        if !(self.fov_y > 0.0 && self.fov_y < 180.0) {
            return Err(degenerate("field of view must be in (0, 180) degrees"));
        }
        if !(self.aspect > 0.0) || !self.aspect.is_finite() {
            return Err(degenerate("aspect ratio must be positive"));
        }
        if !(self.near > 0.0) {
            return Err(degenerate("near plane must be positive"));
        }
        if !(self.far > self.near) || !self.far.is_finite() {
            return Err(degenerate("far plane must lie beyond the near plane"));
        }
        if !self.position.is_finite() || !self.forward.is_finite() || !self.up.is_finite() {
            return Err(degenerate("transform is not finite"));
        }
        if self.forward.length_squared() < 1e-12 || self.forward.cross(self.up).length_squared() < 1e-12 {
            return Err(degenerate("forward and up do not span a view basis"));
        }

        Ok(CullingParameters {
            position: self.position,
            forward: self.forward.normalize(),
            up: self.up.normalize(),
            fov_y: self.fov_y,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
            shadow_distance: max_shadow_distance.min(self.far),
            view: self.view_matrix(),
            projection: self.projection_matrix(),
        })
    }
}

/// Camera state culling works from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CullingParameters {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Distance up to which shadows are rendered
    pub shadow_distance: f32,
    pub view: Mat4,
    pub projection: Mat4,
}

/// What survived culling for one camera
#[derive(Clone, Debug)]
pub struct CullingResults {
    pub parameters: CullingParameters,
    pub visible_lights: Vec<VisibleLight>,
    /// Indices of visible renderers in the context's scene
    pub visible_renderers: Vec<usize>,
}
