//! Headless Render Context
//!
//! A software `RenderContext` over an in-memory scene. Culling and cascade
//! fitting are computed on the CPU, executed command buffers update a
//! `ShaderGlobals` store, and every draw is appended to a frame log instead
//! of reaching a GPU.

use crp_math::{Aabb, Mat4, Sphere, Vec3, Vec4};

use crate::command::CommandBuffer;
use crate::context::*;
use crate::globals::ShaderGlobals;
use crate::scene::{Camera, CullingParameters, CullingResults, Light, VisibleLight};

/// Render queue of opaque geometry
pub const QUEUE_GEOMETRY: u32 = 2000;
/// Render queue of transparent geometry
pub const QUEUE_TRANSPARENT: u32 = 3000;

/// A light placed in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLight {
    pub light: Light,
    /// Linear color
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// Direction the light travels
    pub direction: Vec3,
}

impl SceneLight {
    pub fn directional(direction: Vec3, light: Light) -> Self {
        Self {
            light,
            color: Vec3::ONE,
            intensity: 1.0,
            position: Vec3::ZERO,
            direction,
        }
    }

    pub fn to_visible(&self) -> VisibleLight {
        VisibleLight {
            light: self.light,
            final_color: (self.color * self.intensity).extend(1.0),
            local_to_world: Mat4::from_position_forward(self.position, self.direction, Vec3::Y),
        }
    }
}

/// A renderable object
#[derive(Clone, Debug, PartialEq)]
pub struct SceneRenderer {
    pub name: String,
    pub bounds: Aabb,
    pub render_queue: u32,
    pub casts_shadows: bool,
    /// Pass tag of the object's shader
    pub shader_pass: String,
}

impl SceneRenderer {
    pub fn opaque(name: &str, bounds: Aabb) -> Self {
        Self {
            name: name.to_string(),
            bounds,
            render_queue: QUEUE_GEOMETRY,
            casts_shadows: true,
            shader_pass: crate::properties::LIT_SHADER_TAG.to_string(),
        }
    }

    pub fn transparent(name: &str, bounds: Aabb) -> Self {
        Self {
            render_queue: QUEUE_TRANSPARENT,
            casts_shadows: false,
            ..Self::opaque(name, bounds)
        }
    }
}

/// Scene content
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub lights: Vec<SceneLight>,
    pub renderers: Vec<SceneRenderer>,
}

/// A draw or submission the context received
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    SetupCamera { camera: String },
    DrawShadows {
        visible_light_index: usize,
        culling_sphere: Sphere,
        blend_culling_factor: f32,
        casters: usize,
    },
    DrawRenderers {
        sorting: SortingCriteria,
        /// Scene renderer indices in draw order
        renderers: Vec<usize>,
        override_material: Option<&'static str>,
    },
    DrawSkybox { camera: String },
    DrawUiGeometry { camera: String },
    DrawGizmos(GizmoSubset),
    Submit,
}

impl FrameEvent {
    /// Whether the event puts pixels on screen or into the atlas
    pub fn is_draw(&self) -> bool {
        !matches!(self, Self::SetupCamera { .. } | Self::Submit)
    }
}

/// In-memory render context
pub struct HeadlessContext {
    scene: Scene,
    capabilities: RenderCapabilities,
    graphics: GraphicsSettings,
    gizmos: bool,
    globals: ShaderGlobals,
    events: Vec<FrameEvent>,
    executed_buffers: Vec<String>,
}

impl HeadlessContext {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            capabilities: RenderCapabilities::default(),
            graphics: GraphicsSettings::default(),
            gizmos: false,
            globals: ShaderGlobals::new(),
            events: Vec::new(),
            executed_buffers: Vec::new(),
        }
    }

    pub fn with_reversed_z(mut self, reversed_z: bool) -> Self {
        self.capabilities.reversed_z = reversed_z;
        self
    }

    pub fn with_gizmos(mut self, gizmos: bool) -> Self {
        self.gizmos = gizmos;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn globals(&self) -> &ShaderGlobals {
        &self.globals
    }

    pub fn graphics_settings(&self) -> GraphicsSettings {
        self.graphics
    }

    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }

    /// Names of executed command buffers, in order
    pub fn executed_buffers(&self) -> &[String] {
        &self.executed_buffers
    }

    pub fn submit_count(&self) -> usize {
        self.events.iter().filter(|e| **e == FrameEvent::Submit).count()
    }

    /// Forget the frame log; shader globals persist like GPU state does
    pub fn clear_frame_log(&mut self) {
        self.events.clear();
        self.executed_buffers.clear();
    }

    /// View-space slice `[near, far]` of the camera frustum
    fn frustum_slice_corners(parameters: &CullingParameters, near: f32, far: f32) -> [Vec3; 8] {
        let forward = parameters.forward;
        let right = forward.cross(parameters.up).normalize();
        let up = right.cross(forward);
        let tan_half = (crp_math::radians(parameters.fov_y) * 0.5).tan();

        let mut corners = [Vec3::ZERO; 8];
        for (slice, &distance) in [near, far].iter().enumerate() {
            let center = parameters.position + forward * distance;
            let h = distance * tan_half;
            let w = h * parameters.aspect;
            let base = slice * 4;
            corners[base] = center - right * w - up * h;
            corners[base + 1] = center + right * w - up * h;
            corners[base + 2] = center - right * w + up * h;
            corners[base + 3] = center + right * w + up * h;
        }
        corners
    }

    /// Near and far distance of cascade `index`
    fn cascade_range(parameters: &CullingParameters, request: &DirectionalCascadeRequest) -> (f32, f32) {
        let ratios = request.cascade_ratios.to_array();
        let count = request.cascade_count.clamp(1, 4);
        let index = request.cascade_index.min(count - 1);
        let distance = parameters.shadow_distance;

        let boundary = |i: usize| {
            if i + 1 >= count {
                distance
            } else {
                ratios[i] * distance
            }
        };

        let near = if index == 0 { parameters.near } else { boundary(index - 1) };
        let far = boundary(index).max(near);
        (near, far)
    }

    /// Snap the sphere center to the light-space texel grid so the cascade
    /// does not shimmer as the camera moves
    fn snap_to_texels(center: Vec3, light_view: &Mat4, texel_size: f32) -> Vec3 {
        let Some(inverse) = light_view.try_inverse() else {
            return center;
        };
        let mut local = light_view.transform_point(center);
        local.x = (local.x / texel_size).floor() * texel_size;
        local.y = (local.y / texel_size).floor() * texel_size;
        inverse.transform_point(local)
    }
}

impl RenderContext for HeadlessContext {
    fn capabilities(&self) -> RenderCapabilities {
        self.capabilities
    }

    fn apply_graphics_settings(&mut self, settings: GraphicsSettings) {
        self.graphics = settings;
    }

    fn cull(&mut self, parameters: &CullingParameters) -> CullingResults {
        let visible_lights = self.scene.lights.iter().map(SceneLight::to_visible).collect();
        let far_sq = parameters.far * parameters.far;
        let visible_renderers = self
            .scene
            .renderers
            .iter()
            .enumerate()
            .filter(|(_, r)| r.bounds.distance_squared_to_point(parameters.position) <= far_sq)
            .map(|(i, _)| i)
            .collect();

        CullingResults {
            parameters: *parameters,
            visible_lights,
            visible_renderers,
        }
    }

    fn shadow_caster_bounds(&self, culling: &CullingResults, visible_light_index: usize) -> Option<Aabb> {
        culling.visible_lights.get(visible_light_index)?;

        let bounds = culling
            .visible_renderers
            .iter()
            .filter_map(|&i| self.scene.renderers.get(i))
            .filter(|r| r.casts_shadows)
            .fold(Aabb::EMPTY, |acc, r| acc.union(&r.bounds));

        (!bounds.is_empty()).then_some(bounds)
    }

    fn compute_directional_shadow_matrices_and_culling_primitives(
        &self,
        culling: &CullingResults,
        request: &DirectionalCascadeRequest,
    ) -> DirectionalCascade {
        let parameters = &culling.parameters;
        let direction = culling
            .visible_lights
            .get(request.visible_light_index)
            .map(VisibleLight::forward)
            .unwrap_or(Vec3::NEG_Y);

        let (near, far) = Self::cascade_range(parameters, request);
        let corners = Self::frustum_slice_corners(parameters, near, far);
        let sphere = Sphere::from_points(&corners);
        let radius = sphere.radius.max(1e-4);

        let up = if direction.dot(Vec3::Y).abs() > 0.99 { Vec3::Z } else { Vec3::Y };
        let texel_size = 2.0 * radius / request.tile_size.max(1) as f32;
        let orientation = Mat4::look_at(Vec3::ZERO, direction, up);
        let center = Self::snap_to_texels(sphere.center, &orientation, texel_size);

        let eye = center - direction * (2.0 * radius);
        let view = Mat4::look_at(eye, center, up);
        let projection = Mat4::orthographic(
            -radius,
            radius,
            -radius,
            radius,
            -request.near_plane_offset,
            3.0 * radius,
        );

        DirectionalCascade {
            view,
            projection,
            split_data: ShadowSplitData {
                culling_sphere: Sphere::new(center, radius),
                shadow_cascade_blend_culling_factor: 0.0,
            },
        }
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.globals.apply_all(buffer.commands());
        self.executed_buffers.push(buffer.name().to_string());
    }

    fn draw_shadows(&mut self, culling: &CullingResults, settings: &ShadowDrawingSettings) {
        let sphere = settings.split_data.culling_sphere;
        let radius_sq = sphere.radius * sphere.radius;
        let casters = culling
            .visible_renderers
            .iter()
            .filter_map(|&i| self.scene.renderers.get(i))
            .filter(|r| r.casts_shadows && r.bounds.distance_squared_to_point(sphere.center) <= radius_sq)
            .count();

        self.events.push(FrameEvent::DrawShadows {
            visible_light_index: settings.visible_light_index,
            culling_sphere: sphere,
            blend_culling_factor: settings.split_data.shadow_cascade_blend_culling_factor,
            casters,
        });
    }

    fn setup_camera_properties(&mut self, camera: &Camera) {
        self.events.push(FrameEvent::SetupCamera {
            camera: camera.name.clone(),
        });
    }

    fn draw_renderers(&mut self, culling: &CullingResults, drawing: &DrawingSettings, filtering: &FilteringSettings) {
        let eye = culling.parameters.position;
        let mut drawn: Vec<(usize, f32)> = culling
            .visible_renderers
            .iter()
            .filter_map(|&i| self.scene.renderers.get(i).map(|r| (i, r)))
            .filter(|(_, r)| filtering.render_queue_range.contains(r.render_queue))
            .filter(|(_, r)| drawing.shader_passes.iter().any(|p| *p == r.shader_pass))
            .map(|(i, r)| (i, r.bounds.center().distance(eye)))
            .collect();

        match drawing.sorting {
            SortingCriteria::CommonOpaque => drawn.sort_by(|a, b| a.1.total_cmp(&b.1)),
            SortingCriteria::CommonTransparent => drawn.sort_by(|a, b| b.1.total_cmp(&a.1)),
        }

        self.events.push(FrameEvent::DrawRenderers {
            sorting: drawing.sorting,
            renderers: drawn.into_iter().map(|(i, _)| i).collect(),
            override_material: drawing.override_material,
        });
    }

    fn draw_skybox(&mut self, camera: &Camera) {
        self.events.push(FrameEvent::DrawSkybox {
            camera: camera.name.clone(),
        });
    }

    fn draw_ui_geometry(&mut self, camera: &Camera) {
        self.events.push(FrameEvent::DrawUiGeometry {
            camera: camera.name.clone(),
        });
    }

    fn draw_gizmos(&mut self, _camera: &Camera, subset: GizmoSubset) {
        self.events.push(FrameEvent::DrawGizmos(subset));
    }

    fn should_render_gizmos(&self) -> bool {
        self.gizmos
    }

    fn submit(&mut self) {
        let live = self.globals.live_texture_count();
        if live > 0 {
            log::warn!("Submitting with {} temporary texture(s) still allocated", live);
        }
        self.events.push(FrameEvent::Submit);
    }
}

/// World point to `(u, v, depth)` through an atlas matrix
pub fn project_to_atlas(matrix: &Mat4, point: Vec3) -> Vec3 {
    let clip: Vec4 = *matrix * point.extend(1.0);
    clip.project()
}
