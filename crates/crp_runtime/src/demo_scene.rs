//! Demo Scene
//!
//! A small courtyard lit by a sun and a baked fill light, rendered headless
//! for a few frames while the main camera orbits.

use crp_math::{radians, Aabb, Vec3};
use crp_render::properties::{CASCADE_CULLING_SPHERES, SHADOW_DISTANCE_FADE};
use crp_render::{
    Camera, CameraType, EditorDiagnostics, FrameDiagnostics, FrameStats, HeadlessContext, Light,
    LightBakingOutput, LightShadows, LightmapBakeType, MixedLightingMode, NullDiagnostics,
    RenderPipeline, Scene, SceneLight, SceneRenderer, ShadowReservation,
};

use crate::pipeline_config::RuntimeConfig;

const ORBIT_RADIUS: f32 = 18.0;
const ORBIT_STEP_DEGREES: f32 = 15.0;

pub fn build_scene() -> Scene {
    let sun = SceneLight {
        color: Vec3::new(1.0, 0.96, 0.88),
        intensity: 1.2,
        ..SceneLight::directional(
            Vec3::new(-0.4, -1.0, -0.3),
            Light {
                shadows: LightShadows::Soft,
                ..Default::default()
            },
        )
    };

    let fill = SceneLight {
        color: Vec3::new(0.55, 0.65, 1.0),
        intensity: 0.35,
        ..SceneLight::directional(
            Vec3::new(0.6, -0.5, 0.4),
            Light {
                shadows: LightShadows::Hard,
                shadow_strength: 0.6,
                baking_output: LightBakingOutput {
                    bake_type: LightmapBakeType::Mixed,
                    mixed_lighting_mode: MixedLightingMode::Shadowmask,
                    occlusion_mask_channel: 1,
                },
                ..Default::default()
            },
        )
    };

    let mut renderers = vec![SceneRenderer::opaque(
        "ground",
        Aabb::from_center_half_extents(Vec3::new(0.0, -0.5, 0.0), Vec3::new(40.0, 0.5, 40.0)),
    )];
    for (i, x) in [-6.0f32, 0.0, 6.0].into_iter().enumerate() {
        renderers.push(SceneRenderer::opaque(
            &format!("pillar_{}", i),
            Aabb::from_center_half_extents(Vec3::new(x, 3.0, -4.0), Vec3::new(0.75, 3.0, 0.75)),
        ));
    }
    renderers.push(SceneRenderer::transparent(
        "fountain_water",
        Aabb::from_center_half_extents(Vec3::new(0.0, 0.4, 3.0), Vec3::new(2.5, 0.4, 2.5)),
    ));

    Scene {
        lights: vec![sun, fill],
        renderers,
    }
}

/// Main camera orbiting the courtyard center
pub fn orbit_camera(frame: u32) -> Camera {
    let angle = radians(frame as f32 * ORBIT_STEP_DEGREES);
    let position = Vec3::new(angle.sin() * ORBIT_RADIUS, 6.0, angle.cos() * ORBIT_RADIUS);
    Camera {
        name: "Main Camera".to_string(),
        position,
        forward: (Vec3::new(0.0, 1.0, 0.0) - position).normalize(),
        ..Default::default()
    }
}

fn scene_view_camera() -> Camera {
    let position = Vec3::new(25.0, 20.0, 25.0);
    Camera {
        name: "SceneCamera".to_string(),
        camera_type: CameraType::SceneView,
        position,
        forward: (Vec3::ZERO - position).normalize(),
        ..Default::default()
    }
}

/// Render `config.frames` frames and log what each published
pub fn run(config: &RuntimeConfig) -> FrameStats {
    let diagnostics: Box<dyn FrameDiagnostics> = if config.editor {
        Box::new(EditorDiagnostics::new())
    } else {
        Box::new(NullDiagnostics)
    };

    let mut ctx = HeadlessContext::new(build_scene()).with_gizmos(config.editor);
    let mut pipeline = RenderPipeline::new(config.pipeline, diagnostics);
    let mut total = FrameStats::default();

    for frame in 0..config.frames {
        let mut cameras = vec![orbit_camera(frame)];
        if config.editor {
            cameras.push(scene_view_camera());
        }

        ctx.clear_frame_log();
        let stats = pipeline.render(&mut ctx, &cameras);
        total.cameras_rendered += stats.cameras_rendered;
        total.cameras_skipped += stats.cameras_skipped;

        log::info!(
            "Frame {}: {} camera(s) rendered, {} skipped, {} event(s)",
            frame,
            stats.cameras_rendered,
            stats.cameras_skipped,
            ctx.events().len()
        );
        log_published_state(&ctx, &pipeline);
    }

    total
}

fn log_published_state(ctx: &HeadlessContext, pipeline: &RenderPipeline) {
    let globals = ctx.globals();
    let lighting = pipeline.renderer().lighting();

    for (slot, reservation) in lighting.reservations().iter().enumerate() {
        match reservation {
            ShadowReservation::NoShadow => log::debug!("  light {}: no shadows", slot),
            ShadowReservation::ShadowMaskOnly { strength, mask_channel } => log::debug!(
                "  light {}: shadow mask only (strength {}, channel {})",
                slot,
                strength,
                mask_channel
            ),
            ShadowReservation::Rasterized {
                strength,
                tile_offset,
                normal_bias,
                mask_channel,
            } => log::debug!(
                "  light {}: tiles from {} (strength {}, normal bias {}, channel {})",
                slot,
                tile_offset,
                strength,
                normal_bias,
                mask_channel
            ),
        }
    }

    if let Some(layout) = lighting.shadows().layout() {
        log::debug!(
            "  atlas {}px split {} tile {}px",
            layout.atlas_size,
            layout.split,
            layout.tile_size
        );
    }
    if let Some(spheres) = globals.vector_array(CASCADE_CULLING_SPHERES) {
        let radii: Vec<f32> = spheres.iter().map(|s| s.w.max(0.0).sqrt()).collect();
        log::debug!("  cascade radii {:?}", radii);
    }
    if let Some(fade) = globals.vector(SHADOW_DISTANCE_FADE) {
        log::debug!("  distance fade {:?}", fade.to_array());
    }

    let keywords: Vec<&str> = globals.enabled_keywords().collect();
    log::debug!("  keywords {:?}", keywords);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_camera_looks_at_center() {
        for frame in [0, 5, 17] {
            let camera = orbit_camera(frame);
            assert!(camera.culling_parameters(100.0).is_ok());
            let to_center = (Vec3::new(0.0, 1.0, 0.0) - camera.position).normalize();
            assert!(camera.forward.dot(to_center) > 0.999);
        }
    }

    #[test]
    fn test_run_renders_every_frame() {
        let config = RuntimeConfig {
            frames: 4,
            editor: true,
            ..Default::default()
        };
        let stats = run(&config);
        assert_eq!(stats.cameras_rendered, 8);
        assert_eq!(stats.cameras_skipped, 0);
    }

    #[test]
    fn test_demo_lights_reserve() {
        let mut ctx = HeadlessContext::new(build_scene());
        let mut pipeline = RenderPipeline::new(Default::default(), Box::new(NullDiagnostics));
        pipeline.render(&mut ctx, &[orbit_camera(0)]);

        let lighting = pipeline.renderer().lighting();
        assert_eq!(lighting.directional_light_count(), 2);
        assert!(lighting.reservations().iter().all(|r| r.is_rasterized()));
        assert_eq!(lighting.reservations()[1].mask_channel(), Some(1));
        assert!(ctx.globals().is_keyword_enabled("_SHADOW_MASK_DISTANCE"));
    }
}
