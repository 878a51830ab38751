//! Integration tests for whole frames
//!
//! Drives the pipeline through the headless context and checks the shadow
//! state it publishes:
//! - Reservation outcomes and capacity
//! - Atlas tiling and tile viewports
//! - Atlas matrices and cascade culling data
//! - Keywords, cleanup and per-camera rebuilds

use crp_math::{Aabb, Mat4, Sphere, Vec2, Vec3, Vec4};
use crp_render::headless::project_to_atlas;
use crp_render::shadow::{convert_to_atlas_matrix, split_for};
use crp_render::properties::*;
use crp_render::*;

fn shadowed(strength: f32) -> Light {
    Light {
        shadows: LightShadows::Soft,
        shadow_strength: strength,
        ..Default::default()
    }
}

fn sun(light: Light) -> SceneLight {
    SceneLight::directional(Vec3::new(0.4, -1.0, 0.3), light)
}

fn ground_scene(lights: Vec<SceneLight>) -> Scene {
    Scene {
        lights,
        renderers: vec![
            SceneRenderer::opaque(
                "ground",
                Aabb::from_center_half_extents(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0)),
            ),
            SceneRenderer::opaque(
                "crate",
                Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE),
            ),
            SceneRenderer::transparent(
                "window",
                Aabb::from_center_half_extents(Vec3::new(2.0, 1.0, 4.0), Vec3::ONE),
            ),
        ],
    }
}

fn asset_with(cascade_count: u32, atlas_size: AtlasSize) -> PipelineAsset {
    let mut asset = PipelineAsset::default();
    asset.shadows.directional.cascade_count = cascade_count;
    asset.shadows.directional.atlas_size = atlas_size;
    asset
}

fn render_frame(ctx: &mut HeadlessContext, asset: PipelineAsset) -> RenderPipeline {
    let mut pipeline = RenderPipeline::new(asset, Box::new(NullDiagnostics));
    let stats = pipeline.render(ctx, &[Camera::default()]);
    assert_eq!(stats.cameras_rendered, 1);
    pipeline
}

fn shadow_draws(ctx: &HeadlessContext) -> Vec<Sphere> {
    ctx.events()
        .iter()
        .filter_map(|e| match e {
            FrameEvent::DrawShadows { culling_sphere, .. } => Some(*culling_sphere),
            _ => None,
        })
        .collect()
}

#[test]
fn test_fifth_reservation_is_no_shadow() {
    let lights = (0..5).map(|_| sun(shadowed(1.0))).collect();
    let mut ctx = HeadlessContext::new(ground_scene(lights));
    let parameters = Camera::default().culling_parameters(100.0).expect("Should build culling parameters");
    let culling = ctx.cull(&parameters);

    let mut shadows = Shadows::new();
    shadows.setup(&ShadowSettings::default(), ShadowMaskMode::default());
    for (i, light) in culling.visible_lights.iter().enumerate().take(4) {
        assert!(shadows.reserve_directional_shadow(&ctx, &culling, light, i).is_rasterized());
    }
    let before: Vec<_> = shadows.shadowed_lights().to_vec();

    let fifth = shadows.reserve_directional_shadow(&ctx, &culling, &culling.visible_lights[4], 4);
    assert_eq!(fifth, ShadowReservation::NoShadow);
    assert_eq!(fifth.to_shader_vector(), Vec4::new(0.0, 0.0, 0.0, -1.0));
    assert_eq!(shadows.shadowed_lights(), &before[..]);
    assert_eq!(shadows.reserved_count(), 4);
}

#[test]
fn test_zero_strength_never_reserved() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(0.0))]));
    let parameters = Camera::default().culling_parameters(100.0).expect("Should build culling parameters");
    let culling = ctx.cull(&parameters);
    assert!(ctx.shadow_caster_bounds(&culling, 0).is_some());

    let mut shadows = Shadows::new();
    shadows.setup(&ShadowSettings::default(), ShadowMaskMode::default());
    let reservation = shadows.reserve_directional_shadow(&ctx, &culling, &culling.visible_lights[0], 0);
    assert_eq!(reservation, ShadowReservation::NoShadow);
    assert_eq!(shadows.reserved_count(), 0);
}

#[test]
fn test_shadows_off_never_reserved() {
    let light = Light {
        shadows: LightShadows::None,
        ..Default::default()
    };
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(light)]));
    render_frame(&mut ctx, PipelineAsset::default());
    assert!(shadow_draws(&ctx).is_empty());
    assert_eq!(
        ctx.globals().texture(DIR_SHADOW_ATLAS),
        None,
        "atlas released by cleanup"
    );
}

#[test]
fn test_no_casters_gives_negative_strength() {
    let mut scene = ground_scene(vec![sun(shadowed(0.75))]);
    for renderer in &mut scene.renderers {
        renderer.casts_shadows = false;
    }
    let mut ctx = HeadlessContext::new(scene);
    let pipeline = render_frame(&mut ctx, PipelineAsset::default());

    let lighting = pipeline.renderer().lighting();
    assert_eq!(
        lighting.reservations(),
        &[ShadowReservation::ShadowMaskOnly { strength: 0.75, mask_channel: -1 }]
    );
    assert_eq!(lighting.shadows().reserved_count(), 0);

    let data = ctx.globals().vector_array(DIR_LIGHT_SHADOW_DATA).expect("Should publish shadow data");
    assert_eq!(data[0], Vec4::new(-0.75, 0.0, 0.0, -1.0));
    assert!(shadow_draws(&ctx).is_empty());
}

#[test]
fn test_split_table() {
    for lights in 0..=4usize {
        for cascades in 1..=4u32 {
            let scene = ground_scene((0..lights).map(|_| sun(shadowed(1.0))).collect());
            let mut ctx = HeadlessContext::new(scene);
            let pipeline = render_frame(&mut ctx, asset_with(cascades, AtlasSize::S2048));

            let shadows = pipeline.renderer().lighting().shadows();
            let tiles = lights * cascades as usize;
            assert_eq!(shadow_draws(&ctx).len(), tiles);

            match shadows.layout() {
                None => assert_eq!(lights, 0),
                Some(layout) => {
                    assert!(matches!(layout.split, 1 | 2 | 4));
                    assert!(layout.capacity() >= tiles);
                    assert_eq!(layout.split, split_for(tiles));
                    assert_eq!(layout.tile_size, 2048 / layout.split);
                }
            }
        }
    }
}

#[test]
fn test_two_lights_two_cascades_split_two() {
    let scene = ground_scene(vec![sun(shadowed(1.0)), sun(shadowed(0.5))]);
    let mut ctx = HeadlessContext::new(scene);
    let pipeline = render_frame(&mut ctx, asset_with(2, AtlasSize::S1024));

    let layout = pipeline.renderer().lighting().shadows().layout().expect("Should render the atlas");
    assert_eq!((layout.split, layout.tile_size), (2, 512));

    let reservations = pipeline.renderer().lighting().reservations();
    assert!(matches!(reservations[1], ShadowReservation::Rasterized { tile_offset: 2, .. }));
}

#[test]
fn test_tile_two_viewport() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
    let pipeline = render_frame(&mut ctx, asset_with(4, AtlasSize::S1024));

    let layout = pipeline.renderer().lighting().shadows().layout().expect("Should render the atlas");
    assert_eq!((layout.split, layout.tile_size), (2, 512));
    assert_eq!(layout.tile_viewport(2), Viewport::new(0.0, 512.0, 512.0, 512.0));

    // the last viewport set is the last cascade's tile
    assert_eq!(ctx.globals().viewport(), Some(Viewport::new(512.0, 512.0, 512.0, 512.0)));

    let atlas_size = ctx.globals().vector(SHADOW_ATLAS_SIZE).expect("Should publish the atlas size");
    assert_eq!(atlas_size, Vec4::new(1024.0, 1.0 / 1024.0, 0.0, 0.0));
}

#[test]
fn test_zero_lights_dummy_atlas() {
    let mut ctx = HeadlessContext::new(ground_scene(Vec::new()));

    // observe the atlas before cleanup releases it
    let parameters = Camera::default().culling_parameters(100.0).expect("Should build culling parameters");
    let culling = ctx.cull(&parameters);
    let mut lighting = Lighting::new();
    lighting.setup(&mut ctx, &culling, &ShadowSettings::default(), ShadowMaskMode::default());

    let atlas = ctx.globals().texture(DIR_SHADOW_ATLAS).expect("Should allocate the dummy atlas");
    assert_eq!((atlas.width, atlas.height), (1, 1));
    assert_eq!(ctx.globals().int(CASCADE_COUNT), None);
    assert_eq!(ctx.globals().vector_array(CASCADE_DATA), None);
    assert_eq!(ctx.globals().matrix_array(DIR_SHADOW_MATRICES), None);
    for keyword in SHADOW_MASK_KEYWORDS {
        assert!(!ctx.globals().is_keyword_enabled(keyword));
    }
    assert_eq!(ctx.globals().int(DIR_LIGHT_COUNT), Some(0));

    lighting.cleanup(&mut ctx);
    assert_eq!(ctx.globals().live_texture_count(), 0);
}

#[test]
fn test_atlas_round_trip() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
    let pipeline = render_frame(&mut ctx, asset_with(1, AtlasSize::S1024));

    let shadows = pipeline.renderer().lighting().shadows();
    let layout = shadows.layout().expect("Should render the atlas");
    assert_eq!(layout.split, 1);

    let sphere = shadow_draws(&ctx)[0];
    let matrix = shadows.directional_matrices()[0];
    let samples = [
        sphere.center,
        sphere.center + Vec3::new(0.6, 0.0, 0.0) * sphere.radius,
        sphere.center + Vec3::new(0.0, -0.6, 0.3) * sphere.radius,
        sphere.center + Vec3::new(-0.4, 0.4, -0.4) * sphere.radius,
    ];
    for point in samples {
        assert!(sphere.contains_point(point));
        let uvz = project_to_atlas(&matrix, point);
        assert!((0.0..=1.0).contains(&uvz.x), "u out of range: {:?}", uvz);
        assert!((0.0..=1.0).contains(&uvz.y), "v out of range: {:?}", uvz);
        assert!((0.0..=1.0).contains(&uvz.z), "depth out of range: {:?}", uvz);
    }
}

#[test]
fn test_reversed_z_matrices_flip_depth() {
    let mut forward = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
    let mut reversed = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))])).with_reversed_z(true);
    let a = render_frame(&mut forward, asset_with(1, AtlasSize::S1024));
    let b = render_frame(&mut reversed, asset_with(1, AtlasSize::S1024));

    let sphere = shadow_draws(&forward)[0];
    let point = sphere.center + Vec3::new(0.1, 0.2, 0.3);
    let da = project_to_atlas(&a.renderer().lighting().shadows().directional_matrices()[0], point);
    let db = project_to_atlas(&b.renderer().lighting().shadows().directional_matrices()[0], point);
    assert!((da.x - db.x).abs() < 1e-5 && (da.y - db.y).abs() < 1e-5);
    assert!((da.z + db.z - 1.0).abs() < 1e-4);
}

#[test]
fn test_cascade_data_published_for_first_light() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0)), sun(shadowed(1.0))]));
    let pipeline = render_frame(&mut ctx, asset_with(4, AtlasSize::S2048));

    let draws = shadow_draws(&ctx);
    assert_eq!(draws.len(), 8);

    let spheres = ctx.globals().vector_array(CASCADE_CULLING_SPHERES).expect("Should publish culling spheres");
    let data = ctx.globals().vector_array(CASCADE_DATA).expect("Should publish cascade data");
    let tile_size = pipeline.renderer().lighting().shadows().layout().expect("Should render the atlas").tile_size;
    assert_eq!(tile_size, 512);

    for c in 0..4 {
        let expected = CascadeCullingData::new(draws[c], tile_size, FilterMode::Pcf2x2);
        assert_eq!(spheres[c], expected.culling_sphere);
        assert_eq!(data[c], expected.data);
        assert!(spheres[c].w < draws[c].radius * draws[c].radius);
    }
    assert_eq!(ctx.globals().int(CASCADE_COUNT), Some(4));
    assert_eq!(
        ctx.globals().matrix_array(DIR_SHADOW_MATRICES).map(|m| m.len()),
        Some(MAX_TILES)
    );
}

#[test]
fn test_fewer_tiles_reset_previous_matrices() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0)), sun(shadowed(1.0))]));
    let mut pipeline = render_frame(&mut ctx, asset_with(4, AtlasSize::S2048));
    assert_eq!(shadow_draws(&ctx).len(), 8);

    ctx.scene_mut().lights.truncate(1);
    pipeline.set_asset(asset_with(2, AtlasSize::S2048));
    ctx.clear_frame_log();
    pipeline.render(&mut ctx, &[Camera::default()]);
    assert_eq!(shadow_draws(&ctx).len(), 2);

    let shadows = pipeline.renderer().lighting().shadows();
    assert!(shadows.directional_matrices()[2..].iter().all(|m| *m == Mat4::IDENTITY));
    assert!(shadows.cascade_data()[2..].iter().all(|c| *c == CascadeCullingData::default()));

    let matrices = ctx.globals().matrix_array(DIR_SHADOW_MATRICES).expect("Should publish atlas matrices");
    assert!(matrices[2..].iter().all(|m| *m == Mat4::IDENTITY));
    let spheres = ctx.globals().vector_array(CASCADE_CULLING_SPHERES).expect("Should publish culling spheres");
    let data = ctx.globals().vector_array(CASCADE_DATA).expect("Should publish cascade data");
    assert_eq!(&spheres[2..4], &[Vec4::ZERO; 2]);
    assert_eq!(&data[2..4], &[Vec4::ZERO; 2]);
    assert_eq!(ctx.globals().int(CASCADE_COUNT), Some(2));
}

#[test]
fn test_blend_factor_and_fade() {
    let mut asset = asset_with(2, AtlasSize::S1024);
    asset.shadows.max_distance = 40.0;
    asset.shadows.distance_fade = 0.2;
    asset.shadows.directional.cascade_fade = 0.25;

    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
    render_frame(&mut ctx, asset);

    for event in ctx.events() {
        if let FrameEvent::DrawShadows { blend_culling_factor, .. } = event {
            assert!((blend_culling_factor - 0.55).abs() < 1e-6);
        }
    }

    let fade = ctx.globals().vector(SHADOW_DISTANCE_FADE).expect("Should publish the distance fade");
    let f = 0.75f32;
    assert!((fade.x - 1.0 / 40.0).abs() < 1e-7);
    assert!((fade.y - 5.0).abs() < 1e-5);
    assert!((fade.z - 1.0 / (1.0 - f * f)).abs() < 1e-4);
}

#[test]
fn test_filter_and_blend_keywords() {
    for filter in FilterMode::ALL {
        for blend in [CascadeBlendMode::Hard, CascadeBlendMode::Soft, CascadeBlendMode::Dither] {
            let mut asset = PipelineAsset::default();
            asset.shadows.directional.filter = filter;
            asset.shadows.directional.cascade_blend = blend;

            let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
            render_frame(&mut ctx, asset);

            let enabled: Vec<&str> = DIRECTIONAL_FILTER_KEYWORDS
                .iter()
                .copied()
                .filter(|k| ctx.globals().is_keyword_enabled(k))
                .collect();
            match filter {
                FilterMode::Pcf2x2 => assert!(enabled.is_empty()),
                _ => assert_eq!(enabled, vec![DIRECTIONAL_FILTER_KEYWORDS[filter.ordinal() as usize - 1]]),
            }

            let enabled: Vec<&str> = CASCADE_BLEND_KEYWORDS
                .iter()
                .copied()
                .filter(|k| ctx.globals().is_keyword_enabled(k))
                .collect();
            match blend {
                CascadeBlendMode::Hard => assert!(enabled.is_empty()),
                _ => assert_eq!(enabled, vec![CASCADE_BLEND_KEYWORDS[blend.ordinal() as usize - 1]]),
            }
        }
    }
}

#[test]
fn test_shadow_mask_keywords() {
    let mut baked = shadowed(1.0);
    baked.baking_output = LightBakingOutput {
        bake_type: LightmapBakeType::Mixed,
        mixed_lighting_mode: MixedLightingMode::Shadowmask,
        occlusion_mask_channel: 2,
    };

    for (mode, expected) in [
        (ShadowMaskMode::Shadowmask, "_SHADOW_MASK_ALWAYS"),
        (ShadowMaskMode::DistanceShadowmask, "_SHADOW_MASK_DISTANCE"),
    ] {
        let mut asset = PipelineAsset::default();
        asset.shadow_mask_mode = mode;
        let mut ctx = HeadlessContext::new(ground_scene(vec![sun(baked)]));
        let pipeline = render_frame(&mut ctx, asset);

        assert!(ctx.globals().is_keyword_enabled(expected));
        assert_eq!(ctx.globals().enabled_keywords().filter(|k| k.starts_with("_SHADOW_MASK")).count(), 1);
        let reservation = pipeline.renderer().lighting().reservations()[0];
        assert_eq!(reservation.mask_channel(), Some(2));
    }

    // realtime lights leave the mask keywords off
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
    render_frame(&mut ctx, PipelineAsset::default());
    for keyword in SHADOW_MASK_KEYWORDS {
        assert!(!ctx.globals().is_keyword_enabled(keyword));
    }
}

#[test]
fn test_light_arrays_follow_enumeration_order() {
    let mut spot = shadowed(1.0);
    spot.light_type = LightType::Spot;
    let mut unshadowed = shadowed(1.0);
    unshadowed.shadows = LightShadows::None;

    let scene = ground_scene(vec![sun(unshadowed), sun(spot), sun(shadowed(0.5))]);
    let mut ctx = HeadlessContext::new(scene);
    render_frame(&mut ctx, PipelineAsset::default());

    assert_eq!(ctx.globals().int(DIR_LIGHT_COUNT), Some(2));
    let data = ctx.globals().vector_array(DIR_LIGHT_SHADOW_DATA).expect("Should publish shadow data");
    assert_eq!(data[0], Vec4::new(0.0, 0.0, 0.0, -1.0));
    assert_eq!(data[1].x, 0.5);
    assert_eq!(data[1].y, 0.0);

    // the shadow draws reference the visible-light index, not the slot
    for event in ctx.events() {
        if let FrameEvent::DrawShadows { visible_light_index, .. } = event {
            assert_eq!(*visible_light_index, 2);
        }
    }

    let directions = ctx.globals().vector_array(DIR_LIGHT_DIRECTIONS).expect("Should publish light directions");
    let expected = -Vec3::new(0.4, -1.0, 0.3).normalize();
    assert!((directions[1].truncate() - expected).length() < 1e-5);
}

#[test]
fn test_degenerate_camera_issues_no_draws() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
    let mut pipeline = RenderPipeline::new(PipelineAsset::default(), Box::new(NullDiagnostics));

    let broken = Camera {
        fov_y: 0.0,
        ..Default::default()
    };
    let stats = pipeline.render(&mut ctx, &[broken]);

    assert_eq!(stats, FrameStats { cameras_rendered: 0, cameras_skipped: 1 });
    assert!(ctx.events().iter().all(|e| !e.is_draw()));
    assert_eq!(ctx.submit_count(), 0);
    assert!(ctx.executed_buffers().is_empty());
}

#[test]
fn test_multiple_cameras_rebuild_shadow_state() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0)), sun(shadowed(1.0))]));
    let mut pipeline = RenderPipeline::new(asset_with(2, AtlasSize::S1024), Box::new(NullDiagnostics));

    let near = Camera {
        name: "Near".into(),
        far: 30.0,
        ..Default::default()
    };
    let far = Camera {
        name: "Far".into(),
        position: Vec3::new(0.0, 20.0, 60.0),
        ..Default::default()
    };
    let stats = pipeline.render(&mut ctx, &[near, far]);
    assert_eq!(stats.cameras_rendered, 2);
    assert_eq!(ctx.submit_count(), 2);

    let draws = shadow_draws(&ctx);
    assert_eq!(draws.len(), 8, "each camera reserves both lights again");
    assert_ne!(draws[0], draws[4]);
    assert_eq!(pipeline.renderer().lighting().shadows().reserved_count(), 2);
    assert_eq!(ctx.globals().live_texture_count(), 0);
}

#[test]
fn test_frame_structure() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))])).with_gizmos(true);
    let mut pipeline = RenderPipeline::new(asset_with(1, AtlasSize::S1024), Box::new(EditorDiagnostics::new()));
    let camera = Camera {
        name: "Scene".into(),
        camera_type: CameraType::SceneView,
        clear_flags: ClearFlags::Color,
        ..Default::default()
    };
    pipeline.render(&mut ctx, &[camera]);

    let kinds: Vec<&str> = ctx
        .events()
        .iter()
        .map(|e| match e {
            FrameEvent::SetupCamera { .. } => "setup",
            FrameEvent::DrawShadows { .. } => "shadows",
            FrameEvent::DrawRenderers { override_material: Some(_), .. } => "unsupported",
            FrameEvent::DrawRenderers { sorting: SortingCriteria::CommonOpaque, .. } => "opaque",
            FrameEvent::DrawRenderers { .. } => "transparent",
            FrameEvent::DrawSkybox { .. } => "skybox",
            FrameEvent::DrawUiGeometry { .. } => "ui",
            FrameEvent::DrawGizmos(_) => "gizmos",
            FrameEvent::Submit => "submit",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["ui", "shadows", "setup", "opaque", "skybox", "transparent", "unsupported", "gizmos", "gizmos", "submit"]
    );

    assert!(ctx.graphics_settings().use_srp_batcher);
    assert!(ctx.graphics_settings().lights_use_linear_intensity);
    assert_eq!(ctx.globals().open_samples(), 0);
    assert_eq!(ctx.executed_buffers().first().map(String::as_str), Some("Scene"));
}

#[test]
fn test_camera_clear_follows_flags() {
    let background = Vec4::new(0.5, 0.25, 0.75, 1.0);
    for flags in [ClearFlags::Skybox, ClearFlags::Color, ClearFlags::Depth, ClearFlags::Nothing] {
        let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
        let mut pipeline = RenderPipeline::new(PipelineAsset::default(), Box::new(NullDiagnostics));
        let camera = Camera {
            clear_flags: flags,
            background_color: background,
            ..Default::default()
        };
        pipeline.render(&mut ctx, &[camera.clone()]);

        let expected = match flags {
            ClearFlags::Color => (true, true, camera.linear_background_color()),
            ClearFlags::Skybox | ClearFlags::Depth => (true, false, Vec4::ZERO),
            ClearFlags::Nothing => (false, false, Vec4::ZERO),
        };
        assert_eq!(ctx.globals().last_clear(), Some(expected), "{:?}", flags);
    }
}

#[test]
fn test_opaque_and_transparent_sorting() {
    let mut ctx = HeadlessContext::new(ground_scene(vec![sun(shadowed(1.0))]));
    render_frame(&mut ctx, PipelineAsset::default());

    let draws: Vec<&Vec<usize>> = ctx
        .events()
        .iter()
        .filter_map(|e| match e {
            FrameEvent::DrawRenderers { renderers, .. } => Some(renderers),
            _ => None,
        })
        .collect();
    assert_eq!(draws.len(), 2);
    assert!(draws[0].contains(&0) && draws[0].contains(&1));
    assert!(!draws[0].contains(&2));
    assert_eq!(draws[1], &vec![2]);
}

#[test]
fn test_atlas_tile_offsets_from_matrices() {
    // tile 3 of a 2x2 atlas maps the clip-space center to UV (0.75, 0.75)
    let matrix = convert_to_atlas_matrix(
        Mat4::IDENTITY,
        Vec2::new(1.0, 1.0),
        2,
        false,
    );
    let uv = project_to_atlas(&matrix, Vec3::ZERO);
    assert!((uv.x - 0.75).abs() < 1e-6 && (uv.y - 0.75).abs() < 1e-6);
}
