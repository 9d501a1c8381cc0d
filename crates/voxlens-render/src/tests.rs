//! End-to-end render scenarios.

use std::sync::Arc;

use glam::Vec3;

use crate::{
    ExecutionPath, Face, FaceContext, RenderError, RenderGate, RenderParams, RenderRequest,
    RenderVariant, Renderer, Rgba, ShaderStage, StageDescriptor, StageInfo, StageKind,
    StageParams, Voxel,
};

const RED: Rgba = Rgba::new(255, 0, 0, 255);
const GREEN: Rgba = Rgba::new(0, 255, 0, 255);
const BLUE: Rgba = Rgba::new(0, 0, 255, 255);

fn params(rotation: [f64; 3]) -> RenderParams {
    RenderParams {
        width: 64,
        height: 64,
        scale: 8.0,
        rotation,
        orthogonal: true,
        ..RenderParams::default()
    }
}

fn block() -> Vec<Voxel> {
    let mut voxels = Vec::new();
    for x in 0..3 {
        for y in 0..2 {
            for z in 0..2 {
                let color = Rgba::new(40 + x * 70, 60 + y * 120, 30 + z * 200, 255);
                voxels.push(Voxel::new(x as f32, y as f32, z as f32, color));
            }
        }
    }
    voxels
}

fn count(pixels: &[u8], color: Rgba) -> usize {
    pixels
        .chunks_exact(4)
        .filter(|p| *p == color.to_array())
        .count()
}

fn mixed_stack() -> RenderParams {
    RenderParams {
        lighting: vec![
            StageDescriptor::new("dynamic")
                .with_param("rimEnabled", true)
                .with_param("pitch", 40.0),
            StageDescriptor::new("basic").with_param("shadeIntensity", 80.0),
        ],
        fx: vec![
            StageDescriptor::new("iso").with_param("enableTint", true),
            StageDescriptor::new("faceshade").with_param("roleSource", "camera"),
        ],
        ..params([25.0, -35.0, 10.0])
    }
}

struct Invert;

impl ShaderStage for Invert {
    fn id(&self) -> &str {
        "invert"
    }

    fn kind(&self) -> StageKind {
        StageKind::Effect
    }

    fn info(&self) -> StageInfo {
        StageInfo {
            id: "invert".to_string(),
            display_name: "Invert".to_string(),
            kind: StageKind::Effect,
            params: Vec::new(),
        }
    }

    fn shade(&self, color: Rgba, _face: &FaceContext<'_>, _params: &StageParams) -> Rgba {
        color.with_rgb(255 - color.r, 255 - color.g, 255 - color.b)
    }
}

#[test]
fn test_empty_model_is_background() {
    let mut renderer = Renderer::new();
    let bg = Rgba::new(12, 34, 56, 78);
    let p = RenderParams {
        width: 17,
        height: 9,
        background_color: bg,
        ..RenderParams::default()
    };
    for variant in [RenderVariant::Basic, RenderVariant::Dynamic, RenderVariant::Stack] {
        let image = renderer.render(variant, &[], &p).unwrap();
        assert_eq!(image.pixels.len(), 17 * 9 * 4);
        assert_eq!(count(&image.pixels, bg), 17 * 9);
        assert_eq!(image.face_count, 0);
    }
}

#[test]
fn test_zero_dimensions_rejected() {
    let mut renderer = Renderer::new();
    let p = RenderParams {
        height: 0,
        ..RenderParams::default()
    };
    let voxels = [Voxel::new(0.0, 0.0, 0.0, RED)];
    assert_eq!(
        renderer.render_basic(&voxels, &p),
        Err(RenderError::InvalidDimensions {
            width: 200,
            height: 0
        })
    );
}

#[test]
fn test_single_voxel_head_on() {
    // Faces perpendicular to the view are culled, so only the front shows.
    let mut renderer = Renderer::new();
    let voxels = [Voxel::new(0.0, 0.0, 0.0, Rgba::new(200, 100, 50, 255))];
    let image = renderer.render_basic(&voxels, &params([0.0; 3])).unwrap();
    assert_eq!(image.face_count, 1);
    // A head-on face keeps its full colour under the default falloff.
    let front = Rgba::new(200, 100, 50, 255);
    assert_eq!(image.pixel(32, 32), Some(front));
    assert_eq!(count(&image.pixels, front), 64);
    assert_eq!(image.pixel(27, 32), Some(Rgba::TRANSPARENT));
}

#[test]
fn test_single_voxel_iso_pose_shows_three_faces() {
    let mut renderer = Renderer::new();
    let voxels = [Voxel::new(0.0, 0.0, 0.0, Rgba::WHITE)];
    let p = RenderParams {
        fx: vec![
            StageDescriptor::new("faceshade")
                .with_param("shadingMode", "literal")
                .with_param("frontColor", RED)
                .with_param("rightColor", GREEN)
                .with_param("topColor", BLUE)
                .with_param("backColor", Rgba::BLACK)
                .with_param("leftColor", Rgba::BLACK)
                .with_param("bottomColor", Rgba::BLACK),
        ],
        ..params([30.0, -45.0, 0.0])
    };
    let image = renderer.render_stack(&voxels, &p, ExecutionPath::Compiled).unwrap();
    assert_eq!(image.face_count, 3);
    let (r, g, b) = (
        count(&image.pixels, RED),
        count(&image.pixels, GREEN),
        count(&image.pixels, BLUE),
    );
    assert!(r > 0 && g > 0 && b > 0);
    assert_eq!(count(&image.pixels, Rgba::BLACK), 0);
    assert_eq!(r + g + b + count(&image.pixels, Rgba::TRANSPARENT), 64 * 64);
}

#[test]
fn test_basic_light_shades_three_faces_apart() {
    let mut renderer = Renderer::new();
    let base = Rgba::new(200, 100, 50, 255);
    let voxels = [Voxel::new(0.0, 0.0, 0.0, base)];
    let p = params([30.0, -45.0, 0.0]);
    let image = renderer.render_basic(&voxels, &p).unwrap();
    assert_eq!(image.face_count, 3);

    let rotation = p.rotation();
    let light = p.camera_facing();
    let shaded = |face: Face| {
        let normal = rotation.rotate_normal(face.normal());
        light.shade_color(base, normal.dot(Vec3::Z))
    };
    let (front, right, top) = (shaded(Face::Front), shaded(Face::Right), shaded(Face::Top));
    assert!(front != right && right != top && front != top);

    // Pixels near each face's projected centroid.
    assert_eq!(image.pixel(29, 29), Some(front));
    assert_eq!(image.pixel(34, 31), Some(right));
    assert_eq!(image.pixel(30, 35), Some(top));
    for color in [front, right, top] {
        assert!(count(&image.pixels, color) > 0);
    }
    assert_eq!(
        count(&image.pixels, front)
            + count(&image.pixels, right)
            + count(&image.pixels, top)
            + count(&image.pixels, Rgba::TRANSPARENT),
        64 * 64
    );
}

#[test]
fn test_full_turn_is_pixel_identical() {
    let mut renderer = Renderer::new();
    let voxels = block();
    for perspective in [false, true] {
        let mut a = params([30.0, -45.0, 10.0]);
        a.orthogonal = !perspective;
        a.fov_degrees = 40.0;
        let mut b = a.clone();
        b.rotation = [390.0, 315.0, -350.0];
        for variant in [RenderVariant::Basic, RenderVariant::Dynamic] {
            let first = renderer.render(variant, &voxels, &a).unwrap();
            let second = renderer.render(variant, &voxels, &b).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_mesh_mode_drops_shared_faces() {
    let mut renderer = Renderer::new();
    let voxels = [
        Voxel::new(0.0, 0.0, 0.0, RED),
        Voxel::new(1.0, 0.0, 0.0, BLUE),
    ];
    let mut p = params([0.0, -45.0, 0.0]);
    let open = renderer.render_basic(&voxels, &p).unwrap();
    assert_eq!(open.face_count, 4);

    p.mesh_mode = true;
    let meshed = renderer.render_basic(&voxels, &p).unwrap();
    assert_eq!(meshed.face_count, 3);
    // The shared face sits behind the blue voxel's front face.
    for y in 28..36 {
        for x in 29..35 {
            assert_eq!(meshed.pixel(x, y), Some(BLUE), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_compiled_and_interpreted_paths_match() {
    let mut renderer = Renderer::new();
    let voxels = block();
    for perspective in [false, true] {
        let mut p = mixed_stack();
        p.orthogonal = !perspective;
        p.fov_degrees = 35.0;
        let compiled = renderer.render_stack(&voxels, &p, ExecutionPath::Compiled).unwrap();
        let interpreted = renderer
            .render_stack(&voxels, &p, ExecutionPath::Interpreted)
            .unwrap();
        assert!(compiled.face_count > 0);
        assert_eq!(compiled, interpreted);
    }
}

#[test]
fn test_stage_order_variations_match_across_paths() {
    let mut renderer = Renderer::new();
    let voxels = block();
    let mut p = mixed_stack();
    p.lighting.reverse();
    p.fx.reverse();
    p.mesh_mode = true;
    let compiled = renderer.render_stack(&voxels, &p, ExecutionPath::Compiled).unwrap();
    let interpreted = renderer
        .render_stack(&voxels, &p, ExecutionPath::Interpreted)
        .unwrap();
    assert_eq!(compiled, interpreted);
}

#[test]
fn test_template_cache_does_not_change_output() {
    let voxels = block();
    let p = mixed_stack();
    let mut cached = Renderer::new();
    let mut uncached = Renderer::new().with_template_capacity(0);

    let first = cached.render(RenderVariant::Stack, &voxels, &p).unwrap();
    let second = cached.render(RenderVariant::Stack, &voxels, &p).unwrap();
    let fresh = uncached.render(RenderVariant::Stack, &voxels, &p).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, fresh);
    assert_eq!(cached.template_cache().stats(), (1, 1));
    assert!(uncached.template_cache().is_empty());
}

#[test]
fn test_unknown_and_misplaced_stages_are_skipped() {
    let mut renderer = Renderer::new();
    let voxels = block();
    let plain = params([20.0, 30.0, 0.0]);
    let noisy = RenderParams {
        lighting: vec![StageDescriptor::new("toon"), StageDescriptor::new("iso")],
        fx: vec![StageDescriptor::new("dynamic")],
        ..plain.clone()
    };
    let a = renderer.render_stack(&voxels, &plain, ExecutionPath::Compiled).unwrap();
    let b = renderer.render_stack(&voxels, &noisy, ExecutionPath::Compiled).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_custom_stage_runs_through_registry() {
    let mut renderer = Renderer::new();
    renderer.registry_mut().register(Arc::new(Invert));
    let voxels = [Voxel::new(0.0, 0.0, 0.0, Rgba::new(10, 20, 30, 255))];
    let p = RenderParams {
        fx: vec![StageDescriptor::new("invert")],
        ..params([0.0; 3])
    };
    let compiled = renderer.render_stack(&voxels, &p, ExecutionPath::Compiled).unwrap();
    let interpreted = renderer
        .render_stack(&voxels, &p, ExecutionPath::Interpreted)
        .unwrap();
    assert_eq!(compiled.pixel(32, 32), Some(Rgba::new(245, 235, 225, 255)));
    assert_eq!(compiled, interpreted);
}

#[test]
fn test_perspective_renders_centre() {
    let mut renderer = Renderer::new();
    let voxels = [Voxel::new(0.0, 0.0, 0.0, RED)];
    let p = RenderParams {
        orthogonal: false,
        fov_degrees: 40.0,
        ..params([0.0; 3])
    };
    let image = renderer.render_dynamic(&voxels, &p).unwrap();
    assert!(image.face_count >= 1);
    assert_ne!(image.pixel(32, 32), Some(Rgba::TRANSPARENT));
    assert_eq!(image.pixel(0, 0), Some(Rgba::TRANSPARENT));
}

#[test]
fn test_request_through_gate() {
    let gate = RenderGate::new(Renderer::new());
    let request = RenderRequest::from_json(
        r#"{
            "variant": "dynamic",
            "voxels": [[0, 0, 0, 200, 50, 50], [1, 0, 0, 50, 200, 50]],
            "params": {"width": 48, "height": 32, "scale": 6, "rotation": [20, 30, 0],
                       "dynamicLighting": {"rimEnabled": true}}
        }"#,
    )
    .unwrap();
    let image = gate.try_render(|r| r.handle(&request)).unwrap();
    assert_eq!((image.width, image.height), (48, 32));
    assert_eq!(image.pixels.len(), 48 * 32 * 4);
    assert!(image.face_count > 0);
}
