use criterion::{Criterion, black_box, criterion_group, criterion_main};
use voxlens_render::*;

fn cube(side: i32) -> Vec<Voxel> {
    let mut voxels = Vec::new();
    for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                let color = Rgba::new((x * 7) as u8, (y * 11) as u8, (z * 13) as u8, 255);
                voxels.push(Voxel::new(x as f32, y as f32, z as f32, color));
            }
        }
    }
    voxels
}

fn params() -> RenderParams {
    RenderParams {
        width: 256,
        height: 256,
        scale: 6.0,
        rotation: [30.0, -45.0, 0.0],
        orthogonal: true,
        ..RenderParams::default()
    }
}

fn stack_params() -> RenderParams {
    RenderParams {
        lighting: vec![StageDescriptor::new("dynamic").with_param("diameter", 0.0)],
        fx: vec![StageDescriptor::new("iso")],
        ..params()
    }
}

fn bench_render_basic(c: &mut Criterion) {
    let voxels = cube(16);
    let p = params();
    let mut renderer = Renderer::new();
    c.bench_function("render_basic_16", |bencher| {
        bencher.iter(|| black_box(renderer.render_basic(&voxels, &p)))
    });
}

fn bench_render_basic_mesh(c: &mut Criterion) {
    let voxels = cube(16);
    let p = RenderParams {
        mesh_mode: true,
        ..params()
    };
    let mut renderer = Renderer::new();
    c.bench_function("render_basic_mesh_16", |bencher| {
        bencher.iter(|| black_box(renderer.render_basic(&voxels, &p)))
    });
}

fn bench_render_dynamic_perspective(c: &mut Criterion) {
    let voxels = cube(16);
    let p = RenderParams {
        orthogonal: false,
        fov_degrees: 40.0,
        ..params()
    };
    let mut renderer = Renderer::new();
    c.bench_function("render_dynamic_perspective_16", |bencher| {
        bencher.iter(|| black_box(renderer.render_dynamic(&voxels, &p)))
    });
}

fn bench_stack_compiled(c: &mut Criterion) {
    let voxels = cube(16);
    let p = stack_params();
    let mut renderer = Renderer::new();
    c.bench_function("render_stack_compiled_16", |bencher| {
        bencher.iter(|| black_box(renderer.render_stack(&voxels, &p, ExecutionPath::Compiled)))
    });
}

fn bench_stack_interpreted(c: &mut Criterion) {
    let voxels = cube(16);
    let p = stack_params();
    let mut renderer = Renderer::new();
    c.bench_function("render_stack_interpreted_16", |bencher| {
        bencher.iter(|| black_box(renderer.render_stack(&voxels, &p, ExecutionPath::Interpreted)))
    });
}

fn bench_template_cache(c: &mut Criterion) {
    let voxels = cube(4);
    let p = params();
    let mut cached = Renderer::new();
    let mut uncached = Renderer::new().with_template_capacity(0);
    c.bench_function("render_small_cached_template", |bencher| {
        bencher.iter(|| black_box(cached.render_basic(&voxels, &p)))
    });
    c.bench_function("render_small_uncached_template", |bencher| {
        bencher.iter(|| black_box(uncached.render_basic(&voxels, &p)))
    });
}

criterion_group!(
    benches,
    bench_render_basic,
    bench_render_basic_mesh,
    bench_render_dynamic_perspective,
    bench_stack_compiled,
    bench_stack_interpreted,
    bench_template_cache,
);
criterion_main!(benches);
