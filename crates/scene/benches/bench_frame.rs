use std::hint::black_box;
use std::time::Instant;

use seaside_scene::{SceneState, Viewport};
use seaside_waves::{WaveParams, elevation};

/// Evaluate the elevation at every vertex of a `segments` x `segments` plane,
/// the work the water shader does per frame.
fn bench_surface(segments: usize, iterations: usize) {
    let params = WaveParams::default();
    let size = 20.0;
    let step = size / segments as f32;

    let start = Instant::now();
    for i in 0..iterations {
        let t = i as f32 / 60.0;
        let mut sum = 0.0;
        for row in 0..=segments {
            let z = -size / 2.0 + row as f32 * step;
            for col in 0..=segments {
                let x = -size / 2.0 + col as f32 * step;
                sum += elevation(black_box(x), black_box(z), t, &params);
            }
        }
        black_box(sum);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  surface ({segments}x{segments} segments, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_advance(frames: usize, with_ball: bool) {
    let mut scene = SceneState::new(Viewport::default());
    if with_ball {
        scene.model_loaded();
    }

    let start = Instant::now();
    for i in 0..frames {
        black_box(scene.advance(black_box(i as f32 / 60.0)));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  advance ({frames} frames, ball={with_ball}): {per_frame:?}/frame, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Frame Update Benchmarks ===\n");

    println!("Big-wave surface on the CPU:");
    bench_surface(50, 100);
    bench_surface(200, 10);

    println!("\nScene advance (intro, then orbit damping):");
    bench_advance(1_000, false);
    bench_advance(100_000, false);
    bench_advance(100_000, true);

    println!("\n=== Done ===");
}
