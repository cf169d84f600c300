use std::hint::black_box;
use std::time::Instant;

use chamber_scene::{FrameInstance, SCENE, light_marker};

fn evaluate(t: f32) -> Vec<FrameInstance> {
    let mut out: Vec<FrameInstance> = SCENE.iter().map(|d| d.at(t)).collect();
    out.push(light_marker(t));
    out
}

fn bench_frames(frames: usize) {
    let start = Instant::now();
    let mut checksum = 0.0f32;
    for i in 0..frames {
        let instances = evaluate(black_box(i as f32 / 60.0));
        checksum += instances[12].model.w_axis.x;
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  evaluate ({} instances, {frames} frames): {per_frame:?}/frame, total {elapsed:?} [{checksum:.3}]",
        SCENE.len() + 1
    );
}

fn main() {
    println!("=== instance table benchmark ===");
    bench_frames(1_000);
    bench_frames(100_000);
}
