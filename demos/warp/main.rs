//! Curvewarp demo: prints the geometry of one bent frame.
//!
//! Usage:
//! ```text
//! cargo run --example warp                 # 90 degrees, 10 x 4 cells
//! cargo run --example warp -- -135 6 3     # angle, x segments, y segments
//! RUST_LOG=curvewarp=trace cargo run --example warp
//! ```

use curvewarp::geometry::{Quad, SegmentCounts};
use curvewarp::operations::{CanvasWarp, ClipMode};
use curvewarp::tessellation::{MeshMode, MeshWarp};

const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 400.0;

fn main() -> curvewarp::Result<()> {
    // Default: WARN for everything, INFO for curvewarp.
    // Override with RUST_LOG env var (e.g. RUST_LOG=curvewarp=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("warp=info".parse().unwrap_or_default())
        .add_directive("curvewarp=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let angle = args.next().and_then(|a| a.parse().ok()).unwrap_or(90.0);
    let x = args.next().and_then(|a| a.parse().ok()).unwrap_or(10);
    let y = args.next().and_then(|a| a.parse().ok()).unwrap_or(4);
    let counts = SegmentCounts::new(x, y)?;

    // A text-sized rectangle in the middle of the canvas.
    let rect = Quad::from_rect(200.0, 150.0, 400.0, 100.0)?;

    let mut canvas = CanvasWarp::new(rect, counts).with_clip_mode(ClipMode::Seamed);
    let frame = canvas.render(angle)?;
    if frame.is_empty() {
        tracing::warn!(angle, "nothing to draw");
        return Ok(());
    }
    tracing::info!(
        angle,
        vertices = frame.warped.len(),
        cells = frame.patches.len(),
        "canvas frame"
    );

    for row in 0..=counts.y() {
        let points: Vec<String> = (0..=counts.x())
            .filter_map(|col| frame.warped.point(col, row))
            .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
            .collect();
        println!("row {row}: {}", points.join(" "));
    }
    if let Some(patch) = frame.patches.first() {
        let [a, b, c, d, e, f] = patch.transforms.upper.to_array();
        println!("cell (0, 0) upper transform: [{a:.4}, {b:.4}, {c:.4}, {d:.4}, {e:.2}, {f:.2}]");
        println!("cell (0, 0) upper clip: {} points", patch.clip.up.len());
    }

    let mut gpu = MeshWarp::new(&rect, CANVAS_WIDTH, CANVAS_HEIGHT, counts, MeshMode::Uniforms)?;
    if gpu.render(angle)? {
        let u = gpu.uniforms();
        tracing::info!(
            top_radius = u.top_radius,
            radius_delta = u.radius_delta,
            from_angle = u.from_angle,
            angle_step = u.angle_step,
            draw_count = gpu.draw_count(),
            "shader uniforms"
        );
    }
    Ok(())
}
