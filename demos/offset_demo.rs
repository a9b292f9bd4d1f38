//! Offset demo: offsets a circle with an off-centre hole and prints the
//! resulting curves.
//!
//! Usage:
//! ```text
//! cargo run --example offset_demo                  # D = 2.0, s = 0.2
//! cargo run --example offset_demo -- 1.5 0.1 0.05  # distance spacing repair-radius
//! RUST_LOG=contourgraph=debug cargo run --example offset_demo
//! ```

use contourgraph::geometry::{GeneralPolygon2, Polygon2};
use contourgraph::math::{Point2, Vector2};
use contourgraph::operations::{OffsetCurves2D, OffsetParams, RepairParams};

fn arg(args: &[String], i: usize, default: f64) -> f64 {
    args.get(i).and_then(|a| a.parse().ok()).unwrap_or(default)
}

fn main() -> contourgraph::Result<()> {
    // Default: WARN for everything, INFO for contourgraph.
    // Override with RUST_LOG env var (e.g. RUST_LOG=contourgraph=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("contourgraph=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();
    let distance = arg(&args, 1, 2.0);
    let spacing = arg(&args, 2, 0.2);
    let repair_radius = arg(&args, 3, spacing / 2.0);

    let region = GeneralPolygon2::new(Polygon2::circle(Point2::origin(), 10.0, 64)).with_hole(
        Polygon2::circle(Point2::origin(), 5.0, 64).translate(Vector2::new(2.0, 0.0)),
    );

    let curves = OffsetCurves2D::new(region, OffsetParams::new(distance, spacing))
        .with_repair(RepairParams::new(repair_radius))
        .execute()?;

    println!("offset {distance} at spacing {spacing}: {} curve(s)", curves.len());
    for (i, c) in curves.iter().enumerate() {
        println!(
            "  #{i}: {} points, {}, length {:.3}",
            c.len(),
            if c.closed { "closed" } else { "open" },
            c.length()
        );
    }
    Ok(())
}
