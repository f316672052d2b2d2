use anyhow::Result;
use trailprof::ProfileEngine;

pub fn run(engine: &ProfileEngine) -> Result<()> {
    println!(
        "Sampling: up to {} points, {} ms between per-point requests",
        engine.max_sample_points(),
        engine.inter_point_delay().as_millis()
    );
    println!();
    for (i, (name, endpoint)) in engine.provider_endpoints().into_iter().enumerate() {
        println!("{}. {:<16} {}", i + 1, name, endpoint.unwrap_or("-"));
    }
    Ok(())
}
