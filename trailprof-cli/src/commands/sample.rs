use anyhow::Result;
use serde::Serialize;
use trailprof::geodesy::cumulative_distances;
use trailprof::sampling::stride;
use trailprof::{Coordinate, ProfileEngine};

#[derive(Serialize)]
struct SampledPoint {
    index: usize,
    lon: f64,
    lat: f64,
    distance_m: f64,
}

/// Points a profile would query, tagged with their index in the input and
/// cumulative distance along the sampled path.
fn sampled_points(engine: &ProfileEngine, path: &[Coordinate]) -> Vec<SampledPoint> {
    let step = stride(path.len(), engine.max_sample_points());
    let sampled = engine.sample(path);
    let distances = cumulative_distances(&sampled);

    sampled
        .iter()
        .zip(distances)
        .enumerate()
        .map(|(i, (c, distance_m))| SampledPoint {
            index: i * step,
            lon: c.lon,
            lat: c.lat,
            distance_m,
        })
        .collect()
}

pub fn run(engine: &ProfileEngine, path: &[Coordinate], json: bool) -> Result<()> {
    let points = sampled_points(engine, path);

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!(
        "{} of {} points (stride {})",
        points.len(),
        path.len(),
        stride(path.len(), engine.max_sample_points())
    );
    println!("{:>6}  {:>11}  {:>10}  {:>12}", "index", "lon", "lat", "dist (m)");
    for p in &points {
        println!(
            "{:>6}  {:>11.6}  {:>10.6}  {:>12.1}",
            p.index, p.lon, p.lat, p.distance_m
        );
    }
    if let Some(last) = path.last() {
        if points.last().map(|p| p.index) != Some(path.len() - 1) {
            println!(
                "note: final point ({:.6}, {:.6}) is not sampled",
                last.lon, last.lat
            );
        }
    }

    Ok(())
}
