//! Basic example: elevation profile of a short trail near Boulder, CO.
//!
//! Run with: cargo run --example basic
//!
//! Talks to the public elevation services, so it needs network access.

use trailprof::{Coordinate, ProfileEngine, ProfileError};

#[tokio::main]
async fn main() -> Result<(), ProfileError> {
    let engine = ProfileEngine::builder().max_sample_points(20).build()?;

    // Mount Sanitas trail, roughly
    let path = vec![
        Coordinate::new(-105.2968, 40.0195),
        Coordinate::new(-105.3002, 40.0228),
        Coordinate::new(-105.3041, 40.0262),
        Coordinate::new(-105.3058, 40.0301),
        Coordinate::new(-105.3049, 40.0335),
    ];

    println!("Querying {:?}...", engine.provider_names());
    let profile = engine.get_profile(&path).await?;

    println!("{:>10} {:>10}", "km", "elev (m)");
    println!("{:-<21}", "");
    for sample in &profile.samples {
        println!("{:>10.3} {:>10.1}", sample.distance_km, sample.elevation);
    }

    let stats = &profile.statistics;
    println!();
    println!("Distance:  {:.2} km", stats.total_distance_km);
    println!("Range:     {:.0} - {:.0} m", stats.min_elevation, stats.max_elevation);
    println!("Gain/loss: +{:.0} / -{:.0} m", stats.elevation_gain, stats.elevation_loss);

    Ok(())
}
