use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use trailprof::geojson::profile_to_feature;
use trailprof::{Coordinate, ElevationProfile, ProfileEngine};

pub fn run(
    engine: &ProfileEngine,
    path: &[Coordinate],
    json: bool,
    csv: Option<&Path>,
    geojson: Option<&Path>,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.set_message(format!(
        "Querying elevations for {} points",
        engine.sample(path).len()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = runtime.block_on(engine.get_profile(path));
    pb.finish_and_clear();

    let profile = result.context("Could not build the elevation profile, please try again")?;

    if let Some(csv_path) = csv {
        write_csv(&profile, csv_path)?;
        eprintln!("CSV written to: {}", csv_path.display());
    }
    if let Some(geojson_path) = geojson {
        let file = File::create(geojson_path).context("Failed to create GeoJSON file")?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &profile_to_feature(&profile))?;
        writer.flush()?;
        eprintln!("GeoJSON written to: {}", geojson_path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_table(&profile);
    }

    Ok(())
}

fn print_table(profile: &ElevationProfile) {
    println!(
        "{:>4}  {:>11}  {:>10}  {:>9}  {:>9}",
        "#", "lon", "lat", "dist (km)", "elev (m)"
    );
    for (i, s) in profile.samples.iter().enumerate() {
        println!(
            "{:>4}  {:>11.6}  {:>10.6}  {:>9.3}  {:>9.1}",
            i, s.lon, s.lat, s.distance_km, s.elevation
        );
    }

    let stats = &profile.statistics;
    println!();
    println!("Points:     {}", stats.number_of_points);
    println!("Distance:   {:.2} km", stats.total_distance_km);
    println!(
        "Elevation:  {:.1} m min, {:.1} m max",
        stats.min_elevation, stats.max_elevation
    );
    println!(
        "Gain/loss:  +{:.1} m / -{:.1} m",
        stats.elevation_gain, stats.elevation_loss
    );
}

fn write_csv(profile: &ElevationProfile, path: &Path) -> Result<()> {
    let file = File::create(path).context("Failed to create CSV file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    writer.write_record(["lon", "lat", "distance_m", "distance_km", "elevation_m"])?;
    for s in &profile.samples {
        writer.write_record([
            s.lon.to_string(),
            s.lat.to_string(),
            s.distance.to_string(),
            s.distance_km.to_string(),
            s.elevation.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.csv");
        let coords = [Coordinate::new(-105.0, 40.0), Coordinate::new(-105.0, 40.0045)];
        let profile = ElevationProfile::from_parts(&coords, &[100.0, 150.0]).unwrap();

        write_csv(&profile, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "lon,lat,distance_m,distance_km,elevation_m");
        assert!(lines[1].starts_with("-105,40,0,0,100"));
        assert!(lines[2].ends_with(",150"));
    }
}
