//! Reading a path from files, stdin or the command line.

use anyhow::{bail, Context, Result};
use geojson::GeoJson;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use trailprof::geodesy::validate_path;
use trailprof::geojson::coordinates_from_geojson;
use trailprof::Coordinate;

/// Resolve the path from either an input file or a `--coords` string.
///
/// Every coordinate must be finite and within WGS84 bounds.
pub fn resolve(input: Option<&str>, coords: Option<&str>) -> Result<Vec<Coordinate>> {
    let (source, path) = match (input, coords) {
        (_, Some(coords)) => ("--coords", parse_coords(coords)?),
        (Some(input), None) => (input, read_path(input)?),
        (None, None) => bail!("Provide an INPUT file, '-' for stdin, or --coords"),
    };

    validate_path(&path).with_context(|| format!("Invalid path in {}", source))?;
    tracing::debug!(source, points = path.len(), "Path loaded");

    Ok(path)
}

/// Parse `"lon,lat;lon,lat;..."`.
pub fn parse_coords(value: &str) -> Result<Vec<Coordinate>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let parts: Vec<&str> = pair.split(',').map(str::trim).collect();
            match parts.as_slice() {
                [lon, lat] => Ok(Coordinate::new(
                    lon.parse()
                        .with_context(|| format!("Invalid longitude in '{}'", pair))?,
                    lat.parse()
                        .with_context(|| format!("Invalid latitude in '{}'", pair))?,
                )),
                _ => bail!("Expected 'lon,lat', got '{}'", pair),
            }
        })
        .collect()
}

/// Read a path from a GeoJSON or CSV file, or GeoJSON on stdin when `input`
/// is `-`.
pub fn read_path(input: &str) -> Result<Vec<Coordinate>> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return parse_geojson(&text);
    }

    let path = Path::new(input);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => read_csv(path),
        "geojson" | "json" => {
            let mut text = String::new();
            BufReader::new(File::open(path).context("Failed to open input file")?)
                .read_to_string(&mut text)
                .context("Failed to read input file")?;
            parse_geojson(&text)
        }
        _ => bail!(
            "Unsupported file format: {}. Use .geojson, .json or .csv",
            extension
        ),
    }
}

/// Extract the first line from GeoJSON text.
pub fn parse_geojson(text: &str) -> Result<Vec<Coordinate>> {
    let geojson: GeoJson = text.parse().context("Failed to parse GeoJSON")?;
    coordinates_from_geojson(&geojson)?
        .context("No LineString or MultiLineString found in input")
}

/// Read a path from a CSV file with `lon` and `lat` columns, in row order.
fn read_csv(path: &Path) -> Result<Vec<Coordinate>> {
    let file = File::open(path).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
    };
    let lon_idx = column(&["lon", "lng", "longitude"]).context("Column 'lon' not found in CSV")?;
    let lat_idx = column(&["lat", "latitude"]).context("Column 'lat' not found in CSV")?;

    let mut coords = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize, what: &str| -> Result<f64> {
            record
                .get(idx)
                .with_context(|| format!("Row {}: missing {}", row + 1, what))?
                .trim()
                .parse()
                .with_context(|| format!("Row {}: invalid {}", row + 1, what))
        };
        coords.push(Coordinate::new(field(lon_idx, "longitude")?, field(lat_idx, "latitude")?));
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_parse_coords() {
        let coords = parse_coords("-105.27,40.01; -105.26,40.02;").unwrap();
        assert_eq!(
            coords,
            vec![Coordinate::new(-105.27, 40.01), Coordinate::new(-105.26, 40.02)]
        );
    }

    #[test]
    fn test_parse_coords_errors() {
        assert!(parse_coords("-105.27").is_err());
        assert!(parse_coords("a,b").is_err());
        assert!(parse_coords("1,2,3").is_err());
    }

    #[test]
    fn test_read_geojson_feature() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "creek.geojson",
            r#"{
                "type": "Feature",
                "properties": { "GNIS_NAME": "Boulder Creek" },
                "geometry": { "type": "LineString", "coordinates": [[-105.27, 40.01], [-105.26, 40.02], [-105.25, 40.03]] }
            }"#,
        );

        let coords = read_path(&path).unwrap();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[2], Coordinate::new(-105.25, 40.03));
    }

    #[test]
    fn test_read_geojson_without_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "point.json",
            r#"{ "type": "Point", "coordinates": [-105.27, 40.01] }"#,
        );

        let err = read_path(&path).unwrap_err();
        assert!(err.to_string().contains("No LineString"));
    }

    #[test]
    fn test_read_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "track.csv",
            "name,Latitude,Longitude\na,40.01,-105.27\nb,40.02,-105.26\n",
        );

        let coords = read_path(&path).unwrap();
        assert_eq!(
            coords,
            vec![Coordinate::new(-105.27, 40.01), Coordinate::new(-105.26, 40.02)]
        );
    }

    #[test]
    fn test_read_csv_bad_row() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "track.csv", "lat,lon\n40.01,-105.27\nnope,-105.26\n");

        let err = read_path(&path).unwrap_err();
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "track.gpx", "<gpx/>");
        assert!(read_path(&path).is_err());
    }

    #[test]
    fn test_resolve_rejects_non_finite_and_out_of_range() {
        for coords in ["NaN,40.0;-105.0,40.1", "-105.0,inf;-105.0,40.1", "40.0,-105.0;40.1,-105.1"] {
            let err = resolve(None, Some(coords)).unwrap_err();
            assert!(format!("{:#}", err).contains("out of range"), "{:#}", err);
        }
    }

    #[test]
    fn test_resolve_validates_csv_input() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "track.csv", "lat,lon\n40.01,-105.27\nNaN,-105.26\n");

        let err = resolve(Some(&path), None).unwrap_err();
        assert!(format!("{:#}", err).contains("track.csv"));
    }

    #[test]
    fn test_resolve_prefers_coords() {
        let coords = resolve(Some("missing.geojson"), Some("1,2;3,4")).unwrap();
        assert_eq!(coords.len(), 2);
        assert!(resolve(None, None).is_err());
    }
}
