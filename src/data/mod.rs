mod natural_earth;

pub use natural_earth::{NaturalEarth, BORDERS_FILE, COUNTRIES_FILE, COUNTRY_CODE_PROPERTY, LAND_FILE};

use crate::error::DatasetError;
use crate::map::{LineString, Shape};
use geojson::{Feature, GeoJson, Geometry, Value};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Read a GeoJSON file and return its features
pub fn read_features(path: &Path) -> Result<Vec<Feature>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = content.parse().map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        GeoJson::Feature(f) => Ok(vec![f]),
        GeoJson::Geometry(_) => Err(DatasetError::NotFeatureCollection(path.to_path_buf())),
    }
}

/// Load polygon features as fillable shapes
pub fn load_shapes(path: &Path) -> Result<Vec<Shape>, DatasetError> {
    let features = read_features(path)?;
    Ok(features
        .par_iter()
        .filter_map(|f| f.geometry.as_ref().and_then(geometry_shape))
        .collect())
}

/// Load line features (polygon exteriors count as lines)
pub fn load_lines(path: &Path) -> Result<Vec<LineString>, DatasetError> {
    let features = read_features(path)?;
    let mut lines = Vec::new();
    for feature in &features {
        if let Some(ref geometry) = feature.geometry {
            process_geometry_lines(geometry, &mut |line| lines.push(line));
        }
    }
    Ok(lines)
}

/// Load polygon features keyed by a string property, in dataset order.
/// Features without the property or without polygon geometry are skipped.
pub fn load_keyed_shapes(path: &Path, key: &str) -> Result<Vec<(String, Shape)>, DatasetError> {
    let features = read_features(path)?;
    Ok(features
        .par_iter()
        .filter_map(|f| {
            let code = f.property(key).and_then(|v| v.as_str())?;
            let shape = f.geometry.as_ref().and_then(geometry_shape)?;
            Some((code.to_string(), shape))
        })
        .collect())
}

/// Positions with fewer than two numbers are skipped
fn ring_coords(ring: &[Vec<f64>]) -> LineString {
    ring.iter()
        .filter_map(|c| match c.as_slice() {
            [lon, lat, ..] => Some((*lon, *lat)),
            _ => None,
        })
        .collect()
}

/// Flatten a polygonal geometry into a shape, keeping interior rings
fn geometry_shape(geometry: &Geometry) -> Option<Shape> {
    let mut rings = Vec::new();
    collect_rings(geometry, &mut rings);
    Shape::new(rings)
}

fn collect_rings(geometry: &Geometry, rings: &mut Vec<LineString>) {
    match &geometry.value {
        Value::Polygon(polygon) => {
            rings.extend(polygon.iter().map(|ring| ring_coords(ring)));
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                rings.extend(polygon.iter().map(|ring| ring_coords(ring)));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_rings(g, rings);
            }
        }
        _ => {}
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(ring_coords(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(ring_coords(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(ring_coords(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(ring_coords(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const COUNTRIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"ADM0_A3": "FRA", "NAME": "France"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[-5, 42], [8, 42], [8, 51], [-5, 51], [-5, 42]]],
                [[[8.5, 41.4], [9.6, 41.4], [9.6, 43], [8.5, 43], [8.5, 41.4]]]
             ]}},
            {"type": "Feature", "properties": {"ADM0_A3": "LSO"},
             "geometry": {"type": "Polygon", "coordinates": [
                [[27, -30.7], [29.5, -30.7], [29.5, -28.5], [27, -28.5], [27, -30.7]]
             ]}},
            {"type": "Feature", "properties": {"NAME": "No code"},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature", "properties": {"ADM0_A3": "PNT"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]
    }"#;

    const BORDERS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1], [2, 1]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "MultiLineString", "coordinates": [[[5, 5], [6, 6]], [[7, 7], [8, 8]]]}}
        ]
    }"#;

    const LAND_WITH_LAKE: &str = r#"{
        "type": "Feature", "properties": {},
        "geometry": {"type": "Polygon", "coordinates": [
            [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
            [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]
        ]}
    }"#;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_keyed_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "countries.geojson", COUNTRIES);
        let shapes = load_keyed_shapes(&path, "ADM0_A3").unwrap();

        let codes: Vec<&str> = shapes.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["FRA", "LSO"]);
        // Mainland and Corsica
        assert_eq!(shapes[0].1.rings.len(), 2);
        assert_eq!(shapes[0].1.bbox.as_tuple(), (-5.0, 41.4, 9.6, 51.0));
    }

    #[test]
    fn test_load_shapes_keeps_holes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "land.geojson", LAND_WITH_LAKE);
        let shapes = load_shapes(&path).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].rings.len(), 2);
    }

    #[test]
    fn test_load_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "borders.geojson", BORDERS);
        let lines = load_lines(&path).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![(0.0, 0.0), (1.0, 1.0), (2.0, 1.0)]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_features(&dir.path().join("absent.geojson")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "broken.geojson", "{\"type\": \"FeatureCollection\", \"features\": [");
        assert!(matches!(read_features(&path), Err(DatasetError::Parse { .. })));
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "point.geojson", r#"{"type": "Point", "coordinates": [1, 2]}"#);
        assert!(matches!(read_features(&path), Err(DatasetError::NotFeatureCollection(_))));
    }

    #[test]
    fn test_short_positions_are_skipped() {
        let polygon = Geometry::new(Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0],
            vec![4.0, 0.0],
            vec![],
            vec![4.0, 3.0, 120.0],
        ]]));
        let shape = geometry_shape(&polygon).unwrap();
        assert_eq!(shape.rings, vec![vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)]]);
    }
}
