use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::geometry::{Coordinate, Path, Point};
use crate::track::TrackResult;

/// Convert a track result to a GeoJSON FeatureCollection.
///
/// Paths become LineStrings, waypoints become Points. Defined statistics are
/// attached to the collection as `kilometers` and `hours`.
pub fn to_feature_collection(result: &TrackResult) -> FeatureCollection {
    let mut features: Vec<Feature> = result.paths.iter().map(path_to_feature).collect();
    features.extend(result.points.iter().map(point_to_feature));

    let mut foreign_members = Map::new();
    if !result.kilometers.is_empty() {
        foreign_members.insert(
            "kilometers".to_string(),
            JsonValue::String(result.kilometers.clone()),
        );
        foreign_members.insert("hours".to_string(), JsonValue::String(result.hours.clone()));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: (!foreign_members.is_empty()).then_some(foreign_members),
    }
}

fn path_to_feature(path: &Path) -> Feature {
    let coords: Vec<Vec<f64>> = path.iter().map(coordinate_position).collect();
    feature(Geometry::new(Value::LineString(coords)), "path", None)
}

fn point_to_feature(point: &Point) -> Feature {
    let coords = vec![point.lon, point.lat];
    feature(
        Geometry::new(Value::Point(coords)),
        "waypoint",
        point.name.as_deref(),
    )
}

fn feature(geometry: Geometry, gpx_type: &str, name: Option<&str>) -> Feature {
    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String(gpx_type.to_string()),
    );
    if let Some(name) = name {
        props.insert("name".to_string(), JsonValue::String(name.to_string()));
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// GeoJSON positions are [lon, lat].
fn coordinate_position(c: &Coordinate) -> Vec<f64> {
    vec![c.lon, c.lat]
}
