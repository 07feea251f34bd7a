use serde::Serialize;

use crate::gpx_types::*;

/// One vertex of a rendered polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl From<&GpxPoint> for Coordinate {
    fn from(pt: &GpxPoint) -> Self {
        Self {
            lat: pt.lat,
            lon: pt.lon,
        }
    }
}

/// A polyline drawn on the map: one route or one track segment.
pub type Path = Vec<Coordinate>;

/// A marker drawn on the map, one per waypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&GpxWaypoint> for Point {
    fn from(wpt: &GpxWaypoint) -> Self {
        Self {
            lat: wpt.lat,
            lon: wpt.lon,
            name: wpt.name.clone(),
        }
    }
}

/// Display geometry gathered from any number of documents.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Geometry {
    pub paths: Vec<Path>,
    pub points: Vec<Point>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.points.is_empty()
    }
}

/// Collect paths and points from documents in order.
///
/// Per document, routes come first, then every track segment (track order,
/// then segment order). Routes and segments with fewer than two points are
/// not drawable and are left out.
pub fn collect_geometry(docs: &[GpxDocument]) -> Geometry {
    let mut geometry = Geometry::default();

    for doc in docs {
        geometry.points.extend(doc.waypoints.iter().map(Point::from));

        for rte in &doc.routes {
            if let Some(path) = to_path(&rte.points) {
                geometry.paths.push(path);
            }
        }

        for trk in &doc.tracks {
            for seg in &trk.segments {
                if let Some(path) = to_path(&seg.points) {
                    geometry.paths.push(path);
                }
            }
        }
    }

    geometry
}

fn to_path(points: &[GpxPoint]) -> Option<Path> {
    (points.len() >= 2).then(|| points.iter().map(Coordinate::from).collect())
}
