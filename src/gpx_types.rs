use chrono::{DateTime, Utc};

/// Parsed GPX document containing all waypoints, routes, and tracks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxDocument {
    pub waypoints: Vec<GpxWaypoint>,
    pub routes: Vec<GpxRoute>,
    pub tracks: Vec<GpxTrack>,
}

/// A single GPX point (used for rtept and trkpt).
#[derive(Debug, Clone, PartialEq)]
pub struct GpxPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
        }
    }
}

/// A top-level waypoint (<wpt>).
#[derive(Debug, Clone, PartialEq)]
pub struct GpxWaypoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub name: Option<String>,
}

impl GpxWaypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            name: None,
        }
    }
}

/// A GPX route (<rte>). Point times are kept but never used for statistics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxRoute {
    pub points: Vec<GpxPoint>,
}

/// A GPX track (<trk>).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxTrack {
    pub segments: Vec<GpxSegment>,
}

/// A GPX track segment (<trkseg>).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpxSegment {
    pub points: Vec<GpxPoint>,
}
