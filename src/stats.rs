use std::ops::Add;

use chrono::{DateTime, TimeDelta, Utc};

use crate::gpx_types::*;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance and elapsed time, always derived together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStats {
    pub distance_km: f64,
    pub duration: TimeDelta,
}

impl Add for TrackStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            distance_km: self.distance_km + other.distance_km,
            duration: self.duration + other.duration,
        }
    }
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(a: &GpxPoint, b: &GpxPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    // rounding near antipodes (and latitudes past the poles) leaves [0, 1]
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Statistics of one track segment, using its timestamped points only.
///
/// Untimed points are skipped, including at either end: elapsed time runs
/// from the first timed point to the last timed point, not from the
/// segment's first and last points. A segment whose first or last point
/// lacks a time still counts as long as two of its points carry one.
///
/// Returns `None` unless at least two points carry a time.
pub fn segment_stats(seg: &GpxSegment) -> Option<TrackStats> {
    let timed: Vec<(&GpxPoint, DateTime<Utc>)> = seg
        .points
        .iter()
        .filter_map(|pt| pt.time.map(|time| (pt, time)))
        .collect();

    if timed.len() < 2 {
        return None;
    }

    let distance_km = timed
        .windows(2)
        .map(|pair| haversine_km(pair[0].0, pair[1].0))
        .sum();

    let (_, start) = timed[0];
    let (_, end) = timed[timed.len() - 1];

    Some(TrackStats {
        distance_km,
        // clock jumps backwards count as no time spent
        duration: (end - start).max(TimeDelta::zero()),
    })
}

/// Sum segment statistics over every track of every document.
///
/// Segments are independent recordings: the time between the end of one
/// segment and the start of the next is not counted. Routes and waypoints
/// never contribute.
pub fn compute_stats(docs: &[GpxDocument]) -> Option<TrackStats> {
    docs.iter()
        .flat_map(|doc| &doc.tracks)
        .flat_map(|trk| &trk.segments)
        .filter_map(segment_stats)
        .reduce(|a, b| a + b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timed(lat: f64, lon: f64, secs: i64) -> GpxPoint {
        GpxPoint {
            time: Some(Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap()),
            ..GpxPoint::new(lat, lon)
        }
    }

    fn doc_with_segments(segments: Vec<Vec<GpxPoint>>) -> GpxDocument {
        GpxDocument {
            tracks: vec![GpxTrack {
                segments: segments
                    .into_iter()
                    .map(|points| GpxSegment { points })
                    .collect(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_haversine_distance() {
        let d = haversine_km(&GpxPoint::new(0.0, 0.0), &GpxPoint::new(0.0, 1.0));
        assert!((d - 111.195).abs() < 0.01);

        let p = GpxPoint::new(48.1, 11.5);
        assert_eq!(haversine_km(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_antipodal_is_finite() {
        let d = haversine_km(&GpxPoint::new(-87.5, 0.0), &GpxPoint::new(87.5, 180.0));
        assert!((d - 20_015.09).abs() < 0.1);

        let d = haversine_km(&GpxPoint::new(0.0, 0.0), &GpxPoint::new(0.0, 180.0));
        assert!((d - 20_015.09).abs() < 0.1);

        let d = haversine_km(&GpxPoint::new(95.0, 0.0), &GpxPoint::new(-95.0, 180.0));
        assert!(d.is_finite());
    }

    #[test]
    fn test_antipodal_leg_keeps_segment_distance() {
        let seg = GpxSegment {
            points: vec![
                timed(0.0, 0.0, 0),
                timed(0.0, 0.1, 60),
                timed(-87.5, 0.0, 120),
                timed(87.5, 180.0, 180),
            ],
        };
        let stats = segment_stats(&seg).unwrap();
        assert!(stats.distance_km.is_finite());
        assert!(stats.distance_km > 20_015.0 + 9_000.0);
        assert_eq!(stats.duration, TimeDelta::seconds(180));
    }

    #[test]
    fn test_untimed_first_point_still_counts() {
        let seg = GpxSegment {
            points: vec![
                GpxPoint::new(0.0, -1.0),
                timed(0.0, 0.0, 0),
                timed(0.0, 0.01, 300),
            ],
        };
        let stats = segment_stats(&seg).unwrap();
        assert!((stats.distance_km - 1.112).abs() < 0.001);
        assert_eq!(stats.duration, TimeDelta::seconds(300));
    }

    #[test]
    fn test_single_segment() {
        let seg = GpxSegment {
            points: vec![timed(0.0, 0.0, 0), timed(0.0, 0.5, 600), timed(0.0, 1.0, 1200)],
        };
        let stats = segment_stats(&seg).unwrap();
        assert!((stats.distance_km - 111.195).abs() < 0.01);
        assert_eq!(stats.duration, TimeDelta::seconds(1200));
    }

    #[test]
    fn test_untimed_points_are_skipped() {
        let seg = GpxSegment {
            points: vec![
                GpxPoint::new(0.0, -1.0),
                timed(0.0, 0.0, 10),
                GpxPoint::new(5.0, 5.0),
                timed(0.0, 1.0, 70),
                GpxPoint::new(0.0, 2.0),
            ],
        };
        let stats = segment_stats(&seg).unwrap();
        assert!((stats.distance_km - 111.195).abs() < 0.01);
        assert_eq!(stats.duration, TimeDelta::seconds(60));
    }

    #[test]
    fn test_fewer_than_two_timed_points() {
        let seg = GpxSegment {
            points: vec![timed(0.0, 0.0, 0), GpxPoint::new(0.0, 1.0)],
        };
        assert_eq!(segment_stats(&seg), None);

        let doc = doc_with_segments(vec![vec![GpxPoint::new(0.0, 0.0), GpxPoint::new(0.0, 1.0)]]);
        assert_eq!(compute_stats(&[doc]), None);
    }

    #[test]
    fn test_segments_sum_without_gaps() {
        let doc = doc_with_segments(vec![
            vec![timed(0.0, 0.0, 0), timed(0.0, 1.0, 300)],
            vec![timed(1.0, 1.0, 3600), timed(1.0, 2.0, 3750)],
        ]);
        let stats = compute_stats(&[doc]).unwrap();
        assert_eq!(stats.duration, TimeDelta::seconds(450));
        assert!(stats.distance_km > 222.0 && stats.distance_km < 223.0);
    }

    #[test]
    fn test_documents_are_merged() {
        let a = doc_with_segments(vec![vec![timed(0.0, 0.0, 0), timed(0.0, 1.0, 100)]]);
        let b = doc_with_segments(vec![vec![timed(0.0, 0.0, 0), timed(0.0, 1.0, 200)]]);
        let stats = compute_stats(&[a, b]).unwrap();
        assert_eq!(stats.duration, TimeDelta::seconds(300));
        assert!((stats.distance_km - 2.0 * 111.195).abs() < 0.02);
    }

    #[test]
    fn test_routes_never_contribute() {
        let doc = GpxDocument {
            routes: vec![GpxRoute {
                points: vec![timed(0.0, 0.0, 0), timed(0.0, 1.0, 60)],
            }],
            ..Default::default()
        };
        assert_eq!(compute_stats(&[doc]), None);
    }

    #[test]
    fn test_backwards_clock_counts_as_zero() {
        let seg = GpxSegment {
            points: vec![timed(0.0, 0.0, 100), timed(0.0, 0.1, 40)],
        };
        let stats = segment_stats(&seg).unwrap();
        assert_eq!(stats.duration, TimeDelta::zero());
        assert!(stats.distance_km > 0.0);
    }

    #[test]
    fn test_appending_points_never_decreases_distance() {
        let mut points = vec![timed(45.0, 7.0, 0)];
        let mut previous = 0.0;
        for i in 1..20 {
            let step = i as f64;
            points.push(timed(45.0 + step * 0.001, 7.0 - step * 0.0007, i * 10));
            let stats = segment_stats(&GpxSegment {
                points: points.clone(),
            })
            .unwrap();
            assert!(stats.distance_km >= previous);
            previous = stats.distance_km;
        }
    }
}
