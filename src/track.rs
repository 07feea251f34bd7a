use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::error::ParseError;
use crate::format::Locale;
use crate::geometry::{Path, Point, collect_geometry};
use crate::parser::parse_gpx;
use crate::stats::compute_stats;

/// Parameter under which a content item stores its GPX attachments.
pub const GPX_ATTACHMENT_KEY: &str = "gpx";

/// Everything a map widget needs to draw a trip and summarize it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrackResult {
    pub has_points: bool,
    pub paths: Vec<Path>,
    pub points: Vec<Point>,
    pub kilometers: String,
    pub hours: String,
}

/// Source of raw GPX texts, in attachment order.
pub trait GpxAttachments {
    fn gpx_attachments(&self) -> Vec<&str>;
}

/// A content item with its key/value parameters. Keys may repeat.
#[derive(Debug, Default, Clone)]
pub struct ContentItem {
    pub parameters: BTreeMap<String, Vec<String>>,
}

impl ContentItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }
}

impl GpxAttachments for ContentItem {
    fn gpx_attachments(&self) -> Vec<&str> {
        self.parameters
            .get(GPX_ATTACHMENT_KEY)
            .map(|values| values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl GpxAttachments for [String] {
    fn gpx_attachments(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

impl GpxAttachments for Vec<String> {
    fn gpx_attachments(&self) -> Vec<&str> {
        self.as_slice().gpx_attachments()
    }
}

impl GpxAttachments for [&str] {
    fn gpx_attachments(&self) -> Vec<&str> {
        self.to_vec()
    }
}

/// Build the track result for a content item's GPX attachments.
pub fn get_track<A>(item: &A, locale: &Locale) -> Result<TrackResult, ParseError>
where
    A: GpxAttachments + ?Sized,
{
    build_track_result(item.gpx_attachments().as_slice(), locale)
}

/// Parse every attachment, merge their geometry and statistics, and format
/// the statistics for `locale`.
///
/// The first attachment that fails to parse aborts the whole call.
pub fn build_track_result<S: AsRef<str>>(
    attachments: &[S],
    locale: &Locale,
) -> Result<TrackResult, ParseError> {
    let mut docs = Vec::with_capacity(attachments.len());
    for (index, gpx) in attachments.iter().enumerate() {
        let doc = parse_gpx(gpx.as_ref())
            .inspect_err(|e| warn!("GPX attachment {index} is malformed: {e}"))?;
        debug!(
            "GPX attachment {index}: {} waypoints, {} routes, {} tracks",
            doc.waypoints.len(),
            doc.routes.len(),
            doc.tracks.len()
        );
        docs.push(doc);
    }

    let geometry = collect_geometry(&docs);
    let stats = compute_stats(&docs);
    if let Some(stats) = &stats {
        debug!(
            "track statistics: {:.3} km in {} s",
            stats.distance_km,
            stats.duration.num_seconds()
        );
    }
    let (kilometers, hours) = locale.format_stats(stats.as_ref());

    Ok(TrackResult {
        has_points: !geometry.is_empty(),
        paths: geometry.paths,
        points: geometry.points,
        kilometers,
        hours,
    })
}
