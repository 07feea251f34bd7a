use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ParseError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, ParseError>;

/// Parse a GPX XML string into a GpxDocument.
///
/// The text must be a single `<gpx>` document: only whitespace, comments and
/// processing instructions may surround the root. Unknown elements inside it
/// are ignored. Coordinates, elevations and timestamps must be well-formed.
pub fn parse_gpx(xml: &str) -> Result<GpxDocument> {
    let mut reader = Reader::from_str(xml);

    let doc = loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"gpx" => {
                break parse_root(&mut reader)?;
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"gpx" => {
                break GpxDocument::default();
            }
            Ok(Event::Start(_)) | Ok(Event::Empty(_)) | Ok(Event::Eof) => {
                return Err(ParseError::MissingRoot);
            }
            Ok(event) if is_content(&event) => {
                return Err(ParseError::UnexpectedContent {
                    position: "before <gpx>",
                });
            }
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    };

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) if is_content(&event) => {
                return Err(ParseError::UnexpectedContent {
                    position: "after </gpx>",
                });
            }
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(doc)
}

/// Whether an event outside the root element is document content.
fn is_content(event: &Event<'_>) -> bool {
    match event {
        Event::Text(e) => e.as_ref().iter().any(|b| !b.is_ascii_whitespace()),
        Event::Start(_)
        | Event::Empty(_)
        | Event::End(_)
        | Event::CData(_)
        | Event::GeneralRef(_) => true,
        _ => false,
    }
}

/// Parse the children of <gpx>. Called after receiving Event::Start for the root.
fn parse_root<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxDocument> {
    let mut doc = GpxDocument::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"wpt" => {
                    let (point, name) = parse_point(&e, "wpt", reader)?;
                    doc.waypoints.push(GpxWaypoint {
                        lat: point.lat,
                        lon: point.lon,
                        ele: point.ele,
                        name,
                    });
                }
                b"rte" => doc.routes.push(parse_route(reader)?),
                b"trk" => doc.tracks.push(parse_track(reader)?),
                _ => {
                    // metadata, extensions
                    reader
                        .read_to_end(e.name())
                        .map_err(ParseError::XmlParse)?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"wpt" {
                    let (lat, lon) = parse_lat_lon(&e, "wpt")?;
                    doc.waypoints.push(GpxWaypoint::new(lat, lon));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"gpx" => break,
            Ok(Event::Eof) => return Err(ParseError::UnexpectedEof { element: "gpx" }),
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(doc)
}

/// Parse lat/lon attributes from a point element's start tag.
fn parse_lat_lon(e: &BytesStart<'_>, element: &'static str) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| ParseError::XmlParse(e.into()))?;
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(parse_degrees(val, element, "lat")?),
            b"lon" => lon = Some(parse_degrees(val, element, "lon")?),
            _ => {}
        }
    }

    let lat = lat.ok_or(ParseError::MissingAttribute {
        element,
        attribute: "lat",
    })?;
    let lon = lon.ok_or(ParseError::MissingAttribute {
        element,
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

fn parse_degrees(val: &str, element: &'static str, attribute: &'static str) -> Result<f64> {
    val.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidAttribute {
            element,
            attribute,
            value: val.to_string(),
        })
}

/// Parse a point element (wpt, rtept, trkpt) and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    element: &'static str,
    reader: &mut Reader<&'a [u8]>,
) -> Result<(GpxPoint, Option<String>)> {
    let (lat, lon) = parse_lat_lon(start, element)?;
    let mut point = GpxPoint::new(lat, lon);
    let mut name = None;
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = read_text_owned(reader, &e, "ele")?;
                    point.ele = parse_elevation(&text)?;
                }
                b"time" => {
                    let text = read_text_owned(reader, &e, "time")?;
                    point.time = parse_time(&text)?;
                }
                b"name" => name = Some(read_text_owned(reader, &e, "name")?),
                _ => {
                    // desc, sym, link, extensions, GPX 1.0 speed/course
                    reader
                        .read_to_end(e.name())
                        .map_err(ParseError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => return Err(ParseError::UnexpectedEof { element }),
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    }

    Ok((point, name))
}

fn parse_elevation(text: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| ParseError::InvalidNumber {
            element: "ele",
            value: text.to_string(),
        })
}

/// Parse an RFC 3339 timestamp. Values without an offset are taken as UTC.
fn parse_time(text: &str) -> Result<Option<DateTime<Utc>>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| ParseError::InvalidTime {
            value: text.to_string(),
        })
}

/// Parse a <rte> element.
fn parse_route<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxRoute> {
    let mut route = GpxRoute::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"rtept" => route.points.push(parse_point(&e, "rtept", reader)?.0),
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(ParseError::XmlParse)?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"rtept" {
                    let (lat, lon) = parse_lat_lon(&e, "rtept")?;
                    route.points.push(GpxPoint::new(lat, lon));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rte" => break,
            Ok(Event::Eof) => return Err(ParseError::UnexpectedEof { element: "rte" }),
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(route)
}

/// Parse a <trk> element.
fn parse_track<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxTrack> {
    let mut track = GpxTrack::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkseg" => {
                    let seg = parse_segment(reader)?;
                    if !seg.points.is_empty() {
                        track.segments.push(seg);
                    }
                }
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(ParseError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => return Err(ParseError::UnexpectedEof { element: "trk" }),
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a <trkseg> element.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxSegment> {
    let mut segment = GpxSegment::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => segment.points.push(parse_point(&e, "trkpt", reader)?.0),
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(ParseError::XmlParse)?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    let (lat, lon) = parse_lat_lon(&e, "trkpt")?;
                    segment.points.push(GpxPoint::new(lat, lon));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => return Err(ParseError::UnexpectedEof { element: "trkseg" }),
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(segment)
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
    element: &'static str,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::CData(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => return Err(ParseError::UnexpectedEof { element }),
            Err(e) => return Err(ParseError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}
