pub mod converter;
pub mod error;
pub mod format;
pub mod geometry;
pub mod gpx_types;
pub mod options;
pub mod parser;
pub mod stats;
pub mod track;

use wasm_bindgen::prelude::*;

pub use crate::error::ParseError;
pub use crate::format::Locale;
pub use crate::options::TrackOptions;
pub use crate::track::{
    ContentItem, GPX_ATTACHMENT_KEY, GpxAttachments, TrackResult, build_track_result, get_track,
};

/// Build the track result for GPX attachments, returned as a JS object.
#[wasm_bindgen(js_name = getTrack)]
pub fn get_track_js(attachments: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let result = track_result(attachments, options)?;
    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build the track result for GPX attachments, returned as a JSON string.
#[wasm_bindgen(js_name = getTrackJson)]
pub fn get_track_json(attachments: JsValue, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let result = track_result(attachments, options)?;
    serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build the track result for GPX attachments, returned as a GeoJSON string.
#[wasm_bindgen(js_name = getTrackGeoJson)]
pub fn get_track_geojson(attachments: JsValue, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let result = track_result(attachments, options)?;
    let fc = converter::to_feature_collection(&result);
    serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn track_result(attachments: JsValue, options: JsValue) -> Result<TrackResult, JsValue> {
    let opts = parse_options(options)?;
    let attachments = parse_attachments(attachments)?;
    Ok(build_track_result(&attachments, &opts.locale())?)
}

fn parse_options(options: JsValue) -> Result<TrackOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(TrackOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn parse_attachments(attachments: JsValue) -> Result<Vec<String>, JsValue> {
    if attachments.is_undefined() || attachments.is_null() {
        return Ok(Vec::new());
    }
    if !js_sys::Array::is_array(&attachments) {
        return Err(JsValue::from_str("attachments must be an array of GPX strings"));
    }
    js_sys::Array::from(&attachments)
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .as_string()
                .ok_or_else(|| JsValue::from_str(&format!("attachment {index} is not a string")))
        })
        .collect()
}
