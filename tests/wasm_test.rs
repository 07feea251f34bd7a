#![cfg(target_arch = "wasm32")]

use geotrack_wasm::{get_track_geojson, get_track_js, get_track_json};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const TRACK: &str = r#"<gpx><trk><trkseg>
  <trkpt lat="0.0" lon="0.0"><time>2024-01-01T10:00:00Z</time></trkpt>
  <trkpt lat="0.0" lon="0.01"><time>2024-01-01T10:00:42Z</time></trkpt>
</trkseg></trk></gpx>"#;

fn attachments(texts: &[&str]) -> JsValue {
    let array = js_sys::Array::new();
    for text in texts {
        array.push(&JsValue::from_str(text));
    }
    array.into()
}

fn options(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn test_get_track_json_default_options() {
    let json = get_track_json(attachments(&[TRACK]), JsValue::UNDEFINED).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["HasPoints"], true);
    assert_eq!(value["Kilometers"], "1.11");
    assert_eq!(value["Hours"], "0:00:42");
}

#[wasm_bindgen_test]
fn test_get_track_object_with_lang() {
    let result = get_track_js(attachments(&[TRACK]), options(r#"{"lang":"de"}"#)).unwrap();
    let km = js_sys::Reflect::get(&result, &JsValue::from_str("Kilometers")).unwrap();
    assert_eq!(km.as_string().as_deref(), Some("1,11"));
}

#[wasm_bindgen_test]
fn test_get_track_geojson() {
    let json = get_track_geojson(attachments(&[TRACK]), JsValue::NULL).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"][0]["geometry"]["type"], "LineString");
    assert_eq!(value["kilometers"], "1.11");
}

#[wasm_bindgen_test]
fn test_errors_become_strings() {
    let err = get_track_json(attachments(&["<gpx><wpt lat=\"1\"/></gpx>"]), JsValue::NULL)
        .unwrap_err();
    assert_eq!(
        err.as_string().as_deref(),
        Some("Missing attribute 'lon' on <wpt>")
    );

    let err = get_track_json(JsValue::from_str(TRACK), JsValue::NULL).unwrap_err();
    assert!(err.as_string().unwrap().contains("array"));
}
