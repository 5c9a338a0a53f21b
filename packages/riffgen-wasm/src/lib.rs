use riffgen::{RiffError, RiffRequest};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct EngineError {
    kind: &'static str,
    message: String,
    line: Option<usize>,
    column: Option<usize>,
}

fn error_kind(e: &RiffError) -> &'static str {
    match e {
        RiffError::UnknownNote(_) => "unknown-note",
        RiffError::UnknownScale(_) => "unknown-scale",
        RiffError::UnknownTuning(_) => "unknown-tuning",
        RiffError::UnknownPattern(_) => "unknown-pattern",
        RiffError::UnknownProgression(_) => "unknown-progression",
        RiffError::ScaleCardinality { .. } => "scale-cardinality",
        RiffError::RootNotFound { .. } => "root-not-found",
        RiffError::InvalidPosition(_) => "invalid-position",
        RiffError::InvalidBars(_) => "invalid-bars",
        RiffError::InvalidTempo(_) => "invalid-tempo",
        RiffError::InvalidPitch(_) => "invalid-pitch",
        RiffError::TabParse { .. } => "tab-parse",
        RiffError::ConfigError(_) => "config",
    }
}

fn to_engine_error(e: RiffError) -> EngineError {
    let kind = error_kind(&e);
    match e {
        RiffError::TabParse { line, column, message } => EngineError {
            kind,
            message,
            line: Some(line),
            column: Some(column),
        },
        other => EngineError {
            kind,
            message: other.to_string(),
            line: None,
            column: None,
        },
    }
}

fn to_js_error(e: RiffError) -> JsValue {
    let error = to_engine_error(e);
    match serde_json::to_string(&error) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&error.message),
    }
}

/// Generate six-line tab text
#[wasm_bindgen]
pub fn generate_tab(
    root: &str,
    scale: &str,
    pattern: &str,
    bars: usize,
    position: u8,
) -> Result<String, JsValue> {
    riffgen::generate_tab(root, scale, pattern, bars, position).map_err(to_js_error)
}

/// Generate pattern, tab and MIDI bytes from a YAML riff request.
/// The pattern comes back as JSON, the MIDI as a byte array.
#[wasm_bindgen]
pub fn generate_riff(request_yaml: &str) -> Result<JsValue, JsValue> {
    #[derive(Serialize)]
    struct RiffJs<'a> {
        pattern: &'a riffgen::Pattern,
        tab: &'a str,
        midi: &'a [u8],
    }

    let request = RiffRequest::from_yaml(request_yaml).map_err(to_js_error)?;
    let riff = riffgen::generate_riff(&request).map_err(to_js_error)?;
    let out = RiffJs {
        pattern: &riff.pattern,
        tab: &riff.tab,
        midi: riff.midi.as_bytes(),
    };
    serde_wasm_bindgen::to_value(&out).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Scale name, spelled notes and note count
#[wasm_bindgen]
pub fn get_scale_info(root: &str, scale: &str) -> Result<JsValue, JsValue> {
    let info = riffgen::scale_info(root, scale).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&info).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode MIDI note numbers as eighth notes in a format-0 file
#[wasm_bindgen]
pub fn create_midi_file(notes: &[u8], bpm: u16) -> Result<Vec<u8>, JsValue> {
    riffgen::create_midi_file(notes, bpm)
        .map(|file| file.into_bytes())
        .map_err(to_js_error)
}

/// Parse tab text; returns columns of {string, fret} as JSON
#[wasm_bindgen]
pub fn parse_tab(text: &str) -> Result<String, JsValue> {
    let columns = riffgen::parse_tab(text).map_err(to_js_error)?;
    serde_json::to_string(&columns).map_err(|e| JsValue::from_str(&e.to_string()))
}
