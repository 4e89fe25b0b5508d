//! Raw detail record -> `Pokemon`

use serde_json::Value;

use crate::api::DetailRecord;
use crate::state::Pokemon;

/// Artwork sources, most preferred first.
const IMAGE_POINTERS: [&str; 2] = [
    "/sprites/other/official-artwork/front_default",
    "/sprites/front_default",
];

/// Build a complete entity from a detail record. Missing or malformed fields
/// fall back to defaults; this never fails.
pub fn normalize(record: &DetailRecord) -> Pokemon {
    let body = &record.body;
    Pokemon {
        name: record.name.clone(),
        weight: measure(body, "weight"),
        height: measure(body, "height"),
        types: slot_names(body, "types", "/type/name"),
        moves: slot_names(body, "moves", "/move/name"),
        image: resolve_image(body),
    }
}

fn measure(body: &Value, field: &str) -> f64 {
    body.get(field)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}

fn slot_names(body: &Value, field: &str, pointer: &str) -> Vec<String> {
    let Some(slots) = body.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };
    slots
        .iter()
        .filter_map(|slot| slot.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn resolve_image(body: &Value) -> Option<String> {
    IMAGE_POINTERS.iter().find_map(|pointer| {
        body.pointer(pointer)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    })
}
