//! Deterministic deep-merge of layered configuration documents.
//!
//! Later layers win. Arrays are replaced wholesale, never concatenated or
//! element-merged: splicing two authors' variant-option or media lists has no
//! sane interleaving. Non-map layers (`null`, scalars, arrays) contribute
//! nothing, so callers never special-case "no base defaults".

use serde_json::{Map, Value};

/// Merge `layers` left-to-right into a single map.
///
/// Pure: inputs are never mutated and repeated calls with the same inputs
/// produce structurally-equal output.
pub fn deep_merge(layers: &[&Value]) -> Value {
    let mut out = Map::new();
    for layer in layers {
        if let Value::Object(map) = layer {
            merge_into(&mut out, map);
        }
    }
    Value::Object(out)
}

fn merge_into(out: &mut Map<String, Value>, src: &Map<String, Value>) {
    for (key, value) in src {
        match value {
            // Arrays replace; see module docs.
            Value::Array(items) => {
                out.insert(key.clone(), Value::Array(items.clone()));
            }
            // Maps recurse only when both sides hold a map at this key.
            Value::Object(nested) => match out.get_mut(key) {
                Some(Value::Object(existing)) => merge_into(existing, nested),
                _ => {
                    let mut fresh = Map::new();
                    merge_into(&mut fresh, nested);
                    out.insert(key.clone(), Value::Object(fresh));
                }
            },
            scalar => {
                out.insert(key.clone(), scalar.clone());
            }
        }
    }
}
