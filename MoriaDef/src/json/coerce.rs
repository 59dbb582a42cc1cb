//! Text-to-JSON value coercion for `<change value="...">`
//!
//! Definition files carry every value as text. When the target property
//! already holds a value its JSON type decides how the text is read; when it
//! does not, the text is sniffed instead. Coercion never fails: text that does
//! not parse as the expected type is stored as a plain string.

use serde_json::{Number, Value};

/// Coerce `text` for a property whose current value is `existing`.
///
/// `None` means the property has no value to inspect, in which case the type
/// is inferred from the text itself (see [`infer_value`]).
pub fn coerce(existing: Option<&Value>, text: &str) -> Value {
    match existing {
        Some(current) => coerce_typed(current, text),
        None => infer_value(text),
    }
}

/// Coerce `text` to the JSON type of `existing`.
///
/// - booleans: `true`, `1` and `yes` (any case) are `true`, anything else `false`
/// - floats: parsed as `f64`
/// - integers: parsed as `f64` and rounded half away from zero (`"7.9"` -> `8`,
///   `"12.0"` -> `12`)
/// - everything else (strings, null, arrays, objects): the text as a string
pub fn coerce_typed(existing: &Value, text: &str) -> Value {
    match existing {
        Value::Bool(_) => Value::Bool(parse_flag(text)),
        Value::Number(n) if n.is_f64() => parse_float(text).unwrap_or_else(|| string(text)),
        Value::Number(_) => parse_rounded_int(text).unwrap_or_else(|| string(text)),
        _ => string(text),
    }
}

/// Infer a JSON value from bare text.
///
/// `true`/`false` (any case) become booleans, text containing a `.` is tried
/// as a float, anything else as an integer. Falls back to a string.
pub fn infer_value(text: &str) -> Value {
    let lower = text.to_ascii_lowercase();
    if lower == "true" || lower == "false" {
        return Value::Bool(lower == "true");
    }

    let parsed = if text.contains('.') {
        parse_float(text)
    } else {
        text.trim().parse::<i64>().ok().map(Value::from)
    };
    parsed.unwrap_or_else(|| string(text))
}

fn parse_flag(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    matches!(lower.as_str(), "true" | "1" | "yes")
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_float(text: &str) -> Option<Value> {
    parse_finite(text)
        .and_then(Number::from_f64)
        .map(Value::Number)
}

// i64 bounds as f64; the upper bound itself is not representable as i64
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn parse_rounded_int(text: &str) -> Option<Value> {
    let rounded = parse_finite(text)?.round();
    if (I64_LOWER..I64_UPPER).contains(&rounded) {
        Some(Value::from(rounded as i64))
    } else {
        None
    }
}

fn string(text: &str) -> Value {
    Value::String(text.to_string())
}
