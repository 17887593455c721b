//! Display encoding of property values.
//!
//! Values published on the bus are always strings: booleans become the
//! canonical `ON`/`OFF` tokens, enumerated codes become their labels, and
//! everything else is rendered the way the upstream client would print it.

use crate::schema::{Property, PropertyKind};
use serde_json::{Number, Value};

/// Token published for a truthy boolean.
pub const ON: &str = "ON";
/// Token published for a falsy boolean.
pub const OFF: &str = "OFF";

/// Encode a boolean property value.
#[must_use]
pub fn encode_bool(value: &Value) -> &'static str {
    if is_truthy(value) {
        ON
    } else {
        OFF
    }
}

/// Encode a numeric property value, resolving codes through the property's labels.
///
/// Codes without a label fall back to the raw number.
#[must_use]
pub fn encode_number(property: &Property, value: &Value) -> String {
    if let Some(label) = integer_code(value).and_then(|code| property.label(code)) {
        return label.to_string();
    }

    render(value)
}

/// Encode a value for the attributes document.
#[must_use]
pub fn encode_attribute(property: &Property, value: &Value) -> String {
    match property.kind {
        PropertyKind::Enumerated => encode_number(property, value),
        PropertyKind::Boolean | PropertyKind::Numeric | PropertyKind::String => render(value),
    }
}

/// Render a raw value as plain text.
#[must_use]
pub fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => render_number(number),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Turn a camelCase property key into a title: `motionDetection` -> `Motion Detection`.
#[must_use]
pub fn humanize_key(key: &str) -> String {
    let mut words = String::with_capacity(key.len() + 4);

    for (index, ch) in key.chars().enumerate() {
        if index == 0 {
            words.extend(ch.to_uppercase());
        } else {
            if ch.is_ascii_uppercase() {
                words.push(' ');
            }
            words.push(ch);
        }
    }

    words
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integer_code(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(code) = number.as_i64() {
        return Some(code);
    }

    let float = number.as_f64()?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn render_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }

    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => (float as i64).to_string(),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}
