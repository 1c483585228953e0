//! Typed access to the fields of a scene document node, and the few writers
//! needed to emit one. Reading mirrors how every object deserializes itself:
//! absent optional fields leave the current value alone, present fields of
//! the wrong kind are an error.

use serde_json::{Map, Number, Value};

use crate::geometry::Vec3;

use super::SceneError;

pub trait FromJson: Sized {
    /// Describes the accepted node kinds, for error messages
    const EXPECTED: &'static str;

    fn from_json(value: &Value) -> Option<Self>;
}

impl FromJson for f32 {
    const EXPECTED: &'static str = "a number in the range of f32";

    // out of range values would become infinite and could not be written back
    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_f64()
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
    }
}

impl FromJson for u32 {
    const EXPECTED: &'static str = "a non-negative integer";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_u64().and_then(|v| u32::try_from(v).ok())
    }
}

impl FromJson for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromJson for String {
    const EXPECTED: &'static str = "a string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromJson for Vec3 {
    const EXPECTED: &'static str = "a number or an array of 3 numbers";

    // a lone scalar is broadcast to all three components
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(_) => f32::from_json(value).map(Vec3::splat),
            Value::Array(elements) if elements.len() == 3 => {
                let x = f32::from_json(&elements[0])?;
                let y = f32::from_json(&elements[1])?;
                let z = f32::from_json(&elements[2])?;
                Some(Vec3(x, y, z))
            }
            _ => None,
        }
    }
}

impl FromJson for [u32; 2] {
    const EXPECTED: &'static str = "an array of 2 non-negative integers";

    fn from_json(value: &Value) -> Option<Self> {
        match value.as_array()?.as_slice() {
            [a, b] => Some([u32::from_json(a)?, u32::from_json(b)?]),
            _ => None,
        }
    }
}

pub fn member<'a>(value: &'a Value, field: &str) -> Result<&'a Value, SceneError> {
    value.get(field).ok_or_else(|| SceneError::MissingField {
        field: field.to_owned(),
    })
}

pub fn required<T: FromJson>(value: &Value, field: &str) -> Result<T, SceneError> {
    T::from_json(member(value, field)?).ok_or_else(|| SceneError::invalid(field, T::EXPECTED))
}

pub fn optional<T: FromJson>(value: &Value, field: &str) -> Result<Option<T>, SceneError> {
    match value.get(field) {
        None => Ok(None),
        Some(node) => T::from_json(node)
            .map(Some)
            .ok_or_else(|| SceneError::invalid(field, T::EXPECTED)),
    }
}

/// Overwrites `dst` if `field` is present; returns whether it was
pub fn read<T: FromJson>(value: &Value, field: &str, dst: &mut T) -> Result<bool, SceneError> {
    match optional(value, field)? {
        Some(v) => {
            *dst = v;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub fn type_tag(value: &Value) -> Result<&str, SceneError> {
    member(value, "type")?
        .as_str()
        .ok_or_else(|| SceneError::invalid("type", String::EXPECTED))
}

// shortest decimal that reads back to the same f32, so 0.1 is written as 0.1
// and not 0.10000000149011612
pub fn float(value: f32) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

pub fn vec3(value: Vec3) -> Value {
    Value::Array(vec![float(value.0), float(value.1), float(value.2)])
}

/// Start of every serialized object: its type tag, then its name if it has one
pub fn header(type_tag: &str, name: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".to_owned(), Value::from(type_tag));
    if !name.is_empty() {
        map.insert("name".to_owned(), Value::from(name));
    }
    map
}
