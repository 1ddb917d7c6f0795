//! Decode and encode entry points for model entities
//!
//! Payloads arrive as JSON (the API server wire form) or YAML (manifests).
//! Decoding tries declared fields first and parks every remaining key in the
//! entity's extension bag; encoding emits declared fields in their fixed
//! per-kind order under each field's inclusion policy, then the bag entries.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::unknown::{JsonObject, PreserveUnknownFields};

/// A model entity that can be decoded from a payload object.
///
/// `from_object` consumes the payload mapping: each declared field is
/// removed and decoded by its semantic type (missing and `null` both yield
/// the field's unset/empty value), and whatever remains becomes the
/// entity's additional properties. Implementations route every declared
/// field through [`declared_field`].
pub trait Entity: PreserveUnknownFields + Serialize + Sized {
    /// Build the entity from a decoded payload object.
    fn from_object(object: JsonObject) -> Result<Self>;
}

/// Decode an entity from a JSON string.
pub fn from_json_str<T: Entity>(payload: &str) -> Result<T> {
    let value: Value = serde_json::from_str(payload)?;
    from_value(value)
}

/// Decode an entity from a YAML string.
pub fn from_yaml_str<T: Entity>(payload: &str) -> Result<T> {
    let value: Value = serde_yaml::from_str(payload)?;
    from_value(value)
}

/// Decode an entity from an already-parsed payload value.
pub fn from_value<T: Entity>(value: Value) -> Result<T> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(ModelError::NotAnObject {
                actual: value_kind(&other),
            })
        }
    };
    let entity = T::from_object(object)?;
    if !entity.additional_properties().is_empty() {
        tracing::debug!(
            kind = T::KIND,
            fields = entity.additional_properties().len(),
            "preserved unknown fields"
        );
    }
    Ok(entity)
}

/// Encode an entity to a payload value.
pub fn to_value<T: Serialize>(entity: &T) -> Result<Value> {
    Ok(serde_json::to_value(entity)?)
}

/// Encode an entity to a JSON string.
pub fn to_json_string<T: Serialize>(entity: &T) -> Result<String> {
    Ok(serde_json::to_string(entity)?)
}

/// Encode an entity to a YAML string.
pub fn to_yaml_string<T: Serialize>(entity: &T) -> Result<String> {
    Ok(serde_yaml::to_string(entity)?)
}

/// Decode one declared field out of a payload object.
///
/// Removes `field` from `object` so the caller can sweep the leftovers into
/// the extension bag. A missing or `null` value decodes to `T::default()`;
/// a value of the wrong shape fails with [`ModelError::TypeMismatch`]
/// naming the field. Downstream crates defining their own entities use this
/// from their `from_object` implementations.
pub fn declared_field<T>(
    object: &mut JsonObject,
    kind: &'static str,
    field: &'static str,
) -> Result<T>
where
    T: Default + DeserializeOwned,
{
    match object.remove(field) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|err| ModelError::TypeMismatch {
            kind,
            field,
            detail: err.to_string(),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jmx::JmxOptions;
    use serde_json::json;

    #[test]
    fn test_malformed_json() {
        let err = from_json_str::<JmxOptions>("{not json").unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = from_yaml_str::<JmxOptions>("{invalid").unwrap_err();
        assert!(matches!(err, ModelError::Yaml(_)));
    }

    #[test]
    fn test_top_level_must_be_an_object() {
        let err = from_value::<JmxOptions>(json!([1, 2])).unwrap_err();
        match err {
            ModelError::NotAnObject { actual } => assert_eq!(actual, "array"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_yaml_decode() {
        let jmx: JmxOptions = from_yaml_str("extraKnob: true\n").unwrap();
        assert_eq!(jmx.additional_property("extraKnob"), Some(&json!(true)));
    }

    #[test]
    fn test_declared_field_missing_and_null() {
        let mut object = json!({"a": null}).as_object().unwrap().clone();
        let a: Option<String> = declared_field(&mut object, "Probe", "a").unwrap();
        let b: Vec<String> = declared_field(&mut object, "Probe", "b").unwrap();
        assert_eq!(a, None);
        assert!(b.is_empty());
        assert!(object.is_empty());
    }

    #[test]
    fn test_declared_field_type_mismatch() {
        let mut object = json!({"a": "nope"}).as_object().unwrap().clone();
        let err = declared_field::<Vec<String>>(&mut object, "Probe", "a").unwrap_err();
        assert_eq!(err.field(), Some("a"));
    }
}
