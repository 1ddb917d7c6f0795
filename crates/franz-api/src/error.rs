//! Error types for the Franz API model

use thiserror::Error;

/// Errors that can occur while decoding payloads into model entities or
/// manipulating their additional properties.
///
/// All errors are synchronous and non-retryable; recovery policy belongs to
/// the caller.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Payload is not well-formed JSON
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is not well-formed YAML
    #[error("malformed YAML payload: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Payload parsed, but the top level is not an object
    #[error("payload must be an object, got {actual}")]
    NotAnObject { actual: &'static str },

    /// A declared field's value disagrees with its semantic type
    #[error("invalid value for field `{field}` of {kind}: {detail}")]
    TypeMismatch {
        kind: &'static str,
        field: &'static str,
        detail: String,
    },

    /// Attempt to set an additional property whose name is a declared field
    #[error("`{field}` is a declared field of {kind} and cannot be set as an additional property")]
    SchemaConflict { kind: &'static str, field: String },
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// The field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ModelError::TypeMismatch { field, .. } => Some(field),
            ModelError::SchemaConflict { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    /// Check if this error is a declared-field name collision.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ModelError::SchemaConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = ModelError::TypeMismatch {
            kind: "JmxOptions",
            field: "authentication",
            detail: "invalid type: string, expected a map".to_string(),
        };
        assert!(err.to_string().contains("authentication"));
        assert!(err.to_string().contains("JmxOptions"));
    }

    #[test]
    fn test_schema_conflict_display() {
        let err = ModelError::SchemaConflict {
            kind: "MirrorStatus",
            field: "connectors".to_string(),
        };
        assert!(err.to_string().contains("connectors"));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_field_accessor() {
        let err = ModelError::TypeMismatch {
            kind: "PodTemplate",
            field: "tolerations",
            detail: "invalid type".to_string(),
        };
        assert_eq!(err.field(), Some("tolerations"));

        let err = ModelError::NotAnObject { actual: "array" };
        assert_eq!(err.field(), None);
        assert!(!err.is_conflict());
    }
}
