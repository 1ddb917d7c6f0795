//! Unknown-field preservation for model entities
//!
//! Custom resources are routinely written by one control-plane version and
//! read back by another. Every entity in this crate therefore carries, next
//! to its declared fields, a bag of additional properties holding whatever
//! the payload contained that the declared schema does not know about. The
//! bag survives decode/encode round-trips verbatim, so a resource touched by
//! a schema-newer writer loses nothing when this crate reads, modifies, and
//! writes it back.

use serde_json::Value;

use crate::error::{ModelError, Result};

/// A decoded JSON object, as used for extension bags and opaque
/// sub-documents.
pub type JsonObject = serde_json::Map<String, Value>;

/// Capability implemented by every model entity: typed declared fields plus
/// an extension bag for everything else.
///
/// A field name never appears both as a declared field and in the bag;
/// [`set_additional_property`](Self::set_additional_property) rejects the
/// collision, and decoding routes each payload key to exactly one of the
/// two.
pub trait PreserveUnknownFields {
    /// Entity kind name, used in error reporting.
    const KIND: &'static str;

    /// Wire names of the declared fields, in encoded order.
    const DECLARED_FIELDS: &'static [&'static str];

    /// All additional properties of this entity.
    fn additional_properties(&self) -> &JsonObject;

    /// Mutable access to the bag for decode and builder plumbing.
    ///
    /// Callers should go through
    /// [`set_additional_property`](Self::set_additional_property) instead,
    /// which enforces the declared-field collision check.
    fn additional_properties_mut(&mut self) -> &mut JsonObject;

    /// Look up an additional property by name.
    ///
    /// Declared fields are reachable only through their own typed accessors;
    /// for a declared-field name this always returns `None`.
    fn additional_property(&self, name: &str) -> Option<&Value> {
        self.additional_properties().get(name)
    }

    /// Insert or overwrite an additional property.
    ///
    /// Fails with [`ModelError::SchemaConflict`] if `name` is one of the
    /// entity's declared fields, leaving the entity unmodified.
    fn set_additional_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let name = name.into();
        if Self::DECLARED_FIELDS.contains(&name.as_str()) {
            return Err(ModelError::SchemaConflict {
                kind: Self::KIND,
                field: name,
            });
        }
        self.additional_properties_mut().insert(name, value.into());
        Ok(())
    }
}
