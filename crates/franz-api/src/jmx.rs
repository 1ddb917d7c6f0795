//! JMX access configuration for broker-style workloads

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{self, Entity};
use crate::error::Result;
use crate::unknown::{JsonObject, PreserveUnknownFields};

/// JMX options for a workload exposing a JMX port.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JmxOptions {
    /// Authentication configuration for connecting to the JMX port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<JmxAuthentication>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// Authentication mechanism for the JMX port, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type")]
pub enum JmxAuthentication {
    /// Username/password authentication backed by an operator-managed secret
    #[serde(rename = "password")]
    Password(JmxAuthenticationPassword),
}

/// Password authentication for the JMX port.
///
/// Carries no declared fields beyond the discriminator; credentials are
/// generated by the operator. Schema-newer writers may attach further keys,
/// which round-trip through the additional properties.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
pub struct JmxAuthenticationPassword {
    #[serde(flatten)]
    additional_properties: JsonObject,
}

impl PreserveUnknownFields for JmxOptions {
    const KIND: &'static str = "JmxOptions";
    const DECLARED_FIELDS: &'static [&'static str] = &["authentication"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for JmxOptions {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            authentication: codec::declared_field(&mut object, Self::KIND, "authentication")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for JmxOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl PreserveUnknownFields for JmxAuthenticationPassword {
    const KIND: &'static str = "JmxAuthenticationPassword";
    const DECLARED_FIELDS: &'static [&'static str] = &["type"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for JmxAuthenticationPassword {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        // The discriminator is consumed by the enum; drop it when decoded
        // standalone so it cannot shadow itself in the bag.
        object.remove("type");
        Ok(Self {
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for JmxAuthenticationPassword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl JmxOptions {
    pub fn builder() -> JmxOptionsBuilder {
        JmxOptionsBuilder::default()
    }
}

/// Builder for [`JmxOptions`].
///
/// Builders construct new instances only; there is no editable view of an
/// already-built instance.
#[derive(Default)]
pub struct JmxOptionsBuilder {
    options: JmxOptions,
}

impl JmxOptionsBuilder {
    pub fn authentication(mut self, authentication: JmxAuthentication) -> Self {
        self.options.authentication = Some(authentication);
        self
    }

    /// Enable password authentication on the JMX port.
    pub fn password_authentication(self) -> Self {
        self.authentication(JmxAuthentication::Password(
            JmxAuthenticationPassword::default(),
        ))
    }

    pub fn build(self) -> JmxOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_authentication_decodes_to_unset() {
        let jmx: JmxOptions =
            codec::from_json_str(r#"{"authentication": null, "extraKnob": true}"#).unwrap();
        assert!(jmx.authentication.is_none());
        assert_eq!(jmx.additional_property("extraKnob"), Some(&json!(true)));

        // The null field is omitted on encode; only the unknown key remains.
        let encoded = codec::to_value(&jmx).unwrap();
        assert_eq!(encoded, json!({"extraKnob": true}));
    }

    #[test]
    fn test_password_authentication_round_trip() {
        let payload = json!({
            "authentication": {"type": "password", "secretName": "jmx-credentials"}
        });
        let jmx: JmxOptions = codec::from_value(payload.clone()).unwrap();

        match &jmx.authentication {
            Some(JmxAuthentication::Password(password)) => {
                assert_eq!(
                    password.additional_property("secretName"),
                    Some(&json!("jmx-credentials"))
                );
            }
            other => panic!("unexpected authentication: {other:?}"),
        }

        assert_eq!(codec::to_value(&jmx).unwrap(), payload);
    }

    #[test]
    fn test_scalar_authentication_is_a_type_mismatch() {
        let err = codec::from_json_str::<JmxOptions>(r#"{"authentication": "password"}"#)
            .unwrap_err();
        assert_eq!(err.field(), Some("authentication"));
    }

    #[test]
    fn test_declared_name_cannot_enter_the_bag() {
        let mut jmx = JmxOptions::builder().password_authentication().build();
        let before = jmx.clone();
        let err = jmx
            .set_additional_property("authentication", json!({}))
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(jmx, before);
    }

    #[test]
    fn test_round_trip_with_additional_properties() {
        let mut jmx = JmxOptions::builder().password_authentication().build();
        jmx.set_additional_property("extraKnob", json!({"nested": [1, 2]}))
            .unwrap();

        let decoded: JmxOptions = codec::from_value(codec::to_value(&jmx).unwrap()).unwrap();
        assert_eq!(decoded, jmx);
    }
}
