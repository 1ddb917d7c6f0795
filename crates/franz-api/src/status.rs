//! Status sub-documents written by the operator onto its custom resources
//!
//! A status is a point-in-time snapshot, not a state machine: the operator
//! rewrites it wholesale on every reconciliation. All concrete status kinds
//! share the base [`Status`] shape and append their own domain fields; kind
//! is part of identity, so two statuses of different kinds never compare
//! equal no matter how their base fields agree.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{self, Entity};
use crate::error::Result;
use crate::unknown::{JsonObject, PreserveUnknownFields};

/// Condition describing one aspect of a resource's state.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (Ready, NotReady, Warning, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub condition_type: Option<String>,

    /// Status of the condition (True, False, Unknown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Last time the condition transitioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,

    /// Machine-readable reason for the transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// Base shape shared by every concrete status kind.
///
/// Embedded by value in each concrete status; it is not a standalone entity
/// and carries no extension bag of its own.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Conditions in caller-determined order, never deduplicated or sorted
    /// by this layer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Generation of the resource last processed by the controller that
    /// writes this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Endpoint at which the managed workload is reachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Status of a FranzConnect resource.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectStatus {
    /// Base status fields
    #[serde(flatten)]
    pub base: Status,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// Status of a FranzMirror resource.
///
/// Extends the connect-style status with the per-connector documents
/// reported by the Connect REST API.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MirrorStatus {
    /// Base status fields
    #[serde(flatten)]
    pub base: Status,

    /// Connector statuses as reported by the Connect REST API, kept as
    /// opaque documents. Entries self-identify through their own `name`
    /// key; their count and order carry no correlation to the configured
    /// mirror list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connectors: Vec<JsonObject>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

impl PreserveUnknownFields for Condition {
    const KIND: &'static str = "Condition";
    const DECLARED_FIELDS: &'static [&'static str] =
        &["type", "status", "lastTransitionTime", "reason", "message"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for Condition {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            condition_type: codec::declared_field(&mut object, Self::KIND, "type")?,
            status: codec::declared_field(&mut object, Self::KIND, "status")?,
            last_transition_time: codec::declared_field(
                &mut object,
                Self::KIND,
                "lastTransitionTime",
            )?,
            reason: codec::declared_field(&mut object, Self::KIND, "reason")?,
            message: codec::declared_field(&mut object, Self::KIND, "message")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl Status {
    fn from_object(object: &mut JsonObject, kind: &'static str) -> Result<Self> {
        Ok(Self {
            conditions: codec::declared_field(object, kind, "conditions")?,
            observed_generation: codec::declared_field(object, kind, "observedGeneration")?,
            url: codec::declared_field(object, kind, "url")?,
        })
    }
}

impl PreserveUnknownFields for ConnectStatus {
    const KIND: &'static str = "ConnectStatus";
    const DECLARED_FIELDS: &'static [&'static str] = &["conditions", "observedGeneration", "url"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for ConnectStatus {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            base: Status::from_object(&mut object, Self::KIND)?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for ConnectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl PreserveUnknownFields for MirrorStatus {
    const KIND: &'static str = "MirrorStatus";
    const DECLARED_FIELDS: &'static [&'static str] =
        &["conditions", "observedGeneration", "url", "connectors"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for MirrorStatus {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            base: Status::from_object(&mut object, Self::KIND)?,
            connectors: codec::declared_field(&mut object, Self::KIND, "connectors")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for MirrorStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl Condition {
    pub fn builder() -> ConditionBuilder {
        ConditionBuilder::default()
    }
}

/// Builder for [`Condition`].
#[derive(Default)]
pub struct ConditionBuilder {
    condition: Condition,
}

impl ConditionBuilder {
    pub fn condition_type(mut self, condition_type: impl Into<String>) -> Self {
        self.condition.condition_type = Some(condition_type.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.condition.status = Some(status.into());
        self
    }

    pub fn last_transition_time(mut self, time: impl Into<String>) -> Self {
        self.condition.last_transition_time = Some(time.into());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.condition.reason = Some(reason.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.condition.message = Some(message.into());
        self
    }

    pub fn build(self) -> Condition {
        self.condition
    }
}

impl ConnectStatus {
    pub fn builder() -> ConnectStatusBuilder {
        ConnectStatusBuilder::default()
    }
}

/// Builder for [`ConnectStatus`].
#[derive(Default)]
pub struct ConnectStatusBuilder {
    status: ConnectStatus,
}

impl ConnectStatusBuilder {
    pub fn condition(mut self, condition: Condition) -> Self {
        self.status.base.conditions.push(condition);
        self
    }

    /// Configure and append a condition in a child builder scope.
    pub fn with_condition(self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        let condition = f(ConditionBuilder::default()).build();
        self.condition(condition)
    }

    pub fn conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.status.base.conditions = conditions;
        self
    }

    pub fn observed_generation(mut self, generation: i64) -> Self {
        self.status.base.observed_generation = Some(generation);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.status.base.url = Some(url.into());
        self
    }

    pub fn build(self) -> ConnectStatus {
        self.status
    }
}

impl MirrorStatus {
    pub fn builder() -> MirrorStatusBuilder {
        MirrorStatusBuilder::default()
    }
}

/// Builder for [`MirrorStatus`].
#[derive(Default)]
pub struct MirrorStatusBuilder {
    status: MirrorStatus,
}

impl MirrorStatusBuilder {
    pub fn condition(mut self, condition: Condition) -> Self {
        self.status.base.conditions.push(condition);
        self
    }

    /// Configure and append a condition in a child builder scope.
    pub fn with_condition(self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        let condition = f(ConditionBuilder::default()).build();
        self.condition(condition)
    }

    pub fn conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.status.base.conditions = conditions;
        self
    }

    pub fn observed_generation(mut self, generation: i64) -> Self {
        self.status.base.observed_generation = Some(generation);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.status.base.url = Some(url.into());
        self
    }

    /// Append one connector document as reported by the Connect REST API.
    pub fn connector(mut self, connector: JsonObject) -> Self {
        self.status.connectors.push(connector);
        self
    }

    pub fn connectors(mut self, connectors: Vec<JsonObject>) -> Self {
        self.status.connectors = connectors;
        self
    }

    pub fn build(self) -> MirrorStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn connector_document(value: serde_json::Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_empty_status_encodes_to_empty_object() {
        let status = ConnectStatus::default();
        assert_eq!(codec::to_value(&status).unwrap(), json!({}));
    }

    #[test]
    fn test_declared_field_order_on_encode() {
        let status = MirrorStatus::builder()
            .with_condition(|c| c.condition_type("Ready").status("True"))
            .observed_generation(4)
            .url("http://connect-api:8083")
            .connector(connector_document(json!({"name": "c1", "state": "RUNNING"})))
            .build();

        let encoded = codec::to_json_string(&status).unwrap();
        let conditions = encoded.find("conditions").unwrap();
        let generation = encoded.find("observedGeneration").unwrap();
        let url = encoded.find("url").unwrap();
        let connectors = encoded.find("connectors").unwrap();
        assert!(conditions < generation && generation < url && url < connectors);
    }

    #[test]
    fn test_mirror_connectors_round_trip_verbatim() {
        let payload = json!({
            "conditions": [{"type": "Ready", "status": "True"}],
            "observedGeneration": 2,
            "connectors": [{"name": "c1", "state": "RUNNING", "tasksMax": 3}]
        });

        let status: MirrorStatus = codec::from_value(payload.clone()).unwrap();
        assert_eq!(status.base.observed_generation, Some(2));
        assert_eq!(status.connectors.len(), 1);
        assert_eq!(status.connectors[0].get("tasksMax"), Some(&json!(3)));

        // The opaque document survives unchanged, unknown keys included.
        assert_eq!(codec::to_value(&status).unwrap(), payload);
    }

    #[test]
    fn test_connect_status_parks_undeclared_connectors_in_the_bag() {
        let payload = json!({
            "url": "http://connect-api:8083",
            "connectors": [{"name": "c1"}]
        });

        let status: ConnectStatus = codec::from_value(payload).unwrap();
        assert_eq!(status.base.url.as_deref(), Some("http://connect-api:8083"));
        assert_eq!(
            status.additional_property("connectors"),
            Some(&json!([{"name": "c1"}]))
        );
    }

    #[test]
    fn test_condition_preserves_unknown_fields() {
        let payload = json!({
            "type": "Ready",
            "status": "Unknown",
            "severity": "warning"
        });

        let condition: Condition = codec::from_value(payload.clone()).unwrap();
        assert_eq!(condition.condition_type.as_deref(), Some("Ready"));
        assert_eq!(condition.additional_property("severity"), Some(&json!("warning")));
        assert_eq!(codec::to_value(&condition).unwrap(), payload);
    }

    #[test]
    fn test_condition_order_is_caller_determined() {
        let status = ConnectStatus::builder()
            .with_condition(|c| c.condition_type("NotReady").status("True"))
            .with_condition(|c| c.condition_type("Ready").status("False"))
            .build();

        let types: Vec<_> = status
            .base
            .conditions
            .iter()
            .map(|c| c.condition_type.as_deref().unwrap())
            .collect();
        assert_eq!(types, ["NotReady", "Ready"]);
    }

    #[test]
    fn test_scalar_conditions_is_a_type_mismatch() {
        let err = codec::from_value::<ConnectStatus>(json!({"conditions": 7})).unwrap_err();
        assert_eq!(err.field(), Some("conditions"));
    }

    #[test]
    fn test_equality_ignores_bag_insertion_order() {
        let mut a = ConnectStatus::builder().observed_generation(1).build();
        a.set_additional_property("x", 1).unwrap();
        a.set_additional_property("y", 2).unwrap();

        let mut b = ConnectStatus::builder().observed_generation(1).build();
        b.set_additional_property("y", 2).unwrap();
        b.set_additional_property("x", 1).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_status_round_trip() {
        let mut status = MirrorStatus::builder()
            .with_condition(|c| {
                c.condition_type("Ready")
                    .status("True")
                    .last_transition_time("2024-05-01T12:00:00Z")
                    .reason("ReconciliationSucceeded")
            })
            .observed_generation(7)
            .url("http://mirror-api:8083")
            .connector(connector_document(json!({"name": "source->target", "state": "RUNNING"})))
            .build();
        status.set_additional_property("newField", json!(["a", "b"])).unwrap();

        let decoded: MirrorStatus = codec::from_value(codec::to_value(&status).unwrap()).unwrap();
        assert_eq!(decoded, status);
    }
}
