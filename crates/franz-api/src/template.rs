//! Templates overriding the resources the operator generates
//!
//! A template never creates anything by itself: each sub-template describes
//! overrides for one generated workload resource, and an unset sub-template
//! means "use the platform default". Applying or removing an override is
//! the reconciler's business, not this model's.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    Affinity, LocalObjectReference, PodSecurityContext, SecurityContext, Toleration,
};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{self, Entity};
use crate::error::Result;
use crate::unknown::{JsonObject, PreserveUnknownFields};

/// Template for the metrics-exporter workload resources.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExporterTemplate {
    /// Template for the exporter `Deployment`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<ResourceTemplate>,

    /// Template for the exporter `Pods`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<PodTemplate>,

    /// Template for the exporter `Service`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ResourceTemplate>,

    /// Template for the exporter container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerTemplate>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// Template for a generated resource's metadata.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    /// Metadata applied to the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataTemplate>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// Labels and annotations merged into a generated resource's metadata.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataTemplate {
    /// Labels added to the resource
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotations added to the resource
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// Template for generated `Pods`.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    /// Metadata applied to the pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataTemplate>,

    /// Image pull secrets for the pods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(skip)]
    pub image_pull_secrets: Vec<LocalObjectReference>,

    /// Pod-level security context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub security_context: Option<PodSecurityContext>,

    /// Grace period for pod termination, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_grace_period_seconds: Option<i64>,

    /// Pod affinity/anti-affinity rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub affinity: Option<Affinity>,

    /// Tolerations for pod scheduling
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(skip)]
    pub tolerations: Vec<Toleration>,

    /// Priority class name for the pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// Template for a generated container.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerTemplate {
    /// Environment variables added to the container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<ContainerEnvVar>,

    /// Container-level security context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub security_context: Option<SecurityContext>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

/// One environment variable entry in a container template.
#[derive(Debug, Clone, Default, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerEnvVar {
    /// Variable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Variable value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    additional_properties: JsonObject,
}

impl PreserveUnknownFields for ExporterTemplate {
    const KIND: &'static str = "ExporterTemplate";
    const DECLARED_FIELDS: &'static [&'static str] =
        &["deployment", "pod", "service", "container"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for ExporterTemplate {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            deployment: codec::declared_field(&mut object, Self::KIND, "deployment")?,
            pod: codec::declared_field(&mut object, Self::KIND, "pod")?,
            service: codec::declared_field(&mut object, Self::KIND, "service")?,
            container: codec::declared_field(&mut object, Self::KIND, "container")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for ExporterTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl PreserveUnknownFields for ResourceTemplate {
    const KIND: &'static str = "ResourceTemplate";
    const DECLARED_FIELDS: &'static [&'static str] = &["metadata"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for ResourceTemplate {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            metadata: codec::declared_field(&mut object, Self::KIND, "metadata")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for ResourceTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl PreserveUnknownFields for MetadataTemplate {
    const KIND: &'static str = "MetadataTemplate";
    const DECLARED_FIELDS: &'static [&'static str] = &["labels", "annotations"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for MetadataTemplate {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            labels: codec::declared_field(&mut object, Self::KIND, "labels")?,
            annotations: codec::declared_field(&mut object, Self::KIND, "annotations")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for MetadataTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl PreserveUnknownFields for PodTemplate {
    const KIND: &'static str = "PodTemplate";
    const DECLARED_FIELDS: &'static [&'static str] = &[
        "metadata",
        "imagePullSecrets",
        "securityContext",
        "terminationGracePeriodSeconds",
        "affinity",
        "tolerations",
        "priorityClassName",
    ];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for PodTemplate {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            metadata: codec::declared_field(&mut object, Self::KIND, "metadata")?,
            image_pull_secrets: codec::declared_field(&mut object, Self::KIND, "imagePullSecrets")?,
            security_context: codec::declared_field(&mut object, Self::KIND, "securityContext")?,
            termination_grace_period_seconds: codec::declared_field(
                &mut object,
                Self::KIND,
                "terminationGracePeriodSeconds",
            )?,
            affinity: codec::declared_field(&mut object, Self::KIND, "affinity")?,
            tolerations: codec::declared_field(&mut object, Self::KIND, "tolerations")?,
            priority_class_name: codec::declared_field(&mut object, Self::KIND, "priorityClassName")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for PodTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl PreserveUnknownFields for ContainerTemplate {
    const KIND: &'static str = "ContainerTemplate";
    const DECLARED_FIELDS: &'static [&'static str] = &["env", "securityContext"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for ContainerTemplate {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            env: codec::declared_field(&mut object, Self::KIND, "env")?,
            security_context: codec::declared_field(&mut object, Self::KIND, "securityContext")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for ContainerTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl PreserveUnknownFields for ContainerEnvVar {
    const KIND: &'static str = "ContainerEnvVar";
    const DECLARED_FIELDS: &'static [&'static str] = &["name", "value"];

    fn additional_properties(&self) -> &JsonObject {
        &self.additional_properties
    }

    fn additional_properties_mut(&mut self) -> &mut JsonObject {
        &mut self.additional_properties
    }
}

impl Entity for ContainerEnvVar {
    fn from_object(mut object: JsonObject) -> Result<Self> {
        Ok(Self {
            name: codec::declared_field(&mut object, Self::KIND, "name")?,
            value: codec::declared_field(&mut object, Self::KIND, "value")?,
            additional_properties: object,
        })
    }
}

impl<'de> Deserialize<'de> for ContainerEnvVar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

impl ExporterTemplate {
    pub fn builder() -> ExporterTemplateBuilder {
        ExporterTemplateBuilder::default()
    }
}

/// Builder for [`ExporterTemplate`].
#[derive(Default)]
pub struct ExporterTemplateBuilder {
    template: ExporterTemplate,
}

impl ExporterTemplateBuilder {
    pub fn deployment(mut self, deployment: ResourceTemplate) -> Self {
        self.template.deployment = Some(deployment);
        self
    }

    /// Configure the deployment template in a child builder scope.
    pub fn with_deployment(
        self,
        f: impl FnOnce(ResourceTemplateBuilder) -> ResourceTemplateBuilder,
    ) -> Self {
        let deployment = f(ResourceTemplateBuilder::default()).build();
        self.deployment(deployment)
    }

    pub fn pod(mut self, pod: PodTemplate) -> Self {
        self.template.pod = Some(pod);
        self
    }

    /// Configure the pod template in a child builder scope.
    pub fn with_pod(self, f: impl FnOnce(PodTemplateBuilder) -> PodTemplateBuilder) -> Self {
        let pod = f(PodTemplateBuilder::default()).build();
        self.pod(pod)
    }

    pub fn service(mut self, service: ResourceTemplate) -> Self {
        self.template.service = Some(service);
        self
    }

    /// Configure the service template in a child builder scope.
    pub fn with_service(
        self,
        f: impl FnOnce(ResourceTemplateBuilder) -> ResourceTemplateBuilder,
    ) -> Self {
        let service = f(ResourceTemplateBuilder::default()).build();
        self.service(service)
    }

    pub fn container(mut self, container: ContainerTemplate) -> Self {
        self.template.container = Some(container);
        self
    }

    /// Configure the container template in a child builder scope.
    pub fn with_container(
        self,
        f: impl FnOnce(ContainerTemplateBuilder) -> ContainerTemplateBuilder,
    ) -> Self {
        let container = f(ContainerTemplateBuilder::default()).build();
        self.container(container)
    }

    pub fn build(self) -> ExporterTemplate {
        self.template
    }
}

impl ResourceTemplate {
    pub fn builder() -> ResourceTemplateBuilder {
        ResourceTemplateBuilder::default()
    }
}

/// Builder for [`ResourceTemplate`].
#[derive(Default)]
pub struct ResourceTemplateBuilder {
    template: ResourceTemplate,
}

impl ResourceTemplateBuilder {
    pub fn metadata(mut self, metadata: MetadataTemplate) -> Self {
        self.template.metadata = Some(metadata);
        self
    }

    /// Configure the metadata template in a child builder scope.
    pub fn with_metadata(
        self,
        f: impl FnOnce(MetadataTemplateBuilder) -> MetadataTemplateBuilder,
    ) -> Self {
        let metadata = f(MetadataTemplateBuilder::default()).build();
        self.metadata(metadata)
    }

    pub fn build(self) -> ResourceTemplate {
        self.template
    }
}

impl MetadataTemplate {
    pub fn builder() -> MetadataTemplateBuilder {
        MetadataTemplateBuilder::default()
    }
}

/// Builder for [`MetadataTemplate`].
#[derive(Default)]
pub struct MetadataTemplateBuilder {
    template: MetadataTemplate,
}

impl MetadataTemplateBuilder {
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.template.labels.insert(key.into(), value.into());
        self
    }

    pub fn labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.template.labels = labels;
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.template.annotations.insert(key.into(), value.into());
        self
    }

    pub fn annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.template.annotations = annotations;
        self
    }

    pub fn build(self) -> MetadataTemplate {
        self.template
    }
}

impl PodTemplate {
    pub fn builder() -> PodTemplateBuilder {
        PodTemplateBuilder::default()
    }
}

/// Builder for [`PodTemplate`].
#[derive(Default)]
pub struct PodTemplateBuilder {
    template: PodTemplate,
}

impl PodTemplateBuilder {
    pub fn metadata(mut self, metadata: MetadataTemplate) -> Self {
        self.template.metadata = Some(metadata);
        self
    }

    /// Configure the metadata template in a child builder scope.
    pub fn with_metadata(
        self,
        f: impl FnOnce(MetadataTemplateBuilder) -> MetadataTemplateBuilder,
    ) -> Self {
        let metadata = f(MetadataTemplateBuilder::default()).build();
        self.metadata(metadata)
    }

    pub fn image_pull_secret(mut self, name: impl Into<String>) -> Self {
        self.template
            .image_pull_secrets
            .push(LocalObjectReference { name: Some(name.into()) });
        self
    }

    pub fn security_context(mut self, security_context: PodSecurityContext) -> Self {
        self.template.security_context = Some(security_context);
        self
    }

    pub fn termination_grace_period_seconds(mut self, seconds: i64) -> Self {
        self.template.termination_grace_period_seconds = Some(seconds);
        self
    }

    pub fn affinity(mut self, affinity: Affinity) -> Self {
        self.template.affinity = Some(affinity);
        self
    }

    pub fn toleration(mut self, toleration: Toleration) -> Self {
        self.template.tolerations.push(toleration);
        self
    }

    pub fn priority_class_name(mut self, name: impl Into<String>) -> Self {
        self.template.priority_class_name = Some(name.into());
        self
    }

    pub fn build(self) -> PodTemplate {
        self.template
    }
}

impl ContainerTemplate {
    pub fn builder() -> ContainerTemplateBuilder {
        ContainerTemplateBuilder::default()
    }
}

/// Builder for [`ContainerTemplate`].
#[derive(Default)]
pub struct ContainerTemplateBuilder {
    template: ContainerTemplate,
}

impl ContainerTemplateBuilder {
    pub fn env_var(mut self, env_var: ContainerEnvVar) -> Self {
        self.template.env.push(env_var);
        self
    }

    /// Configure and append an environment variable in a child builder scope.
    pub fn with_env_var(
        self,
        f: impl FnOnce(ContainerEnvVarBuilder) -> ContainerEnvVarBuilder,
    ) -> Self {
        let env_var = f(ContainerEnvVarBuilder::default()).build();
        self.env_var(env_var)
    }

    pub fn env(mut self, env: Vec<ContainerEnvVar>) -> Self {
        self.template.env = env;
        self
    }

    pub fn security_context(mut self, security_context: SecurityContext) -> Self {
        self.template.security_context = Some(security_context);
        self
    }

    pub fn build(self) -> ContainerTemplate {
        self.template
    }
}

impl ContainerEnvVar {
    pub fn builder() -> ContainerEnvVarBuilder {
        ContainerEnvVarBuilder::default()
    }
}

/// Builder for [`ContainerEnvVar`].
#[derive(Default)]
pub struct ContainerEnvVarBuilder {
    env_var: ContainerEnvVar,
}

impl ContainerEnvVarBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.env_var.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.env_var.value = Some(value.into());
        self
    }

    pub fn build(self) -> ContainerEnvVar {
        self.env_var
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_template_encodes_to_empty_object() {
        let template = ExporterTemplate::default();
        assert_eq!(codec::to_value(&template).unwrap(), json!({}));
    }

    #[test]
    fn test_empty_metadata_maps_are_omitted() {
        let template = ExporterTemplate::builder()
            .with_deployment(|d| d.with_metadata(|m| m))
            .build();

        let encoded = codec::to_value(&template).unwrap();
        assert_eq!(encoded, json!({"deployment": {"metadata": {}}}));
    }

    #[test]
    fn test_nested_builder_scope_commits_on_return() {
        let template = ExporterTemplate::builder()
            .with_pod(|pod| {
                pod.priority_class_name("high-priority")
                    .termination_grace_period_seconds(120)
                    .image_pull_secret("registry-credentials")
            })
            .with_container(|container| {
                container.with_env_var(|env| env.name("JMX_PORT").value("9999"))
            })
            .build();

        let pod = template.pod.as_ref().unwrap();
        assert_eq!(pod.priority_class_name.as_deref(), Some("high-priority"));
        assert_eq!(pod.termination_grace_period_seconds, Some(120));
        assert_eq!(pod.image_pull_secrets[0].name.as_deref(), Some("registry-credentials"));
        assert!(template.deployment.is_none());

        let env = &template.container.as_ref().unwrap().env[0];
        assert_eq!(env.name.as_deref(), Some("JMX_PORT"));
        assert_eq!(env.value.as_deref(), Some("9999"));
    }

    #[test]
    fn test_sub_template_unknown_keys_round_trip() {
        let payload = json!({
            "pod": {
                "priorityClassName": "high-priority",
                "hostNetwork": true
            },
            "extraTemplate": {"answer": 42}
        });

        let template: ExporterTemplate = codec::from_value(payload.clone()).unwrap();
        let pod = template.pod.as_ref().unwrap();
        assert_eq!(pod.additional_property("hostNetwork"), Some(&json!(true)));
        assert_eq!(
            template.additional_property("extraTemplate"),
            Some(&json!({"answer": 42}))
        );

        assert_eq!(codec::to_value(&template).unwrap(), payload);
    }

    #[test]
    fn test_kubernetes_typed_fields_round_trip() {
        let payload = json!({
            "pod": {
                "metadata": {"labels": {"app": "exporter"}},
                "imagePullSecrets": [{"name": "registry-credentials"}],
                "tolerations": [{"key": "dedicated", "operator": "Exists"}],
                "terminationGracePeriodSeconds": 45
            }
        });

        let template: ExporterTemplate = codec::from_value(payload.clone()).unwrap();
        let pod = template.pod.as_ref().unwrap();
        assert_eq!(pod.tolerations[0].key.as_deref(), Some("dedicated"));
        assert_eq!(
            pod.metadata.as_ref().unwrap().labels.get("app"),
            Some(&"exporter".to_string())
        );

        assert_eq!(codec::to_value(&template).unwrap(), payload);
    }

    #[test]
    fn test_scalar_pod_template_is_a_type_mismatch() {
        let err = codec::from_value::<ExporterTemplate>(json!({"pod": 3})).unwrap_err();
        assert_eq!(err.field(), Some("pod"));
    }

    #[test]
    fn test_unset_sub_templates_stay_unset() {
        let template: ExporterTemplate =
            codec::from_json_str(r#"{"deployment": null}"#).unwrap();
        assert!(template.deployment.is_none());
        assert!(template.pod.is_none());
        assert!(template.additional_properties().is_empty());
    }
}
