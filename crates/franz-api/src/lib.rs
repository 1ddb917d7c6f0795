//! # Franz API model
//!
//! Typed model for pieces of the Franz operator's custom resources: JMX
//! options, per-workload templates, and status sub-documents. The rest of
//! the operator (controllers, resource builders, clients) lives in the
//! other workspace members; this crate is pure data.
//!
//! ## Unknown-field preservation
//!
//! The same stored resource is read and written by whatever control-plane
//! versions happen to be deployed, and a newer version may have declared
//! fields this one has never heard of. Every entity therefore implements
//! [`PreserveUnknownFields`]: declared fields are typed, everything else a
//! payload carries is kept verbatim in an extension bag and written back on
//! encode. Read-modify-write through this crate never drops a field.
//!
//! ```
//! use franz_api::prelude::*;
//!
//! let jmx: JmxOptions = codec::from_json_str(
//!     r#"{"authentication": {"type": "password"}, "extraKnob": true}"#,
//! )?;
//! assert_eq!(jmx.additional_property("extraKnob"), Some(&serde_json::json!(true)));
//! # Ok::<(), franz_api::ModelError>(())
//! ```
//!
//! ## Construction
//!
//! Entities are built with fluent builders; nested composites are
//! configured in child builder scopes that commit back to the parent:
//!
//! ```
//! use franz_api::prelude::*;
//!
//! let template = ExporterTemplate::builder()
//!     .with_pod(|pod| pod.priority_class_name("high-priority"))
//!     .build();
//! ```
//!
//! Builders construct new instances only. There is deliberately no way to
//! derive a pre-populated builder from an existing entity; modifying one
//! means building a new instance.
//!
//! ## Wire form
//!
//! Entities decode from JSON or YAML payloads and encode declared fields in
//! a fixed per-kind order, omitting unset (and, for sequences and mappings,
//! empty) values. A resource edited as
//!
//! ```yaml
//! metricsExporter:
//!   template:
//!     pod:
//!       priorityClassName: high-priority
//! ```
//!
//! round-trips byte-for-byte in content, including any keys added by a
//! newer schema version.
//!
//! ## Modules
//!
//! - [`unknown`] - extension-bag contract shared by every entity
//! - [`codec`] - decode/encode entry points and the per-field decoder
//! - [`jmx`] - JMX port options and authentication
//! - [`status`] - operational status kinds and conditions
//! - [`template`] - overrides for generated workload resources
//! - [`error`] - error types for model operations

pub mod codec;
pub mod error;
pub mod jmx;
pub mod status;
pub mod template;
pub mod unknown;

pub use crate::error::{ModelError, Result};

pub mod prelude {
    //! Re-exports for convenient usage
    pub use crate::codec::{self, Entity};
    pub use crate::error::{ModelError, Result};
    pub use crate::jmx::{
        JmxAuthentication, JmxAuthenticationPassword, JmxOptions, JmxOptionsBuilder,
    };
    pub use crate::status::{
        Condition, ConditionBuilder, ConnectStatus, ConnectStatusBuilder, MirrorStatus,
        MirrorStatusBuilder, Status,
    };
    pub use crate::template::{
        ContainerEnvVar, ContainerEnvVarBuilder, ContainerTemplate, ContainerTemplateBuilder,
        ExporterTemplate, ExporterTemplateBuilder, MetadataTemplate, MetadataTemplateBuilder,
        PodTemplate, PodTemplateBuilder, ResourceTemplate, ResourceTemplateBuilder,
    };
    pub use crate::unknown::{JsonObject, PreserveUnknownFields};
}
