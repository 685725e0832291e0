//! OpenTelemetryCollector Custom Resource Definition.
//!
//! Defines the OpenTelemetryCollector CRD for deploying and managing
//! OpenTelemetry Collector instances on Kubernetes. The configuration
//! payload itself is schema-less; see [`CollectorConfig`].

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::CollectorConfig;

/// OpenTelemetryCollector is a custom resource for deploying the
/// OpenTelemetry Collector.
///
/// Example:
/// ```yaml
/// apiVersion: opentelemetry.io/v1alpha1
/// kind: OpenTelemetryCollector
/// metadata:
///   name: simplest
/// spec:
///   mode: deployment
///   config:
///     receivers:
///       otlp:
///         protocols:
///           grpc: {}
///     processors:
///       batch: {}
///     exporters:
///       debug: {}
///     service:
///       pipelines:
///         traces:
///           receivers: [otlp]
///           processors: [batch]
///           exporters: [debug]
/// ```
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "opentelemetry.io",
    version = "v1alpha1",
    kind = "OpenTelemetryCollector",
    plural = "opentelemetrycollectors",
    shortname = "otelcol",
    status = "OpenTelemetryCollectorStatus",
    namespaced,
    // Print columns for kubectl get
    printcolumn = r#"{"name":"Mode", "type":"string", "jsonPath":".spec.mode"}"#,
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Image", "type":"string", "jsonPath":".status.image"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryCollectorSpec {
    /// How the collector workload is deployed (default: deployment).
    #[serde(default)]
    pub mode: CollectorMode,

    /// Number of collector replicas (default: 1).
    /// Ignored in daemonset and sidecar modes.
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Collector container image configuration.
    #[serde(default)]
    pub image: ImageSpec,

    /// The collector configuration document.
    #[serde(default)]
    pub config: CollectorConfig,

    /// Additional labels to apply to all managed resources.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Additional annotations to apply to all managed resources.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl Default for OpenTelemetryCollectorSpec {
    fn default() -> Self {
        Self {
            mode: CollectorMode::default(),
            replicas: default_replicas(),
            image: ImageSpec::default(),
            config: CollectorConfig::default(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }
}

fn default_replicas() -> i32 {
    1
}

/// How the collector workload is deployed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CollectorMode {
    /// Run as a Deployment (default).
    #[default]
    Deployment,
    /// Run as a DaemonSet, one collector per node.
    DaemonSet,
    /// Run as a StatefulSet.
    StatefulSet,
    /// Injected into workload pods as a sidecar container.
    Sidecar,
}

impl std::fmt::Display for CollectorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            CollectorMode::Deployment => "deployment",
            CollectorMode::DaemonSet => "daemonset",
            CollectorMode::StatefulSet => "statefulset",
            CollectorMode::Sidecar => "sidecar",
        };
        write!(f, "{}", mode)
    }
}

/// Container image specification.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    /// Container image repository (default: otel/opentelemetry-collector-contrib).
    #[serde(default = "default_image_repository")]
    pub repository: String,

    /// Image tag (default: 0.127.0).
    #[serde(default = "default_image_tag")]
    pub tag: String,

    /// Image pull policy (default: IfNotPresent).
    #[serde(default = "default_image_pull_policy")]
    pub pull_policy: String,

    /// Image pull secrets.
    #[serde(default)]
    pub pull_secrets: Vec<String>,
}

impl Default for ImageSpec {
    fn default() -> Self {
        Self {
            repository: default_image_repository(),
            tag: default_image_tag(),
            pull_policy: default_image_pull_policy(),
            pull_secrets: Vec::new(),
        }
    }
}

fn default_image_repository() -> String {
    "otel/opentelemetry-collector-contrib".to_string()
}

fn default_image_tag() -> String {
    "0.127.0".to_string()
}

fn default_image_pull_policy() -> String {
    "IfNotPresent".to_string()
}

/// Status of an OpenTelemetryCollector resource.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryCollectorStatus {
    /// Resolved collector image of the running workload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Number of ready collector replicas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_replicas: Option<i32>,
}
